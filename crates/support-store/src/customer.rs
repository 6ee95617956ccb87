//! Customer operations.

use chrono::{DateTime, Utc};
use support_core::{generate_id, validation, Customer, CustomerStatus, Preferences};

use crate::error::{Result, StoreError};
use crate::SupportStore;

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub avatar: Option<String>,
    pub status: CustomerStatus,
    pub preferences: Preferences,
}

/// Partial update for a customer. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub avatar: Option<String>,
    pub status: Option<CustomerStatus>,
    pub preferences: Option<Preferences>,
    pub last_login: Option<DateTime<Utc>>,
}

impl SupportStore {
    /// Create a new customer. Email addresses are unique across customers.
    pub async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
        validation::validate_required("name", &input.name)?;
        validation::validate_email(&input.email)?;

        let mut inner = self.inner.write().await;

        if inner.customers.values().any(|c| c.email == input.email) {
            return Err(StoreError::AlreadyExists {
                entity: "Customer",
                id: input.email,
            });
        }

        let now = Utc::now();
        let customer = Customer {
            id: generate_id("cust"),
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            avatar: input.avatar,
            status: input.status,
            created_at: now,
            updated_at: now,
            last_login: None,
            preferences: input.preferences,
        };

        tracing::info!(customer = %customer.id, "created customer");
        inner.customers.insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: &str) -> Result<Customer> {
        let inner = self.inner.read().await;
        inner
            .customers
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Customer",
                id: id.to_string(),
            })
    }

    /// Apply a partial update to a customer and refresh `updated_at`.
    pub async fn update_customer(&self, id: &str, patch: CustomerPatch) -> Result<Customer> {
        let mut inner = self.inner.write().await;
        let customer = inner
            .customers
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "Customer",
                id: id.to_string(),
            })?;

        if let Some(name) = patch.name {
            customer.name = name;
        }
        if let Some(phone) = patch.phone {
            customer.phone = Some(phone);
        }
        if let Some(company) = patch.company {
            customer.company = Some(company);
        }
        if let Some(avatar) = patch.avatar {
            customer.avatar = Some(avatar);
        }
        if let Some(status) = patch.status {
            customer.status = status;
        }
        if let Some(preferences) = patch.preferences {
            customer.preferences = preferences;
        }
        if let Some(last_login) = patch.last_login {
            customer.last_login = Some(last_login);
        }
        customer.updated_at = Utc::now();

        Ok(customer.clone())
    }
}
