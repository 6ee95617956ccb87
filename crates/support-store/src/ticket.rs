//! Ticket operations.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use support_core::{
    generate_id, validation, Ticket, TicketPriority, TicketSource, TicketStatus,
};

use crate::error::{Result, StoreError};
use crate::{agent, Inner, SupportStore};

/// Input for creating a ticket.
///
/// The lifecycle manager assumes validated input for reference fields;
/// `customer_id` is not checked for existence, matching the reference
/// behavior where reference validation belongs to the caller.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub category: String,
    pub tags: Vec<String>,
    pub customer_id: String,
    pub sla_hours: u32,
    pub source: TicketSource,
    pub due_date: Option<DateTime<Utc>>,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Partial update for a ticket. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub assigned_agent_id: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub satisfaction: Option<u8>,
}

/// Filters for listing tickets. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<String>,
    pub assigned_agent_id: Option<String>,
    pub customer_id: Option<String>,
}

impl SupportStore {
    /// Create a ticket and run auto-assignment.
    ///
    /// Returns the stored ticket, including any agent assignment made by
    /// the greedy auto-assignment pass.
    pub async fn create_ticket(&self, input: NewTicket) -> Result<Ticket> {
        validation::validate_required("title", &input.title)?;
        validation::validate_required("description", &input.description)?;
        validation::validate_required("category", &input.category)?;
        validation::validate_required("customer_id", &input.customer_id)?;

        let mut inner = self.inner.write().await;
        Ok(insert_ticket(&mut inner, input))
    }

    /// Get a ticket by ID.
    pub async fn get_ticket(&self, id: &str) -> Result<Ticket> {
        let inner = self.inner.read().await;
        inner
            .tickets
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Ticket",
                id: id.to_string(),
            })
    }

    /// Apply a partial update to a ticket.
    ///
    /// Refreshes `updated_at`. Status changes are logged (old to new) and
    /// maintain `resolved_at`: set on entering resolved/closed, cleared on
    /// any transition back out.
    pub async fn update_ticket(&self, id: &str, patch: TicketPatch) -> Result<Ticket> {
        if let Some(satisfaction) = patch.satisfaction {
            validation::validate_rating("satisfaction", satisfaction)?;
        }

        let mut inner = self.inner.write().await;
        let ticket = inner.tickets.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "Ticket",
            id: id.to_string(),
        })?;

        if let Some(title) = patch.title {
            ticket.title = title;
        }
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(category) = patch.category {
            ticket.category = category;
        }
        if let Some(tags) = patch.tags {
            ticket.tags = tags;
        }
        if let Some(agent_id) = patch.assigned_agent_id {
            ticket.assigned_agent_id = Some(agent_id);
        }
        if let Some(due_date) = patch.due_date {
            ticket.due_date = Some(due_date);
        }
        if let Some(satisfaction) = patch.satisfaction {
            ticket.satisfaction = Some(satisfaction);
        }

        if let Some(status) = patch.status {
            if status != ticket.status {
                tracing::info!(
                    ticket = %id,
                    from = %ticket.status,
                    to = %status,
                    "ticket status changed"
                );
            }
            ticket.status = status;
            if status.is_resolved_or_closed() {
                if ticket.resolved_at.is_none() {
                    ticket.resolved_at = Some(Utc::now());
                }
            } else {
                ticket.resolved_at = None;
            }
        }

        ticket.updated_at = Utc::now();
        Ok(ticket.clone())
    }

    /// List tickets matching the filter, newest first by creation time.
    pub async fn list_tickets(&self, filter: TicketFilter) -> Vec<Ticket> {
        let inner = self.inner.read().await;
        let mut tickets: Vec<Ticket> = inner
            .tickets
            .values()
            .filter(|t| filter.status.map_or(true, |s| t.status == s))
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .filter(|t| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| t.category == c)
            })
            .filter(|t| {
                filter
                    .assigned_agent_id
                    .as_deref()
                    .map_or(true, |a| t.assigned_agent_id.as_deref() == Some(a))
            })
            .filter(|t| {
                filter
                    .customer_id
                    .as_deref()
                    .map_or(true, |c| t.customer_id == c)
            })
            .cloned()
            .collect();

        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        tickets
    }
}

/// Insert a ticket under the caller's write lock and auto-assign an agent.
pub(crate) fn insert_ticket(inner: &mut Inner, input: NewTicket) -> Ticket {
    let now = Utc::now();
    let ticket = Ticket {
        id: generate_id("ticket"),
        title: input.title,
        description: input.description,
        status: input.status,
        priority: input.priority,
        category: input.category,
        tags: input.tags,
        customer_id: input.customer_id,
        assigned_agent_id: None,
        created_at: now,
        updated_at: now,
        resolved_at: None,
        due_date: input.due_date,
        sla_hours: input.sla_hours,
        satisfaction: None,
        source: input.source,
        metadata: input.metadata,
    };

    tracing::info!(
        ticket = %ticket.id,
        category = %ticket.category,
        priority = %ticket.priority,
        "created ticket"
    );
    let id = ticket.id.clone();
    inner.tickets.insert(id.clone(), ticket.clone());
    agent::auto_assign(inner, &id);

    inner.tickets.get(&id).cloned().unwrap_or(ticket)
}
