//! In-memory entity store and lifecycle manager for the support core.
//!
//! This crate owns creation and cross-entity side effects for tickets and
//! chat sessions: auto-assignment of agents on ticket creation, automatic
//! ticket derivation from the first customer message of a session, status
//! change logging, and analytics upserts.
//!
//! The store is an explicit object constructed once and passed by
//! reference to callers (no global singleton), so tests get isolation via
//! fresh instances. All maps live behind a single `tokio::sync::RwLock`:
//! every mutation is a single-writer critical section, which makes
//! read-modify-write sequences such as "fetch available agents, pick one,
//! increment its counter" atomic without per-entity locks.
//!
//! # Example
//!
//! ```rust
//! use support_store::{NewChatMessage, NewChatSession, SupportStore};
//! use support_core::{MessageType, SenderType, SessionStatus, TicketPriority};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> support_store::Result<()> {
//!     let store = SupportStore::new();
//!
//!     let session = store
//!         .create_chat_session(NewChatSession {
//!             customer_id: "cust_1".to_string(),
//!             agent_id: None,
//!             status: SessionStatus::Active,
//!             priority: TicketPriority::Medium,
//!         })
//!         .await?;
//!
//!     // The first customer message auto-creates a linked ticket.
//!     store
//!         .add_chat_message(NewChatMessage {
//!             session_id: session.id.clone(),
//!             sender_id: "cust_1".to_string(),
//!             sender_type: SenderType::Customer,
//!             content: "My login is broken".to_string(),
//!             message_type: MessageType::Text,
//!             metadata: None,
//!         })
//!         .await?;
//!
//!     let session = store.get_chat_session(&session.id).await?;
//!     assert!(session.ticket_id.is_some());
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod analytics;
pub mod chat;
pub mod customer;
pub mod error;
pub mod ticket;

pub use agent::NewAgent;
pub use analytics::MetricsPatch;
pub use chat::{NewChatMessage, NewChatSession};
pub use customer::{CustomerPatch, NewCustomer};
pub use error::{Result, StoreError};
pub use ticket::{NewTicket, TicketFilter, TicketPatch};

use std::collections::HashMap;
use support_core::{Agent, AnalyticsData, ChatSession, Customer, Ticket};
use tokio::sync::RwLock;

/// All entity maps, keyed by generated string IDs.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) customers: HashMap<String, Customer>,
    pub(crate) tickets: HashMap<String, Ticket>,
    pub(crate) sessions: HashMap<String, ChatSession>,
    pub(crate) agents: HashMap<String, Agent>,
    pub(crate) analytics: HashMap<String, AnalyticsData>,
}

/// The in-memory entity store.
///
/// Cheap to construct; intended to be created once at process start and
/// injected into every component that needs it.
#[derive(Debug, Default)]
pub struct SupportStore {
    pub(crate) inner: RwLock<Inner>,
}

impl SupportStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
