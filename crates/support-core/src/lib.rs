//! Shared domain types for the customer-support core.
//!
//! This crate provides the entity models used across the workspace
//! (customers, tickets, chat sessions, agents, analytics), the message
//! classification heuristics that drive ticket creation from chat, ID
//! generation, and input validation.
//!
//! # Example
//!
//! ```rust
//! use support_core::classify;
//!
//! let category = classify::categorize("I can't login, password reset failed");
//! assert_eq!(category, classify::CATEGORY_ACCOUNT);
//! assert_eq!(classify::sla_hours(category), 4);
//! ```

pub mod classify;
pub mod id;
pub mod models;
pub mod validation;

pub use id::generate_id;
pub use models::{
    Agent, AgentPerformance, AgentRole, AgentStatus, AnalyticsData, AnalyticsMetrics,
    AnalyticsTrends, ChatMessage, ChatSession, Customer, CustomerStatus, MessageType,
    Preferences, SenderType, SessionStatus, Ticket, TicketPriority, TicketSource,
    TicketStatus,
};
pub use validation::ValidationError;
