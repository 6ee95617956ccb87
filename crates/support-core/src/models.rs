//! Entity models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Account status of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Blocked,
}

/// Lifecycle status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Pending,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Whether the ticket counts as resolved for `resolved_at` purposes.
    pub fn is_resolved_or_closed(self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl fmt::Display for TicketPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        };
        f.write_str(s)
    }
}

/// Channel a ticket came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketSource {
    Chat,
    Email,
    Phone,
    Web,
    Api,
}

/// Status of a chat session.
///
/// `Active` and `Waiting` are derived from the most recent message's sender
/// and recomputed on every append. `Transferred` and `Ended` are
/// caller-settable lifecycle states that the derivation never overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Waiting,
    Transferred,
    Ended,
}

impl SessionStatus {
    /// Whether the session is in a caller-set terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Transferred | Self::Ended)
    }

    /// Recompute the derived activity status after a message append.
    ///
    /// A customer message puts the session in `Waiting` (an agent owes a
    /// reply), an agent message puts it in `Active`. System messages leave
    /// the status untouched, as do terminal states.
    pub fn derive_after_message(self, sender: SenderType) -> Self {
        if self.is_terminal() {
            return self;
        }
        match sender {
            SenderType::Customer => Self::Waiting,
            SenderType::Agent => Self::Active,
            SenderType::System => self,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Waiting => "waiting",
            Self::Transferred => "transferred",
            Self::Ended => "ended",
        };
        f.write_str(s)
    }
}

/// Who sent a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderType {
    Customer,
    Agent,
    System,
}

/// Content type of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    File,
    Image,
    System,
}

/// Role of a support agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Agent,
    Supervisor,
    Admin,
}

/// Presence status of a support agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Online,
    Away,
    Offline,
}

/// Customer notification and locale preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Preferred language (e.g., "English", "Vietnamese").
    pub language: String,
    /// Whether the customer wants notifications.
    pub notifications: bool,
    /// IANA timezone name.
    pub timezone: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            notifications: true,
            timezone: "UTC".to_string(),
        }
    }
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Generated ID (e.g., "cust_1724400000000_a1b2c3d4e").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address, unique across customers.
    pub email: String,
    /// Phone number, if provided.
    pub phone: Option<String>,
    /// Company name, if provided.
    pub company: Option<String>,
    /// Avatar URL, if provided.
    pub avatar: Option<String>,
    /// Account status.
    pub status: CustomerStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Last login timestamp, if known.
    pub last_login: Option<DateTime<Utc>>,
    /// Locale and notification preferences.
    pub preferences: Preferences,
}

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Generated ID.
    pub id: String,
    /// Short summary.
    pub title: String,
    /// Full problem description.
    pub description: String,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Category, normally one of the recommended set in [`crate::classify`].
    pub category: String,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Owning customer ID.
    pub customer_id: String,
    /// Assigned agent ID, if any.
    pub assigned_agent_id: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the ticket entered resolved/closed. Cleared on reopening.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Due date, if set.
    pub due_date: Option<DateTime<Utc>>,
    /// Service-level target resolution time in hours.
    pub sla_hours: u32,
    /// Customer satisfaction rating, 1-5.
    pub satisfaction: Option<u8>,
    /// Channel the ticket came in through.
    pub source: TicketSource,
    /// Open key-value metadata (e.g., originating chat session ID).
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A live chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Generated ID.
    pub id: String,
    /// Linked ticket, set at most once by the lifecycle manager.
    pub ticket_id: Option<String>,
    /// Owning customer ID.
    pub customer_id: String,
    /// Assigned responding agent, if any.
    pub agent_id: Option<String>,
    /// Session status. See [`SessionStatus`] for derivation rules.
    pub status: SessionStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Messages in chronological (insertion) order.
    pub messages: Vec<ChatMessage>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// When the session ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// Customer rating of the session, 1-5.
    pub rating: Option<u8>,
    /// Free-form customer feedback.
    pub feedback: Option<String>,
}

/// A single chat message.
///
/// Immutable once created except for the `read` and `edited` flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Generated ID.
    pub id: String,
    /// Owning session ID.
    pub session_id: String,
    /// ID of the sending customer, agent, or system component.
    pub sender_id: String,
    /// Kind of sender.
    pub sender_type: SenderType,
    /// Message content.
    pub content: String,
    /// Content type.
    #[serde(rename = "type")]
    pub message_type: MessageType,
    /// Assigned at creation, monotonically increasing within a session.
    pub timestamp: DateTime<Utc>,
    /// Optional key-value metadata.
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    /// Whether the recipient has read the message.
    pub read: bool,
    /// Whether the message was edited after creation.
    pub edited: bool,
    /// When the message was last edited, if ever.
    pub edited_at: Option<DateTime<Utc>>,
}

/// Rolling performance counters for an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    /// Average first-response time in seconds.
    pub avg_response_time: f64,
    /// Fraction of assigned tickets resolved, in `[0, 1]`.
    pub resolution_rate: f64,
    /// Average satisfaction score, in `[0, 5]`.
    pub satisfaction_score: f64,
    /// Total tickets resolved.
    pub tickets_resolved: u64,
}

/// A support agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Generated ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: AgentRole,
    /// Presence status.
    pub status: AgentStatus,
    /// Lower-cased category tokens the agent can handle.
    pub skills: Vec<String>,
    /// Number of chats currently assigned. Never exceeds `max_chats`.
    pub current_chats: u32,
    /// Capacity bound for concurrent chats.
    pub max_chats: u32,
    /// Performance counters.
    pub performance: AgentPerformance,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp.
    pub last_active: DateTime<Utc>,
}

impl Agent {
    /// Whether the agent can accept another chat right now.
    pub fn is_available(&self) -> bool {
        self.status == AgentStatus::Online && self.current_chats < self.max_chats
    }
}

/// Daily metric snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub total_tickets: u64,
    pub resolved_tickets: u64,
    pub avg_resolution_time: f64,
    pub customer_satisfaction: f64,
    pub agent_utilization: f64,
    pub first_response_time: f64,
    pub chat_volume: u64,
    /// Hours of the day (0-23) with peak traffic.
    pub peak_hours: Vec<u8>,
}

/// Ordered sample sequences for trend charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsTrends {
    pub ticket_volume: Vec<f64>,
    pub response_times: Vec<f64>,
    pub satisfaction: Vec<f64>,
}

/// One analytics record per calendar day, upserted by merging partial
/// metric updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsData {
    /// Date key (e.g., "2026-08-23").
    pub id: String,
    /// The calendar day this record covers.
    pub date: NaiveDate,
    /// Metric snapshot.
    pub metrics: AnalyticsMetrics,
    /// Trend samples.
    pub trends: AnalyticsTrends,
}

impl AnalyticsData {
    /// Create an empty record for the given day.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            id: date.to_string(),
            date,
            metrics: AnalyticsMetrics::default(),
            trends: AnalyticsTrends::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        let status: SessionStatus = serde_json::from_str(r#""waiting""#).unwrap();
        assert_eq!(status, SessionStatus::Waiting);
    }

    #[test]
    fn test_derive_after_customer_message() {
        assert_eq!(
            SessionStatus::Active.derive_after_message(SenderType::Customer),
            SessionStatus::Waiting
        );
    }

    #[test]
    fn test_derive_after_agent_message() {
        assert_eq!(
            SessionStatus::Waiting.derive_after_message(SenderType::Agent),
            SessionStatus::Active
        );
    }

    #[test]
    fn test_derive_preserves_terminal_states() {
        assert_eq!(
            SessionStatus::Ended.derive_after_message(SenderType::Customer),
            SessionStatus::Ended
        );
        assert_eq!(
            SessionStatus::Transferred.derive_after_message(SenderType::Agent),
            SessionStatus::Transferred
        );
    }

    #[test]
    fn test_derive_system_message_is_neutral() {
        assert_eq!(
            SessionStatus::Active.derive_after_message(SenderType::System),
            SessionStatus::Active
        );
        assert_eq!(
            SessionStatus::Waiting.derive_after_message(SenderType::System),
            SessionStatus::Waiting
        );
    }

    #[test]
    fn test_agent_availability() {
        let mut agent = Agent {
            id: "agent_1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: AgentRole::Agent,
            status: AgentStatus::Online,
            skills: vec![],
            current_chats: 2,
            max_chats: 3,
            performance: AgentPerformance::default(),
            created_at: Utc::now(),
            last_active: Utc::now(),
        };
        assert!(agent.is_available());

        agent.current_chats = 3;
        assert!(!agent.is_available());

        agent.current_chats = 0;
        agent.status = AgentStatus::Offline;
        assert!(!agent.is_available());
    }
}
