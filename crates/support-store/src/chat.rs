//! Chat session operations and ticket-from-chat derivation.

use chrono::Utc;
use std::collections::HashMap;
use support_core::{
    classify, generate_id, validation, ChatMessage, ChatSession, MessageType, SenderType,
    SessionStatus, Ticket, TicketPriority, TicketSource, TicketStatus,
};

use crate::error::{Result, StoreError};
use crate::ticket::{self, NewTicket};
use crate::{Inner, SupportStore};

/// Input for creating a chat session.
#[derive(Debug, Clone)]
pub struct NewChatSession {
    pub customer_id: String,
    pub agent_id: Option<String>,
    pub status: SessionStatus,
    pub priority: TicketPriority,
}

/// Input for appending a chat message.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub session_id: String,
    pub sender_id: String,
    pub sender_type: SenderType,
    pub content: String,
    pub message_type: MessageType,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl SupportStore {
    /// Create a chat session with an empty message list.
    pub async fn create_chat_session(&self, input: NewChatSession) -> Result<ChatSession> {
        validation::validate_required("customer_id", &input.customer_id)?;

        let now = Utc::now();
        let session = ChatSession {
            id: generate_id("chat"),
            ticket_id: None,
            customer_id: input.customer_id,
            agent_id: input.agent_id,
            status: input.status,
            priority: input.priority,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            ended_at: None,
            rating: None,
            feedback: None,
        };

        let mut inner = self.inner.write().await;
        tracing::info!(session = %session.id, "created chat session");
        inner.sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    /// Get a chat session by ID, including its messages.
    pub async fn get_chat_session(&self, id: &str) -> Result<ChatSession> {
        let inner = self.inner.read().await;
        inner
            .sessions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "ChatSession",
                id: id.to_string(),
            })
    }

    /// Append a message to a session.
    ///
    /// Assigns the message ID and a timestamp that is strictly increasing
    /// within the session, refreshes the session's `updated_at`, and
    /// re-derives the activity status from the sender. If the sender is a
    /// customer and the session has no linked ticket yet, a ticket is
    /// derived from the message content and linked to the session; this
    /// fires at most once per session.
    pub async fn add_chat_message(&self, input: NewChatMessage) -> Result<ChatMessage> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(&input.session_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "ChatSession",
                id: input.session_id.clone(),
            })?;

        let now = Utc::now();
        // Keep timestamps strictly increasing even when appends land in
        // the same clock tick.
        let timestamp = match session.messages.last() {
            Some(last) if last.timestamp >= now => {
                last.timestamp + chrono::Duration::milliseconds(1)
            }
            _ => now,
        };

        let message = ChatMessage {
            id: generate_id("msg"),
            session_id: input.session_id.clone(),
            sender_id: input.sender_id,
            sender_type: input.sender_type,
            content: input.content.clone(),
            message_type: input.message_type,
            timestamp,
            metadata: input.metadata,
            read: false,
            edited: false,
            edited_at: None,
        };

        session.messages.push(message.clone());
        session.updated_at = now;
        session.status = session.status.derive_after_message(input.sender_type);

        let pending_ticket = (input.sender_type == SenderType::Customer
            && session.ticket_id.is_none())
        .then(|| (session.id.clone(), session.customer_id.clone()));

        if let Some((session_id, customer_id)) = pending_ticket {
            let ticket =
                create_ticket_from_chat(&mut inner, &session_id, &customer_id, &input.content);
            if let Some(session) = inner.sessions.get_mut(&session_id) {
                session.ticket_id = Some(ticket.id);
            }
        }

        Ok(message)
    }

    /// End a session, recording an optional rating and feedback.
    pub async fn end_chat_session(
        &self,
        id: &str,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> Result<ChatSession> {
        if let Some(rating) = rating {
            validation::validate_rating("rating", rating)?;
        }

        let mut inner = self.inner.write().await;
        let session = inner.sessions.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "ChatSession",
            id: id.to_string(),
        })?;

        let now = Utc::now();
        session.status = SessionStatus::Ended;
        session.ended_at = Some(now);
        session.updated_at = now;
        if rating.is_some() {
            session.rating = rating;
        }
        if feedback.is_some() {
            session.feedback = feedback;
        }

        tracing::info!(session = %id, "chat session ended");
        Ok(session.clone())
    }

    /// Mark a single message as read.
    pub async fn mark_message_read(&self, session_id: &str, message_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        let session = inner
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "ChatSession",
                id: session_id.to_string(),
            })?;

        let message = session
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "ChatMessage",
                id: message_id.to_string(),
            })?;

        message.read = true;
        Ok(())
    }
}

/// Derive a ticket from the first customer message of a session.
///
/// Category, priority, tags and the SLA target all come from the
/// classification heuristics; the originating session ID is recorded in
/// the ticket metadata. The new ticket goes through the standard
/// auto-assignment path.
fn create_ticket_from_chat(
    inner: &mut Inner,
    session_id: &str,
    customer_id: &str,
    first_message: &str,
) -> Ticket {
    let category = classify::categorize(first_message).to_string();
    let mut metadata = HashMap::new();
    metadata.insert(
        "chat_session_id".to_string(),
        serde_json::Value::String(session_id.to_string()),
    );

    let input = NewTicket {
        title: chat_ticket_title(first_message),
        description: first_message.to_string(),
        status: TicketStatus::Open,
        priority: classify::determine_priority(first_message),
        tags: classify::extract_tags(first_message),
        sla_hours: classify::sla_hours(&category),
        category,
        customer_id: customer_id.to_string(),
        source: TicketSource::Chat,
        due_date: None,
        metadata,
    };

    tracing::info!(session = %session_id, "deriving ticket from first customer message");
    ticket::insert_ticket(inner, input)
}

/// Title for a chat-derived ticket: prefix plus the first 50 characters.
///
/// The ellipsis is appended unconditionally, matching the reference
/// behavior even for messages shorter than the truncation limit.
fn chat_ticket_title(message: &str) -> String {
    let head: String = message.chars().take(50).collect();
    format!("Chat Support: {}...", head)
}
