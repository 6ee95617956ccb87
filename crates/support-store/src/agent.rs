//! Agent operations and greedy auto-assignment.

use chrono::Utc;
use support_core::{
    generate_id, validation, Agent, AgentPerformance, AgentRole, AgentStatus,
};

use crate::error::{Result, StoreError};
use crate::{Inner, SupportStore};

/// Input for creating an agent.
#[derive(Debug, Clone)]
pub struct NewAgent {
    pub name: String,
    pub email: String,
    pub role: AgentRole,
    pub status: AgentStatus,
    /// Lower-cased category tokens the agent can handle.
    pub skills: Vec<String>,
    /// Capacity bound for concurrent chats. Must be greater than zero.
    pub max_chats: u32,
}

impl SupportStore {
    /// Create a new agent with zeroed counters.
    pub async fn create_agent(&self, input: NewAgent) -> Result<Agent> {
        validation::validate_required("name", &input.name)?;
        validation::validate_email(&input.email)?;

        let now = Utc::now();
        let agent = Agent {
            id: generate_id("agent"),
            name: input.name,
            email: input.email,
            role: input.role,
            status: input.status,
            skills: input.skills,
            current_chats: 0,
            max_chats: input.max_chats,
            performance: AgentPerformance::default(),
            created_at: now,
            last_active: now,
        };

        let mut inner = self.inner.write().await;
        tracing::info!(agent = %agent.id, "created agent");
        inner.agents.insert(agent.id.clone(), agent.clone());
        Ok(agent)
    }

    /// Get an agent by ID.
    pub async fn get_agent(&self, id: &str) -> Result<Agent> {
        let inner = self.inner.read().await;
        inner
            .agents
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entity: "Agent",
                id: id.to_string(),
            })
    }

    /// Set an agent's presence status and refresh `last_active`.
    pub async fn set_agent_status(&self, id: &str, status: AgentStatus) -> Result<Agent> {
        let mut inner = self.inner.write().await;
        let agent = inner.agents.get_mut(id).ok_or_else(|| StoreError::NotFound {
            entity: "Agent",
            id: id.to_string(),
        })?;

        agent.status = status;
        agent.last_active = Utc::now();
        Ok(agent.clone())
    }

    /// All agents that are online and under capacity, sorted ascending by
    /// current chat load (fewest active chats first).
    pub async fn available_agents(&self) -> Vec<Agent> {
        let inner = self.inner.read().await;
        let mut agents: Vec<Agent> = inner
            .agents
            .values()
            .filter(|a| a.is_available())
            .cloned()
            .collect();
        agents.sort_by_key(|a| a.current_chats);
        agents
    }

    /// Assign an agent to a ticket, incrementing the agent's chat counter.
    pub async fn assign_agent_to_ticket(&self, ticket_id: &str, agent_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;

        if !inner.tickets.contains_key(ticket_id) {
            return Err(StoreError::NotFound {
                entity: "Ticket",
                id: ticket_id.to_string(),
            });
        }
        if !inner.agents.contains_key(agent_id) {
            return Err(StoreError::NotFound {
                entity: "Agent",
                id: agent_id.to_string(),
            });
        }

        assign(&mut inner, ticket_id, agent_id);
        Ok(())
    }
}

/// Greedy one-shot auto-assignment for a freshly created ticket.
///
/// Candidates are online agents under capacity, ordered by ascending chat
/// load. An agent whose skills contain the ticket's category wins over the
/// load order; otherwise the least-loaded agent is picked. An empty
/// candidate list leaves the ticket unassigned. Runs inside the caller's
/// write lock so the read-modify-write on the agent counter is serialized.
pub(crate) fn auto_assign(inner: &mut Inner, ticket_id: &str) {
    let category = match inner.tickets.get(ticket_id) {
        Some(ticket) => ticket.category.clone(),
        None => return,
    };

    let chosen = {
        let mut candidates: Vec<&Agent> =
            inner.agents.values().filter(|a| a.is_available()).collect();
        candidates.sort_by_key(|a| a.current_chats);

        candidates
            .iter()
            .find(|a| a.skills.iter().any(|s| s.eq_ignore_ascii_case(&category)))
            .or_else(|| candidates.first())
            .map(|a| a.id.clone())
    };

    match chosen {
        Some(agent_id) => assign(inner, ticket_id, &agent_id),
        None => {
            tracing::debug!(ticket = %ticket_id, "no available agent; ticket left unassigned");
        }
    }
}

/// Record an assignment: set the ticket's agent and bump the agent's load.
fn assign(inner: &mut Inner, ticket_id: &str, agent_id: &str) {
    if let Some(agent) = inner.agents.get_mut(agent_id) {
        agent.current_chats += 1;
        agent.last_active = Utc::now();
    }
    if let Some(ticket) = inner.tickets.get_mut(ticket_id) {
        ticket.assigned_agent_id = Some(agent_id.to_string());
        ticket.updated_at = Utc::now();
    }
    tracing::info!(ticket = %ticket_id, agent = %agent_id, "assigned agent to ticket");
}
