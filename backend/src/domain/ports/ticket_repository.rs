//! Driven port for the ticket store.
//!
//! The ticket store exclusively owns ticket and text block rows and their
//! referential integrity. All mutations flow through the
//! [`crate::domain::TicketService`], which re-validates authorization before
//! calling into this port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ticket::{
    BlockDescription, Category, TextBlockEntry, TextBlockId, Ticket, TicketId, TicketOverview,
    TicketState, TicketTitle,
};
use crate::domain::user::UserId;

/// Fields for a ticket about to be created. State is always `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub owner: UserId,
    pub title: TicketTitle,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// Fields for a text block about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTextBlock {
    pub ticket_id: TicketId,
    pub owner: UserId,
    pub description: BlockDescription,
    pub created_at: DateTime<Utc>,
}

/// Resolved field values to persist for a ticket update.
///
/// Both fields carry the merged result of the requested change over the
/// loaded ticket, so the store writes whole rows and under concurrent
/// updates the last row written wins, including fields the caller never
/// asked to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketChanges {
    pub state: TicketState,
    pub category: Category,
}

/// Failures surfaced by ticket store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketRepositoryError {
    /// The store could not be reached.
    #[error("ticket store connection error: {message}")]
    Connection { message: String },

    /// A statement failed inside the store. Any in-flight transaction has
    /// been rolled back.
    #[error("ticket store query error: {message}")]
    Query { message: String },
}

impl TicketRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Persistence operations over tickets and text blocks.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// All tickets joined with owner usernames, newest created-at first.
    async fn list_overviews(&self) -> Result<Vec<TicketOverview>, TicketRepositoryError>;

    /// Load a single ticket by id.
    async fn find_ticket(&self, id: TicketId)
        -> Result<Option<Ticket>, TicketRepositoryError>;

    /// Insert a ticket and its first text block as one atomic unit.
    ///
    /// If either write fails, neither row is visible afterwards.
    async fn create_with_first_block(
        &self,
        ticket: NewTicket,
        description: BlockDescription,
    ) -> Result<TicketId, TicketRepositoryError>;

    /// Persist merged state and category for an existing ticket.
    async fn update_ticket(
        &self,
        id: TicketId,
        changes: TicketChanges,
    ) -> Result<(), TicketRepositoryError>;

    /// Text blocks of a ticket joined with author usernames, oldest first.
    async fn list_blocks(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TextBlockEntry>, TicketRepositoryError>;

    /// Append a text block, returning its new id.
    async fn append_block(
        &self,
        block: NewTextBlock,
    ) -> Result<TextBlockId, TicketRepositoryError>;
}
