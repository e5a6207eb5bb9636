//! Ticket authority: the lifecycle state machine and ownership/role rules.
//!
//! Every operation re-validates authorization against the loaded ticket; no
//! client-supplied state is trusted. The one hard atomicity requirement,
//! creating a ticket together with its first text block, is delegated to the
//! repository port as a single all-or-nothing operation.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::ports::{
    NewTextBlock, NewTicket, TicketChanges, TicketRepository, TicketRepositoryError,
};
use crate::domain::ticket::{
    BlockDescription, Category, TextBlockEntry, TextBlockId, Ticket, TicketId, TicketOverview,
    TicketState, TicketTitle,
};
use crate::domain::user::User;
use crate::domain::Error;

/// Validated fields for opening a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub title: TicketTitle,
    pub category: Category,
    pub initial_description: BlockDescription,
}

/// Requested changes for an existing ticket.
///
/// `body_id`, when supplied by the transport payload, must agree with the
/// addressed ticket id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateTicket {
    pub body_id: Option<TicketId>,
    pub state: Option<TicketState>,
    pub category: Option<Category>,
}

fn map_repository_error(error: TicketRepositoryError) -> Error {
    Error::storage(format!("ticket store unavailable: {error}"))
}

/// Enforces the ticket state machine over a [`TicketRepository`].
#[derive(Clone)]
pub struct TicketService {
    tickets: Arc<dyn TicketRepository>,
}

impl TicketService {
    /// Create a new service over the given ticket store.
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    /// All tickets, newest first, joined with owner display identity.
    ///
    /// Visible to anonymous callers; no filtering by ownership.
    pub async fn list_tickets(&self) -> Result<Vec<TicketOverview>, Error> {
        self.tickets
            .list_overviews()
            .await
            .map_err(map_repository_error)
    }

    /// Open a new ticket with its mandatory first text block.
    ///
    /// The two inserts form one atomic unit: on failure no partial id is
    /// returned and nothing is persisted.
    pub async fn create_ticket(
        &self,
        owner: &User,
        request: CreateTicket,
    ) -> Result<TicketId, Error> {
        let created_at = Utc::now();
        let ticket = NewTicket {
            owner: owner.id(),
            title: request.title,
            category: request.category,
            created_at,
        };

        let id = self
            .tickets
            .create_with_first_block(ticket, request.initial_description)
            .await
            .map_err(map_repository_error)?;

        tracing::info!(ticket_id = %id, owner = %owner.id(), "ticket created");
        Ok(id)
    }

    /// Apply a state and/or category change under the state-machine rules.
    ///
    /// - `OPEN -> CLOSED`: ticket owner or any admin.
    /// - `CLOSED -> OPEN`: admin only; an owner cannot reopen their own
    ///   closed ticket. This asymmetry is deliberate policy.
    /// - Category reassignment: admin only, independent of state.
    pub async fn update_ticket(
        &self,
        caller: &User,
        id: TicketId,
        request: UpdateTicket,
    ) -> Result<(), Error> {
        if let Some(body_id) = request.body_id {
            if body_id != id {
                return Err(Error::conflict(format!(
                    "payload addresses ticket {body_id} but the path addresses ticket {id}"
                )));
            }
        }

        let ticket = self.load_ticket(id).await?;
        let is_admin = caller.role().is_admin();

        if ticket.owner != caller.id() && !is_admin {
            return Err(Error::forbidden(
                "only the ticket owner or an administrator may update a ticket",
            ));
        }

        if let Some(requested) = request.state {
            let reopening =
                ticket.state == TicketState::Closed && requested == TicketState::Open;
            if reopening && !is_admin {
                return Err(Error::forbidden(
                    "only an administrator may reopen a closed ticket",
                ));
            }
        }

        if let Some(category) = request.category {
            if category != ticket.category && !is_admin {
                return Err(Error::forbidden(
                    "only an administrator may reassign the category",
                ));
            }
        }

        let changes = TicketChanges {
            state: request.state.unwrap_or(ticket.state),
            category: request.category.unwrap_or(ticket.category),
        };
        self.tickets
            .update_ticket(id, changes)
            .await
            .map_err(map_repository_error)?;

        tracing::info!(
            ticket_id = %id,
            caller = %caller.id(),
            state = changes.state.as_str(),
            category = changes.category.as_str(),
            "ticket updated"
        );
        Ok(())
    }

    /// Text blocks of a ticket, oldest first, joined with author identity.
    pub async fn list_text_blocks(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TextBlockEntry>, Error> {
        self.load_ticket(ticket_id).await?;
        self.tickets
            .list_blocks(ticket_id)
            .await
            .map_err(map_repository_error)
    }

    /// Append a text block to an open ticket.
    ///
    /// Closed tickets reject appends to prevent late edits on resolved
    /// issues.
    pub async fn append_text_block(
        &self,
        caller: &User,
        ticket_id: TicketId,
        description: BlockDescription,
    ) -> Result<TextBlockId, Error> {
        let ticket = self.load_ticket(ticket_id).await?;
        if !ticket.state.is_open() {
            return Err(Error::invalid_state(
                "cannot add text blocks to a closed ticket",
            ));
        }

        let block = NewTextBlock {
            ticket_id,
            owner: caller.id(),
            description,
            created_at: Utc::now(),
        };
        self.tickets
            .append_block(block)
            .await
            .map_err(map_repository_error)
    }

    async fn load_ticket(&self, id: TicketId) -> Result<Ticket, Error> {
        self.tickets
            .find_ticket(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("ticket {id} not found")))
    }
}

#[cfg(test)]
#[path = "ticket_service_tests.rs"]
mod tests;
