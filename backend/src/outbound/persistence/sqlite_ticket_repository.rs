//! SQLite-backed `TicketRepository` implementation using Diesel.
//!
//! The create path wraps the ticket insert and the first text block insert in
//! one transaction; a failure of either write rolls both back.

use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::ports::{
    NewTextBlock, NewTicket, TicketChanges, TicketRepository, TicketRepositoryError,
};
use crate::domain::ticket::{
    BlockDescription, TextBlock, TextBlockEntry, TextBlockId, Ticket, TicketId, TicketOverview,
    TicketState, TicketTitle,
};
use crate::domain::user::UserId;

use super::error_mapping::map_run_error;
use super::models::{NewTextBlockRow, NewTicketRow, TextBlockRow, TicketRow};
use super::pool::{DbPool, RunError};
use super::schema::{text_blocks, tickets, users};

/// Diesel-backed implementation of the ticket store port.
#[derive(Clone)]
pub struct SqliteTicketRepository {
    pool: DbPool,
}

impl SqliteTicketRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: RunError) -> TicketRepositoryError {
    map_run_error(
        error,
        TicketRepositoryError::query,
        TicketRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain ticket.
fn row_to_ticket(row: TicketRow) -> Result<Ticket, TicketRepositoryError> {
    let TicketRow {
        id,
        owner_id,
        title,
        category,
        state,
        created_at,
    } = row;

    Ok(Ticket {
        id: TicketId::new(id),
        title: TicketTitle::new(title)
            .map_err(|err| TicketRepositoryError::query(format!("decode title: {err}")))?,
        category: category
            .parse()
            .map_err(|err| TicketRepositoryError::query(format!("decode category: {err}")))?,
        state: state
            .parse()
            .map_err(|err| TicketRepositoryError::query(format!("decode state: {err}")))?,
        owner: UserId::new(owner_id),
        created_at: created_at.and_utc(),
    })
}

/// Convert a database row into a validated domain text block.
fn row_to_block(row: TextBlockRow) -> Result<TextBlock, TicketRepositoryError> {
    let TextBlockRow {
        id,
        ticket_id,
        owner_id,
        description,
        created_at,
    } = row;

    Ok(TextBlock {
        id: TextBlockId::new(id),
        ticket_id: TicketId::new(ticket_id),
        owner: UserId::new(owner_id),
        description: BlockDescription::new(description)
            .map_err(|err| TicketRepositoryError::query(format!("decode description: {err}")))?,
        created_at: created_at.and_utc(),
    })
}

#[async_trait]
impl TicketRepository for SqliteTicketRepository {
    async fn list_overviews(&self) -> Result<Vec<TicketOverview>, TicketRepositoryError> {
        let rows: Vec<(TicketRow, String)> = self
            .pool
            .run(|conn| {
                tickets::table
                    .inner_join(users::table)
                    .order((tickets::created_at.desc(), tickets::id.desc()))
                    .select((TicketRow::as_select(), users::username))
                    .load(conn)
            })
            .await
            .map_err(map_error)?;

        rows.into_iter()
            .map(|(row, owner_username)| {
                Ok(TicketOverview {
                    ticket: row_to_ticket(row)?,
                    owner_username,
                })
            })
            .collect()
    }

    async fn find_ticket(
        &self,
        id: TicketId,
    ) -> Result<Option<Ticket>, TicketRepositoryError> {
        let row = self
            .pool
            .run(move |conn| {
                tickets::table
                    .find(id.as_i64())
                    .select(TicketRow::as_select())
                    .first::<TicketRow>(conn)
                    .optional()
            })
            .await
            .map_err(map_error)?;

        row.map(row_to_ticket).transpose()
    }

    async fn create_with_first_block(
        &self,
        ticket: NewTicket,
        description: BlockDescription,
    ) -> Result<TicketId, TicketRepositoryError> {
        let id = self
            .pool
            .run(move |conn| {
                conn.transaction(|conn| {
                    let created_at = ticket.created_at.naive_utc();
                    let ticket_row = NewTicketRow {
                        owner_id: ticket.owner.as_i64(),
                        title: ticket.title.as_ref(),
                        category: ticket.category.as_str(),
                        state: TicketState::Open.as_str(),
                        created_at,
                    };
                    let ticket_id: i64 = diesel::insert_into(tickets::table)
                        .values(&ticket_row)
                        .returning(tickets::id)
                        .get_result(conn)?;

                    let block_row = NewTextBlockRow {
                        ticket_id,
                        owner_id: ticket.owner.as_i64(),
                        description: description.as_ref(),
                        created_at,
                    };
                    diesel::insert_into(text_blocks::table)
                        .values(&block_row)
                        .execute(conn)?;

                    Ok(ticket_id)
                })
            })
            .await
            .map_err(map_error)?;

        Ok(TicketId::new(id))
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        changes: TicketChanges,
    ) -> Result<(), TicketRepositoryError> {
        let affected = self
            .pool
            .run(move |conn| {
                diesel::update(tickets::table.find(id.as_i64()))
                    .set((
                        tickets::state.eq(changes.state.as_str()),
                        tickets::category.eq(changes.category.as_str()),
                    ))
                    .execute(conn)
            })
            .await
            .map_err(map_error)?;

        if affected == 0 {
            return Err(TicketRepositoryError::query("record not found"));
        }
        Ok(())
    }

    async fn list_blocks(
        &self,
        ticket_id: TicketId,
    ) -> Result<Vec<TextBlockEntry>, TicketRepositoryError> {
        let rows: Vec<(TextBlockRow, String)> = self
            .pool
            .run(move |conn| {
                text_blocks::table
                    .inner_join(users::table)
                    .filter(text_blocks::ticket_id.eq(ticket_id.as_i64()))
                    .order((text_blocks::created_at.asc(), text_blocks::id.asc()))
                    .select((TextBlockRow::as_select(), users::username))
                    .load(conn)
            })
            .await
            .map_err(map_error)?;

        rows.into_iter()
            .map(|(row, author_username)| {
                Ok(TextBlockEntry {
                    block: row_to_block(row)?,
                    author_username,
                })
            })
            .collect()
    }

    async fn append_block(
        &self,
        block: NewTextBlock,
    ) -> Result<TextBlockId, TicketRepositoryError> {
        let id = self
            .pool
            .run(move |conn| {
                let row = NewTextBlockRow {
                    ticket_id: block.ticket_id.as_i64(),
                    owner_id: block.owner.as_i64(),
                    description: block.description.as_ref(),
                    created_at: block.created_at.naive_utc(),
                };
                diesel::insert_into(text_blocks::table)
                    .values(&row)
                    .returning(text_blocks::id)
                    .get_result::<i64>(conn)
            })
            .await
            .map_err(map_error)?;

        Ok(TextBlockId::new(id))
    }
}
