//! Row structs bridging Diesel and the domain types.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{text_blocks, tickets, users};

/// A user row as read from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: String,
    pub salt: String,
    pub verifier: String,
    pub created_at: NaiveDateTime,
}

/// Fields for provisioning a user account.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub role: &'a str,
    pub salt: &'a str,
    pub verifier: &'a str,
    pub created_at: NaiveDateTime,
}

/// A ticket row as read from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TicketRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub category: String,
    pub state: String,
    pub created_at: NaiveDateTime,
}

/// Fields for inserting a ticket.
#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub category: &'a str,
    pub state: &'a str,
    pub created_at: NaiveDateTime,
}

/// A text block row as read from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = text_blocks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TextBlockRow {
    pub id: i64,
    pub ticket_id: i64,
    pub owner_id: i64,
    pub description: String,
    pub created_at: NaiveDateTime,
}

/// Fields for appending a text block.
#[derive(Debug, Insertable)]
#[diesel(table_name = text_blocks)]
pub struct NewTextBlockRow<'a> {
    pub ticket_id: i64,
    pub owner_id: i64,
    pub description: &'a str,
    pub created_at: NaiveDateTime,
}
