//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// User accounts, provisioned by an administrative process.
    users (id) {
        /// Primary key, assigned by the store.
        id -> BigInt,
        /// Unique login identifier.
        email -> Text,
        /// Display identity shown alongside tickets and blocks.
        username -> Text,
        /// Role label: `normal` or `admin`.
        role -> Text,
        /// Hex-encoded per-user salt.
        salt -> Text,
        /// Hex-encoded password verifier.
        verifier -> Text,
        /// Record creation timestamp (UTC).
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Issue tickets.
    tickets (id) {
        /// Primary key, assigned by the store on creation.
        id -> BigInt,
        /// Owning user, fixed at creation.
        owner_id -> BigInt,
        /// Ticket title, 1..=80 characters.
        title -> Text,
        /// Category label from the fixed closed set.
        category -> Text,
        /// Lifecycle state label: `open` or `closed`.
        state -> Text,
        /// Creation timestamp (UTC), immutable.
        created_at -> Timestamp,
    }
}

diesel::table! {
    /// Append-only text blocks attached to tickets.
    text_blocks (id) {
        /// Primary key, assigned by the store on append.
        id -> BigInt,
        /// Parent ticket, immutable.
        ticket_id -> BigInt,
        /// Authoring user.
        owner_id -> BigInt,
        /// Block description, 1..=1024 characters.
        description -> Text,
        /// Creation timestamp (UTC), immutable.
        created_at -> Timestamp,
    }
}

diesel::joinable!(tickets -> users (owner_id));
diesel::joinable!(text_blocks -> users (owner_id));
diesel::joinable!(text_blocks -> tickets (ticket_id));

diesel::allow_tables_to_appear_in_same_query!(users, tickets, text_blocks);
