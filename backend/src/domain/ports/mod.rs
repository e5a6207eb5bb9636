//! Driven ports implemented by outbound adapters.
//!
//! In hexagonal terms these are the seams between the domain services and the
//! backing stores: domain code depends only on these traits, so handler and
//! service tests can substitute in-memory doubles instead of wiring
//! persistence.

mod credential_store;
mod ticket_repository;

pub use credential_store::{CredentialRecord, CredentialStore, CredentialStoreError};
pub use ticket_repository::{
    NewTextBlock, NewTicket, TicketChanges, TicketRepository, TicketRepositoryError,
};
