//! Support ticket system: lifecycle state machine, dual authentication, and a
//! stateless estimation service.
//!
//! The crate follows a hexagonal layout: `domain` holds the business rules
//! and ports, `outbound` the Diesel/SQLite adapters, `inbound` the Actix
//! handlers, and `server` the process assembly.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;
