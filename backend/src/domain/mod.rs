//! Domain primitives, ports, and services.
//!
//! Everything under this module is transport and storage agnostic. Inbound
//! adapters translate HTTP requests into these types; outbound adapters
//! implement the ports over the backing store.

pub mod auth;
pub mod error;
pub mod estimation;
pub mod ports;
pub mod ticket;
pub mod ticket_service;
pub mod token;
pub mod user;

pub use self::auth::{AuthService, LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::estimation::{estimate, Estimate, TicketSummary};
pub use self::ticket::{
    BlockDescription, Category, TextBlock, TextBlockEntry, TextBlockId, Ticket, TicketId,
    TicketOverview, TicketState, TicketTitle, TicketValidationError, DESCRIPTION_MAX, TITLE_MAX,
};
pub use self::ticket_service::{CreateTicket, TicketService, UpdateTicket};
pub use self::token::{DelegationClaims, TokenSigner, DELEGATION_TOKEN_TTL_SECONDS};
pub use self::user::{Role, User, UserId, UserProfile};
