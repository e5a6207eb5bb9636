//! Shared application state injected into HTTP handlers.

use crate::domain::auth::AuthService;
use crate::domain::ticket_service::TicketService;
use crate::domain::token::TokenSigner;
use crate::domain::user::User;
use crate::domain::Error;

use super::session::SessionContext;

/// Domain services available to the ticket system's handlers.
#[derive(Clone)]
pub struct HttpState {
    auth: AuthService,
    tickets: TicketService,
    signer: TokenSigner,
}

impl HttpState {
    /// Assemble the handler state from the domain services.
    pub fn new(auth: AuthService, tickets: TicketService, signer: TokenSigner) -> Self {
        Self {
            auth,
            tickets,
            signer,
        }
    }

    /// Session authority.
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Ticket authority.
    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    /// Delegation token signer.
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Resolve the session's user against the credential store.
    ///
    /// Identity and role come from the store on every call, never from the
    /// cookie, so revoked or deleted accounts lose access immediately.
    pub async fn session_user(&self, session: &SessionContext) -> Result<User, Error> {
        let id = session.require_user_id()?;
        self.auth.current_user(id).await
    }
}
