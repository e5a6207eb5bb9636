//! Driven port for the credential store.
//!
//! The credential store exclusively owns user rows. The session authority is
//! its only consumer: lookups by login identifier during authentication and
//! by id when re-validating a session.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

/// A user row joined with its password verifier material.
///
/// The verifier bytes never leave the session authority; see
/// [`crate::domain::auth::verify_password`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user: User,
    pub salt: Vec<u8>,
    pub verifier: Vec<u8>,
}

/// Failures surfaced by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialStoreError {
    /// The store could not be reached.
    #[error("credential store connection error: {message}")]
    Connection { message: String },

    /// A lookup failed inside the store.
    #[error("credential store query error: {message}")]
    Query { message: String },
}

impl CredentialStoreError {
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

/// Read-only access to user records and their password verifiers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a credential record by unique login identifier.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError>;

    /// Look up a user by id, without verifier material.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, CredentialStoreError>;
}
