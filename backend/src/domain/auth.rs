//! Session authority: credential verification and password verifiers.
//!
//! Authentication recomputes the stored verifier from the presented password
//! and the record's salt, then compares in constant time. Unknown identifier
//! and wrong password yield the identical error so login identifiers cannot
//! be enumerated.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::user::{User, UserId};
use crate::domain::Error;

type HmacSha256 = Hmac<Sha256>;

/// Login identifier and secret as presented by a client.
///
/// The password is wiped from memory when the credentials are dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LoginCredentials {
    #[zeroize(skip)]
    email: String,
    password: String,
}

/// Validation errors for login payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginCredentials {
    /// Validate and construct credentials from request parts.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, LoginValidationError> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    /// Login identifier.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Presented secret.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Derive the stored password verifier for a password and salt.
///
/// The storage format is a salted HMAC-SHA256; only this module interprets
/// verifier bytes.
pub fn derive_verifier(password: &str, salt: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Recompute and compare a password verifier in constant time.
pub fn verify_password(password: &str, salt: &[u8], verifier: &[u8]) -> bool {
    let mut mac = HmacSha256::new_from_slice(salt).expect("HMAC accepts keys of any length");
    mac.update(password.as_bytes());
    mac.verify_slice(verifier).is_ok()
}

fn map_store_error(error: CredentialStoreError) -> Error {
    Error::storage(format!("credential store unavailable: {error}"))
}

/// Domain service authenticating users against the credential store.
#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
}

impl AuthService {
    /// Create a new service over the given credential store.
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self { credentials }
    }

    /// Validate credentials and return the authenticated user.
    ///
    /// Returns the same `InvalidCredentials` error for an unknown identifier
    /// and for a password mismatch.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let rejected = || Error::invalid_credentials("incorrect email or password");

        let record = self
            .credentials
            .find_by_email(credentials.email())
            .await
            .map_err(map_store_error)?
            .ok_or_else(rejected)?;

        if !verify_password(credentials.password(), &record.salt, &record.verifier) {
            return Err(rejected());
        }

        Ok(record.user)
    }

    /// Re-validate a session's user id against the store.
    ///
    /// A session referencing a vanished user is treated as unauthenticated,
    /// not as an internal error.
    pub async fn current_user(&self, id: UserId) -> Result<User, Error> {
        self.credentials
            .find_user(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::unauthenticated("session user no longer exists"))
    }
}
