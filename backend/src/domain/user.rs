//! User identity and role model.
//!
//! Users are provisioned by an administrative process outside this core and
//! never destroyed by it. The domain only reads identity and role; password
//! material stays inside the credential store and [`crate::domain::auth`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable user identifier assigned by the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw store identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier as stored.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authorization role gating ticket operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user: may open tickets, close their own, and append blocks.
    Normal,
    /// Administrator: may also reopen tickets and reassign categories.
    Admin,
}

impl Role {
    /// Whether this role carries administrative authority.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Stable storage label for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Admin => "admin",
        }
    }
}

/// Error returned when decoding a stored role label fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role label: {label}")]
pub struct UnknownRole {
    label: String,
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "normal" => Ok(Self::Normal),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole {
                label: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application user as seen by the ticket authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: String,
    username: String,
    role: Role,
}

impl User {
    /// Build a user from store-validated components.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        username: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
            role,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique login identifier.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Display identity shown alongside tickets and blocks.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Authorization role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Minimal public profile returned after session establishment.
///
/// Never carries password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_owned(),
            username: user.username().to_owned(),
            role: user.role(),
        }
    }
}
