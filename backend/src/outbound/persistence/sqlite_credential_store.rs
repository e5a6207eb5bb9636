//! SQLite-backed credential store and account provisioning.
//!
//! Salts and verifiers are stored hex-encoded; only `domain::auth` interprets
//! the decoded bytes.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;

use crate::domain::auth::derive_verifier;
use crate::domain::ports::{CredentialRecord, CredentialStore, CredentialStoreError};
use crate::domain::user::{Role, User, UserId};

use super::error_mapping::map_run_error;
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, RunError};
use super::schema::users;

/// Fields for provisioning a user account.
pub struct NewUserAccount {
    pub email: String,
    pub username: String,
    pub role: Role,
    pub password: String,
}

/// Diesel-backed implementation of the credential store port.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: DbPool,
}

impl SqliteCredentialStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Provision a new account with a freshly salted password verifier.
    ///
    /// Accounts are created by an administrative process, not by a public
    /// endpoint; the email must be unique.
    pub async fn provision(&self, account: NewUserAccount) -> Result<User, CredentialStoreError> {
        let NewUserAccount {
            email,
            username,
            role,
            password,
        } = account;

        let salt: [u8; 16] = rand::random();
        let verifier = derive_verifier(&password, &salt);
        let salt_hex = hex::encode(salt);
        let verifier_hex = hex::encode(verifier);

        let (stored_email, stored_username) = (email.clone(), username.clone());
        let id = self
            .pool
            .run(move |conn| {
                let row = NewUserRow {
                    email: &stored_email,
                    username: &stored_username,
                    role: role.as_str(),
                    salt: &salt_hex,
                    verifier: &verifier_hex,
                    created_at: Utc::now().naive_utc(),
                };
                diesel::insert_into(users::table)
                    .values(&row)
                    .returning(users::id)
                    .get_result::<i64>(conn)
            })
            .await
            .map_err(map_error)?;

        Ok(User::new(UserId::new(id), email, username, role))
    }
}

fn map_error(error: RunError) -> CredentialStoreError {
    map_run_error(
        error,
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

fn row_to_user(row: &UserRow) -> Result<User, CredentialStoreError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|err| CredentialStoreError::query(format!("decode role: {err}")))?;
    Ok(User::new(
        UserId::new(row.id),
        row.email.clone(),
        row.username.clone(),
        role,
    ))
}

fn row_to_record(row: UserRow) -> Result<CredentialRecord, CredentialStoreError> {
    let user = row_to_user(&row)?;
    let salt = hex::decode(&row.salt)
        .map_err(|err| CredentialStoreError::query(format!("decode salt: {err}")))?;
    let verifier = hex::decode(&row.verifier)
        .map_err(|err| CredentialStoreError::query(format!("decode verifier: {err}")))?;
    Ok(CredentialRecord {
        user,
        salt,
        verifier,
    })
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, CredentialStoreError> {
        let email = email.to_owned();
        let row = self
            .pool
            .run(move |conn| {
                users::table
                    .filter(users::email.eq(email))
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()
            })
            .await
            .map_err(map_error)?;

        row.map(row_to_record).transpose()
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, CredentialStoreError> {
        let row = self
            .pool
            .run(move |conn| {
                users::table
                    .find(id.as_i64())
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()
            })
            .await
            .map_err(map_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}
