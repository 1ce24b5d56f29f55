// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are the identity anchor for every owned record. The email index is
//! checked and written in the same write transaction as the user row, so two
//! concurrent registrations for one email cannot both succeed.
//!
//! ## Security
//!
//! - Only the Argon2 password hash is stored, never the raw password
//! - The hash is NEVER returned via API (see [`UserResponse`])

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{get_json, put_json, Database, USERS, USERS_BY_EMAIL};
use super::super::{StorageError, StorageResult};

/// User record as stored.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, unique and compared case-sensitively
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// User view returned to API clients (never includes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// When the account was created (ISO-8601)
    pub created_at: DateTime<Utc>,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Repository for user accounts.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Get a user by ID.
    pub fn get(&self, user_id: &str) -> StorageResult<Option<StoredUser>> {
        self.db.read(USERS, user_id)
    }

    /// Find a user by exact email.
    pub fn find_by_email(&self, email: &str) -> StorageResult<Option<StoredUser>> {
        self.db.view(|txn| {
            let index = txn.open_table(USERS_BY_EMAIL)?;
            let user_id = match index.get(email)? {
                Some(id) => id.value().to_string(),
                None => return Ok(None),
            };

            let users = txn.open_table(USERS)?;
            get_json(&users, &user_id)
        })
    }

    /// Create a new user, enforcing email uniqueness.
    pub fn create(&self, user: &StoredUser) -> StorageResult<()> {
        self.db.transact(|txn| {
            let mut index = txn.open_table(USERS_BY_EMAIL)?;
            if index.get(user.email.as_str())?.is_some() {
                return Err(StorageError::AlreadyExists(
                    "Email already registered".to_string(),
                ));
            }
            index.insert(user.email.as_str(), user.id.as_str())?;

            let mut users = txn.open_table(USERS)?;
            put_json(&mut users, &user.id, user)
        })
    }
}
