// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are stored as JSON rows keyed by their numeric id. A secondary index
//! maps the normalized email to the id and enforces uniqueness.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::models::{User, UserId};
use crate::storage::database::{
    encode_row, next_id, read_row, DietDatabase, StoreError, StoreResult, USERS, USERS_BY_EMAIL,
};

/// Conflict message returned when signing up with an email already in use.
pub const EMAIL_NOT_AVAILABLE: &str = "This email is not available";

/// User row as persisted. Carries the bcrypt hash, so it is never serialized
/// into an API response; convert with [`StoredUser::to_user`].
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Index key for an email: NFKC, trimmed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.nfkc().collect::<String>().trim().to_lowercase()
}

/// Fields needed to create a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub password_hash: &'a str,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a DietDatabase,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DietDatabase) -> Self {
        Self { db }
    }

    /// Create a user. Fails with `Conflict` if the email is already taken.
    pub fn create(&self, new_user: NewUser<'_>) -> StoreResult<StoredUser> {
        let email_key = normalize_email(new_user.email);

        let write_txn = self.db.begin_write()?;
        let user = {
            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            if by_email.get(email_key.as_str())?.is_some() {
                return Err(StoreError::Conflict(EMAIL_NOT_AVAILABLE.to_string()));
            }

            let id = UserId(next_id(&write_txn, "users")?);
            let user = StoredUser {
                id,
                email: new_user.email.trim().to_string(),
                first_name: new_user.first_name.to_string(),
                last_name: new_user.last_name.to_string(),
                password_hash: new_user.password_hash.to_string(),
                created_at: Utc::now(),
            };

            let json = encode_row(&user)?;
            let mut users = write_txn.open_table(USERS)?;
            users.insert(id.get(), json.as_slice())?;
            by_email.insert(email_key.as_str(), id.get())?;
            user
        };
        write_txn.commit()?;

        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Primary-key lookup.
    pub fn get(&self, id: UserId) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        read_row(&users, id.get())
    }

    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredUser>> {
        let email_key = normalize_email(email);
        let read_txn = self.db.begin_read()?;
        let by_email = read_txn.open_table(USERS_BY_EMAIL)?;
        let Some(id) = by_email.get(email_key.as_str())?.map(|v| v.value()) else {
            return Ok(None);
        };

        let users = read_txn.open_table(USERS)?;
        match read_row::<StoredUser, _>(&users, id)? {
            Some(user) => Ok(Some(user)),
            None => Err(StoreError::Corrupt(format!(
                "email index points at missing user {id}"
            ))),
        }
    }

    /// Delete a user and its email index entry.
    pub fn delete(&self, id: UserId) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let user: StoredUser = {
                let existing = users
                    .get(id.get())?
                    .ok_or_else(|| StoreError::NotFound(format!("User {id}")))?;
                serde_json::from_slice(existing.value())?
            };
            users.remove(id.get())?;

            let mut by_email = write_txn.open_table(USERS_BY_EMAIL)?;
            by_email.remove(normalize_email(&user.email).as_str())?;
        }
        write_txn.commit()?;

        tracing::info!(user_id = %id, "user deleted");
        Ok(())
    }
}
