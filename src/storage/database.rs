// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded diet database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: normalized email → user_id (uniqueness)
//! - `foods`: food_id → serialized Food
//! - `foods_by_name`: lowercased name → food_id (uniqueness)
//! - `food_items`: item_id → serialized FoodItem
//! - `food_items_by_user`: composite key (user_id|timestamp|item_id) → ()
//! - `sequences`: table name → last assigned id

use std::path::Path;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

pub(crate) const USERS_BY_EMAIL: TableDefinition<&str, u64> =
    TableDefinition::new("users_by_email");

pub(crate) const FOODS: TableDefinition<u64, &[u8]> = TableDefinition::new("foods");

pub(crate) const FOODS_BY_NAME: TableDefinition<&str, u64> = TableDefinition::new("foods_by_name");

pub(crate) const FOOD_ITEMS: TableDefinition<u64, &[u8]> = TableDefinition::new("food_items");

/// Index: composite key → unit.
/// Key format: `user_id_be | timestamp_millis_be (sign flipped) | item_id_be`
/// so a forward range scan yields one user's items in time order.
pub(crate) const FOOD_ITEMS_BY_USER: TableDefinition<&[u8], ()> =
    TableDefinition::new("food_items_by_user");

/// Last id handed out per entity table.
const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("corrupt data: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// DietDatabase
// =============================================================================

/// Embedded ACID database holding users, the food catalog and food items.
pub struct DietDatabase {
    db: Database,
}

impl DietDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(FOODS)?;
            let _ = write_txn.open_table(FOODS_BY_NAME)?;
            let _ = write_txn.open_table(FOOD_ITEMS)?;
            let _ = write_txn.open_table(FOOD_ITEMS_BY_USER)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "diet database opened");
        Ok(Self { db })
    }

    pub(crate) fn begin_read(&self) -> StoreResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }

    pub(crate) fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap liveness probe used by the readiness endpoint.
    pub fn check(&self) -> StoreResult<()> {
        let read_txn = self.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

/// Reserve the next id for `table` inside an open write transaction.
pub(crate) fn next_id(write_txn: &WriteTransaction, table: &str) -> StoreResult<u64> {
    let mut sequences = write_txn.open_table(SEQUENCES)?;
    let last = sequences.get(table)?.map(|v| v.value()).unwrap_or(0);
    let next = last + 1;
    sequences.insert(table, next)?;
    Ok(next)
}

/// Load and deserialize the JSON row stored under `id`.
pub(crate) fn read_row<T, Tbl>(table: &Tbl, id: u64) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    Tbl: ReadableTable<u64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

pub(crate) fn encode_row<T: Serialize>(row: &T) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(row)?)
}

// =============================================================================
// Tests
// =============================================================================
