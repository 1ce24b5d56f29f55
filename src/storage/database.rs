// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded ledger database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `users_by_email`: exact email → user_id (uniqueness index)
//! - `categories`: category_id → serialized StoredCategory
//! - `transactions`: transaction_id → serialized StoredTransaction
//!
//! Records are stored as JSON bytes. Every write goes through
//! [`Database::transact`], so multi-table checks (email uniqueness, category
//! ownership on transaction writes) commit or abort as one unit.

use std::path::Path;

use redb::{
    backends::InMemoryBackend, Database as RedbDatabase, ReadTransaction, ReadableDatabase,
    ReadableTable, ReadableTableMetadata, Table, TableDefinition, WriteTransaction,
};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Table keyed by record id holding JSON-encoded records.
pub type JsonTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub const USERS: JsonTable = TableDefinition::new("users");

/// Index: email (exact, case-sensitive) → user_id.
pub const USERS_BY_EMAIL: TableDefinition<&str, &str> = TableDefinition::new("users_by_email");

/// Primary table: category_id → serialized StoredCategory.
pub const CATEGORIES: JsonTable = TableDefinition::new("categories");

/// Primary table: transaction_id → serialized StoredTransaction.
pub const TRANSACTIONS: JsonTable = TableDefinition::new("transactions");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
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

    /// Record is absent, or owned by someone else.
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint violated.
    #[error("{0}")]
    AlreadyExists(String),

    /// Record is still referenced by other records.
    #[error("{0}")]
    InUse(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// JSON Row Helpers
// =============================================================================

/// Read and decode a JSON row from any readable table.
pub fn get_json<T, R>(table: &R, id: &str) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON row.
pub fn put_json<T: Serialize>(
    table: &mut Table<'_, &'static str, &'static [u8]>,
    id: &str,
    value: &T,
) -> StorageResult<()> {
    let json = serde_json::to_vec(value)?;
    table.insert(id, json.as_slice())?;
    Ok(())
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID ledger database.
pub struct Database {
    db: RedbDatabase,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    error = %e,
                    dir = %parent.display(),
                    "Could not create database directory"
                );
            }
        }
        Self::initialize(RedbDatabase::create(path)?)
    }

    /// Create a database that lives only in memory.
    pub fn in_memory() -> StorageResult<Self> {
        let db = RedbDatabase::builder().create_with_backend(InMemoryBackend::new())?;
        Self::initialize(db)
    }

    fn initialize(db: RedbDatabase) -> StorageResult<Self> {
        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERS_BY_EMAIL)?;
            let _ = write_txn.open_table(CATEGORIES)?;
            let _ = write_txn.open_table(TRANSACTIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Run `f` inside a read transaction.
    pub fn view<T>(
        &self,
        f: impl FnOnce(&ReadTransaction) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let read_txn = self.db.begin_read()?;
        f(&read_txn)
    }

    /// Run `f` inside a write transaction, committing only if it succeeds.
    pub fn transact<T>(
        &self,
        f: impl FnOnce(&WriteTransaction) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let write_txn = self.db.begin_write()?;
        match f(&write_txn) {
            Ok(value) => {
                write_txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(abort) = write_txn.abort() {
                    tracing::warn!(error = %abort, "Failed to abort write transaction");
                }
                Err(e)
            }
        }
    }

    /// Look up a single JSON record by id.
    pub fn read<T: DeserializeOwned>(
        &self,
        table: JsonTable,
        id: &str,
    ) -> StorageResult<Option<T>> {
        self.view(|txn| get_json(&txn.open_table(table)?, id))
    }

    /// Decode every record of a table, keeping those accepted by `keep`.
    pub fn scan<T: DeserializeOwned>(
        &self,
        table: JsonTable,
        keep: impl Fn(&T) -> bool,
    ) -> StorageResult<Vec<T>> {
        self.view(|txn| {
            let table = txn.open_table(table)?;
            let mut records = Vec::new();
            for entry in table.iter()? {
                let (_, value) = entry?;
                let record: T = serde_json::from_slice(value.value())?;
                if keep(&record) {
                    records.push(record);
                }
            }
            Ok(records)
        })
    }

    /// Verify the database answers a read transaction.
    pub fn health_check(&self) -> StorageResult<()> {
        self.view(|txn| {
            let users = txn.open_table(USERS)?;
            users.len()?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Row {
        id: String,
        value: i32,
    }

    fn write_row(db: &Database, row: &Row) {
        db.transact(|txn| {
            let mut table = txn.open_table(CATEGORIES)?;
            put_json(&mut table, &row.id, row)
        })
        .unwrap();
    }

    #[test]
    fn write_and_read_json() {
        let db = Database::in_memory().unwrap();
        let row = Row {
            id: "row-1".to_string(),
            value: 42,
        };
        write_row(&db, &row);

        let loaded: Option<Row> = db.read(CATEGORIES, "row-1").unwrap();
        assert_eq!(loaded, Some(row));

        let missing: Option<Row> = db.read(CATEGORIES, "row-2").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn scan_applies_filter() {
        let db = Database::in_memory().unwrap();
        for i in 1..=4 {
            write_row(
                &db,
                &Row {
                    id: format!("row-{i}"),
                    value: i,
                },
            );
        }

        let even: Vec<Row> = db.scan(CATEGORIES, |row: &Row| row.value % 2 == 0).unwrap();
        assert_eq!(even.len(), 2);
        assert!(even.iter().all(|row| row.value % 2 == 0));
    }

    #[test]
    fn failed_transaction_is_rolled_back() {
        let db = Database::in_memory().unwrap();
        let result: StorageResult<()> = db.transact(|txn| {
            let mut table = txn.open_table(CATEGORIES)?;
            put_json(
                &mut table,
                "row-1",
                &Row {
                    id: "row-1".to_string(),
                    value: 1,
                },
            )?;
            Err(StorageError::InUse("abort".to_string()))
        });
        assert!(matches!(result, Err(StorageError::InUse(_))));

        let loaded: Option<Row> = db.read(CATEGORIES, "row-1").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn open_below_a_regular_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let result = Database::open(&blocker.join("ledger.redb"));
        assert!(result.is_err());
    }

    #[test]
    fn open_on_disk_persists_across_handles() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.redb");
        let row = Row {
            id: "row-1".to_string(),
            value: 7,
        };

        {
            let db = Database::open(&path).unwrap();
            write_row(&db, &row);
        }

        let db = Database::open(&path).unwrap();
        let loaded: Option<Row> = db.read(CATEGORIES, "row-1").unwrap();
        assert_eq!(loaded, Some(row));
        db.health_check().unwrap();
    }
}
