// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership-scoped record access.
//!
//! Every read, update and delete of an owned record is keyed by both the
//! record id and the caller's user id. A record owned by another user is
//! reported exactly like a missing one, so callers can never distinguish
//! "does not exist" from "belongs to someone else".

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use redb::{ReadableTable, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

use super::database::{get_json, put_json, Database, JsonTable};
use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_user_id(&self) -> &str;
}

/// An owned resource persisted as a JSON row in its own table.
pub trait OwnedRecord: OwnedResource + Serialize + DeserializeOwned {
    /// Table holding records of this kind.
    const TABLE: JsonTable;
    /// Human-readable kind, used in "not found" messages.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Message returned when a record is absent or not owned by the caller.
    fn not_found() -> StorageError {
        StorageError::NotFound(format!("{} not found", Self::KIND))
    }
}

/// Load a record inside a write transaction, only if `owner_user_id` owns it.
pub fn find_owned<R: OwnedRecord>(
    txn: &WriteTransaction,
    id: &str,
    owner_user_id: &str,
) -> StorageResult<Option<R>> {
    let table = txn.open_table(R::TABLE)?;
    let record: Option<R> = get_json(&table, id)?;
    Ok(record.filter(|r| r.owner_user_id() == owner_user_id))
}

/// Like [`find_owned`], but absence is an error.
pub fn require_owned<R: OwnedRecord>(
    txn: &WriteTransaction,
    id: &str,
    owner_user_id: &str,
) -> StorageResult<R> {
    find_owned(txn, id, owner_user_id)?.ok_or_else(R::not_found)
}

/// Generic owner-scoped repository shared by every owned record kind.
pub struct OwnedRepository<'a, R> {
    db: &'a Database,
    marker: PhantomData<fn() -> R>,
}

impl<'a, R: OwnedRecord> OwnedRepository<'a, R> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            marker: PhantomData,
        }
    }

    /// All records owned by a user, newest first.
    pub fn list(&self, owner_user_id: &str) -> StorageResult<Vec<R>> {
        let mut records = self
            .db
            .scan(R::TABLE, |record: &R| record.owner_user_id() == owner_user_id)?;
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    /// A record by id, only if the user owns it.
    pub fn get(&self, id: &str, owner_user_id: &str) -> StorageResult<Option<R>> {
        let record: Option<R> = self.db.read(R::TABLE, id)?;
        Ok(record.filter(|r| r.owner_user_id() == owner_user_id))
    }

    /// Insert a new record after `check` accepts it, in one write transaction.
    pub fn insert_with(
        &self,
        record: &R,
        check: impl FnOnce(&WriteTransaction, &R) -> StorageResult<()>,
    ) -> StorageResult<()> {
        self.db.transact(|txn| {
            check(txn, record)?;

            let mut table = txn.open_table(R::TABLE)?;
            if table.get(record.id())?.is_some() {
                return Err(StorageError::AlreadyExists(format!(
                    "{} {}",
                    R::KIND,
                    record.id()
                )));
            }
            put_json(&mut table, record.id(), record)
        })
    }

    pub fn insert(&self, record: &R) -> StorageResult<()> {
        self.insert_with(record, |_, _| Ok(()))
    }

    /// Load an owned record, let `apply` mutate it, and write it back.
    ///
    /// The owner of the stored record is restored after `apply` runs, so an
    /// update can never move a record to another user.
    pub fn update_with(
        &self,
        id: &str,
        owner_user_id: &str,
        apply: impl FnOnce(&WriteTransaction, &mut R) -> StorageResult<()>,
    ) -> StorageResult<R>
    where
        R: Clone,
    {
        self.db.transact(|txn| {
            let original: R = require_owned(txn, id, owner_user_id)?;
            let mut record = original.clone();
            apply(txn, &mut record)?;

            if record.owner_user_id() != original.owner_user_id() || record.id() != original.id()
            {
                return Err(R::not_found());
            }

            let mut table = txn.open_table(R::TABLE)?;
            put_json(&mut table, id, &record)?;
            Ok(record)
        })
    }

    /// Delete an owned record after `check` accepts it.
    pub fn remove_with(
        &self,
        id: &str,
        owner_user_id: &str,
        check: impl FnOnce(&WriteTransaction, &R) -> StorageResult<()>,
    ) -> StorageResult<R> {
        self.db.transact(|txn| {
            let record: R = require_owned(txn, id, owner_user_id)?;
            check(txn, &record)?;

            let mut table = txn.open_table(R::TABLE)?;
            table.remove(id)?;
            Ok(record)
        })
    }

    pub fn remove(&self, id: &str, owner_user_id: &str) -> StorageResult<R> {
        self.remove_with(id, owner_user_id, |_, _| Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::database::CATEGORIES;
    use chrono::Duration;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        id: String,
        owner: String,
        body: String,
        created_at: DateTime<Utc>,
    }

    impl OwnedResource for Note {
        fn owner_user_id(&self) -> &str {
            &self.owner
        }
    }

    impl OwnedRecord for Note {
        const TABLE: JsonTable = CATEGORIES;
        const KIND: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }

        fn created_at(&self) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn note(id: &str, owner: &str, age_minutes: i64) -> Note {
        Note {
            id: id.to_string(),
            owner: owner.to_string(),
            body: format!("body of {id}"),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn list_is_scoped_and_newest_first() {
        let db = Database::in_memory().unwrap();
        let repo = OwnedRepository::<Note>::new(&db);

        repo.insert(&note("old", "user_a", 30)).unwrap();
        repo.insert(&note("new", "user_a", 1)).unwrap();
        repo.insert(&note("mid", "user_a", 10)).unwrap();
        repo.insert(&note("foreign", "user_b", 0)).unwrap();

        let ids: Vec<String> = repo
            .list("user_a")
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn foreign_record_is_indistinguishable_from_missing() {
        let db = Database::in_memory().unwrap();
        let repo = OwnedRepository::<Note>::new(&db);
        repo.insert(&note("n1", "user_a", 0)).unwrap();

        assert!(repo.get("n1", "user_a").unwrap().is_some());
        assert!(repo.get("n1", "user_b").unwrap().is_none());

        let foreign_update = repo
            .update_with("n1", "user_b", |_, n| {
                n.body = "hijacked".to_string();
                Ok(())
            })
            .unwrap_err();
        let missing_update = repo.update_with("nope", "user_b", |_, _| Ok(())).unwrap_err();
        assert_eq!(foreign_update.to_string(), missing_update.to_string());

        let foreign_delete = repo.remove("n1", "user_b").unwrap_err();
        assert!(matches!(foreign_delete, StorageError::NotFound(_)));

        let still_there = repo.get("n1", "user_a").unwrap().unwrap();
        assert_eq!(still_there.body, "body of n1");
    }

    #[test]
    fn update_cannot_transfer_ownership() {
        let db = Database::in_memory().unwrap();
        let repo = OwnedRepository::<Note>::new(&db);
        repo.insert(&note("n1", "user_a", 0)).unwrap();

        let result = repo.update_with("n1", "user_a", |_, n| {
            n.owner = "user_b".to_string();
            Ok(())
        });
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(repo.get("n1", "user_a").unwrap().is_some());
        assert!(repo.get("n1", "user_b").unwrap().is_none());
    }

    #[test]
    fn remove_deletes_owned_record() {
        let db = Database::in_memory().unwrap();
        let repo = OwnedRepository::<Note>::new(&db);
        repo.insert(&note("n1", "user_a", 0)).unwrap();

        let removed = repo.remove("n1", "user_a").unwrap();
        assert_eq!(removed.id, "n1");
        assert!(repo.get("n1", "user_a").unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let db = Database::in_memory().unwrap();
        let repo = OwnedRepository::<Note>::new(&db);
        repo.insert(&note("n1", "user_a", 0)).unwrap();

        let result = repo.insert(&note("n1", "user_a", 0));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }
}
