// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction repository.
//!
//! A transaction is a single income or expense entry filed under one of the
//! owner's categories. Writes that name a category verify, inside the same
//! write transaction, that the category belongs to the same user.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, JsonTable, TRANSACTIONS};
use super::super::ownership::{require_owned, OwnedRecord, OwnedRepository, OwnedResource};
use super::super::StorageResult;
use super::categories::StoredCategory;

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a transaction type is neither `income` nor `expense`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Transaction type must be \"income\" or \"expense\"")]
pub struct InvalidTransactionKind;

impl FromStr for TransactionKind {
    type Err = InvalidTransactionKind;

    /// Exact match only; `"Income"` is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(InvalidTransactionKind),
        }
    }
}

/// Stored transaction record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredTransaction {
    /// Unique transaction identifier (UUID)
    pub id: String,
    /// Short description
    pub title: String,
    /// Amount, always reported as a positive figure; `type` gives the sign
    pub amount: f64,
    /// Income or expense
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Category this transaction is filed under (same owner)
    pub category_id: String,
    /// Owner user ID, fixed at creation
    pub user_id: String,
    /// When the transaction was recorded (ISO-8601)
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for StoredTransaction {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

impl OwnedRecord for StoredTransaction {
    const TABLE: JsonTable = TRANSACTIONS;
    const KIND: &'static str = "Transaction";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields for a new transaction. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub category_id: String,
}

/// Partial update of a transaction; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<String>,
}

/// Repository for transaction operations.
pub struct TransactionRepository<'a> {
    records: OwnedRepository<'a, StoredTransaction>,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new TransactionRepository.
    pub fn new(db: &'a Database) -> Self {
        Self {
            records: OwnedRepository::new(db),
        }
    }

    /// List a user's transactions, newest first.
    pub fn list(&self, owner_user_id: &str) -> StorageResult<Vec<StoredTransaction>> {
        self.records.list(owner_user_id)
    }

    /// Get a transaction, only if owned by the user.
    pub fn get(
        &self,
        transaction_id: &str,
        owner_user_id: &str,
    ) -> StorageResult<Option<StoredTransaction>> {
        self.records.get(transaction_id, owner_user_id)
    }

    /// Record a transaction owned by `owner_user_id`.
    ///
    /// Fails with `NotFound` if the category is missing or owned by someone
    /// else; nothing is written in that case.
    pub fn create(
        &self,
        owner_user_id: &str,
        fields: NewTransaction,
    ) -> StorageResult<StoredTransaction> {
        let transaction = StoredTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            title: fields.title,
            amount: fields.amount,
            kind: fields.kind,
            category_id: fields.category_id,
            user_id: owner_user_id.to_string(),
            created_at: Utc::now(),
        };

        self.records.insert_with(&transaction, |txn, tx| {
            require_owned::<StoredCategory>(txn, &tx.category_id, &tx.user_id)?;
            Ok(())
        })?;
        Ok(transaction)
    }

    /// Apply a partial update to an owned transaction.
    pub fn update(
        &self,
        transaction_id: &str,
        owner_user_id: &str,
        changes: TransactionChanges,
    ) -> StorageResult<StoredTransaction> {
        self.records
            .update_with(transaction_id, owner_user_id, |txn, tx| {
                if let Some(category_id) = changes.category_id {
                    require_owned::<StoredCategory>(txn, &category_id, owner_user_id)?;
                    tx.category_id = category_id;
                }
                if let Some(title) = changes.title {
                    tx.title = title;
                }
                if let Some(amount) = changes.amount {
                    tx.amount = amount;
                }
                if let Some(kind) = changes.kind {
                    tx.kind = kind;
                }
                Ok(())
            })
    }

    /// Delete an owned transaction.
    pub fn delete(&self, transaction_id: &str, owner_user_id: &str) -> StorageResult<()> {
        self.records.remove(transaction_id, owner_user_id)?;
        Ok(())
    }
}
