// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Category repository.
//!
//! Categories group a user's transactions (e.g. "Groceries", "Salary").
//! All access is owner-scoped through [`OwnedRepository`].

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::database::{Database, JsonTable, CATEGORIES, TRANSACTIONS};
use super::super::ownership::{OwnedRecord, OwnedRepository, OwnedResource};
use super::super::{StorageError, StorageResult};
use super::transactions::StoredTransaction;

/// Spending or income category.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCategory {
    /// Unique category identifier (UUID)
    pub id: String,
    /// Category name
    pub name: String,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional icon identifier
    pub icon: Option<String>,
    /// Optional color tag
    pub color: Option<String>,
    /// Owner user ID, fixed at creation
    pub user_id: String,
    /// When the category was created (ISO-8601)
    pub created_at: DateTime<Utc>,
}

impl OwnedResource for StoredCategory {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

impl OwnedRecord for StoredCategory {
    const TABLE: JsonTable = CATEGORIES;
    const KIND: &'static str = "Category";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Fields for a new category. The owner is supplied separately.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// Partial update of a category.
///
/// For the optional fields, the outer `Option` says whether the field was
/// mentioned at all; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub icon: Option<Option<String>>,
    pub color: Option<Option<String>>,
}

impl CategoryChanges {
    fn apply(self, category: &mut StoredCategory) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(icon) = self.icon {
            category.icon = icon;
        }
        if let Some(color) = self.color {
            category.color = color;
        }
    }
}

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    records: OwnedRepository<'a, StoredCategory>,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new CategoryRepository.
    pub fn new(db: &'a Database) -> Self {
        Self {
            records: OwnedRepository::new(db),
        }
    }

    /// List a user's categories, newest first.
    pub fn list(&self, owner_user_id: &str) -> StorageResult<Vec<StoredCategory>> {
        self.records.list(owner_user_id)
    }

    /// Get a category, only if owned by the user.
    pub fn get(
        &self,
        category_id: &str,
        owner_user_id: &str,
    ) -> StorageResult<Option<StoredCategory>> {
        self.records.get(category_id, owner_user_id)
    }

    /// Create a category owned by `owner_user_id`.
    pub fn create(
        &self,
        owner_user_id: &str,
        fields: NewCategory,
    ) -> StorageResult<StoredCategory> {
        let category = StoredCategory {
            id: uuid::Uuid::new_v4().to_string(),
            name: fields.name,
            description: fields.description,
            icon: fields.icon,
            color: fields.color,
            user_id: owner_user_id.to_string(),
            created_at: Utc::now(),
        };
        self.records.insert(&category)?;
        Ok(category)
    }

    /// Apply a partial update to an owned category.
    pub fn update(
        &self,
        category_id: &str,
        owner_user_id: &str,
        changes: CategoryChanges,
    ) -> StorageResult<StoredCategory> {
        self.records
            .update_with(category_id, owner_user_id, |_, category| {
                changes.apply(category);
                Ok(())
            })
    }

    /// Delete an owned category.
    ///
    /// Refused while any of the owner's transactions still reference it.
    pub fn delete(&self, category_id: &str, owner_user_id: &str) -> StorageResult<()> {
        self.records
            .remove_with(category_id, owner_user_id, |txn, category| {
                let transactions = txn.open_table(TRANSACTIONS)?;
                for entry in transactions.iter()? {
                    let (_, value) = entry?;
                    let tx: StoredTransaction = serde_json::from_slice(value.value())?;
                    if tx.category_id == category.id && tx.user_id == category.user_id {
                        return Err(StorageError::InUse(
                            "Category still has transactions".to_string(),
                        ));
                    }
                }
                Ok(())
            })?;
        Ok(())
    }
}
