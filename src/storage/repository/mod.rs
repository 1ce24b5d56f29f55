// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the ledger database.
//!
//! Each repository provides CRUD operations for a specific entity type.
//! Category and transaction repositories are owner-scoped.

pub mod categories;
pub mod transactions;
pub mod users;

pub use categories::{CategoryChanges, CategoryRepository, NewCategory, StoredCategory};
pub use transactions::{
    InvalidTransactionKind, NewTransaction, StoredTransaction, TransactionChanges,
    TransactionKind, TransactionRepository,
};
pub use users::{StoredUser, UserRepository, UserResponse};
