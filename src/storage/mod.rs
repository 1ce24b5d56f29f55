// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Storage Module
//!
//! Persistent storage for users, categories and transactions in a single
//! embedded redb file.
//!
//! ## Ownership Model
//!
//! - Every category and transaction carries the `user_id` of its owner
//! - Reads, updates and deletes are keyed by record id AND owner id
//! - A record owned by someone else is reported as "not found"
//! - A transaction may only reference a category of the same owner
//!
//! ## Storage Layout
//!
//! ```text
//! data/finance.redb
//!   users            user_id        -> StoredUser (JSON)
//!   users_by_email   email          -> user_id
//!   categories       category_id    -> StoredCategory (JSON)
//!   transactions     transaction_id -> StoredTransaction (JSON)
//! ```

pub mod database;
pub mod ownership;
pub mod repository;

pub use database::{Database, StorageError, StorageResult};
pub use ownership::{OwnedRecord, OwnedRepository, OwnedResource};
pub use repository::{
    CategoryChanges, CategoryRepository, NewCategory, NewTransaction, StoredCategory,
    StoredTransaction, StoredUser, TransactionChanges, TransactionKind, TransactionRepository,
    UserRepository, UserResponse,
};
