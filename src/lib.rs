// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Ledger - Personal Finance Tracker Service
//!
//! Users register, log in with a bearer token, and manage their own
//! spending/income categories and transactions. Every category and
//! transaction operation is scoped to the authenticated owner.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance/verification, password hashing, request identity
//! - `storage` - Embedded ledger database (redb) and owner-scoped repositories

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
