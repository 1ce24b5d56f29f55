// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{PasswordHashing, TokenService};
use crate::storage::Database;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHashing,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenService, passwords: PasswordHashing) -> Self {
        Self {
            db: Arc::new(db),
            tokens: Arc::new(tokens),
            passwords,
        }
    }
}

/// In-memory state with cheap password hashing, for tests.
#[cfg(test)]
pub fn test_state() -> AppState {
    AppState::new(
        Database::in_memory().unwrap(),
        TokenService::new("test-secret").unwrap(),
        PasswordHashing::with_params(crate::auth::password::fast_params()).unwrap(),
    )
}
