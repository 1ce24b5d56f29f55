// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the ledger API.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with email and password
//! 2. Server returns an HS256 token carrying `userId` and `email`
//! 3. Client sends `Authorization: Bearer <token>` on later requests
//! 4. Server builds an identity context for every request:
//!    - valid token → authenticated
//!    - anything else → anonymous (never an error)
//! 5. Owner-scoped handlers run the gate first; anonymous → 401
//!
//! ## Security
//!
//! - Passwords are stored as Argon2id hashes only
//! - Login failure gives one message whether the email or password was wrong
//! - Tokens expire after 7 days by default; there is no revocation list
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod tokens;

pub use claims::{AuthenticatedUser, IdentityContext, TokenClaims};
pub use error::AuthError;
pub use extractor::{build_context, require_auth, Identity};
pub use password::PasswordHashing;
pub use tokens::TokenService;
