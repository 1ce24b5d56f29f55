// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2id password hashing.
//!
//! Verification against an unknown account still runs a full Argon2
//! comparison against a dummy hash built with the same parameters, so a
//! missing email costs the same time as a wrong password.

use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::RngCore;

use super::error::AuthError;

const SALT_LEN: usize = 16;

/// Hashes and verifies passwords. Cheap to clone.
#[derive(Clone)]
pub struct PasswordHashing {
    params: Params,
    dummy_hash: String,
}

impl PasswordHashing {
    /// Argon2id with the library's recommended parameters.
    pub fn new() -> Result<Self, AuthError> {
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Result<Self, AuthError> {
        let mut hashing = Self {
            params,
            dummy_hash: String::new(),
        };
        hashing.dummy_hash = hashing.hash("timing-equalization-placeholder")?;
        Ok(hashing)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt, returning a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        let salt = SaltString::encode_b64(&bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Check `password` against `stored_hash`.
    ///
    /// With no stored hash the dummy hash is checked instead and the result
    /// is always `false`. An unparsable stored hash also yields `false`.
    pub fn verify(&self, password: &str, stored_hash: Option<&str>) -> bool {
        let (candidate, known) = match stored_hash {
            Some(hash) => (hash, true),
            None => (self.dummy_hash.as_str(), false),
        };

        let matches = match PasswordHash::new(candidate) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                false
            }
        };
        known && matches
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_async(&self, password: String) -> Result<String, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_async(
        &self,
        password: String,
        stored_hash: Option<String>,
    ) -> Result<bool, AuthError> {
        let hashing = self.clone();
        tokio::task::spawn_blocking(move || hashing.verify(&password, stored_hash.as_deref()))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}

#[cfg(test)]
pub(crate) fn fast_params() -> Params {
    // Minimum Argon2 cost; tests only.
    Params::new(8, 1, 1, None).unwrap()
}
