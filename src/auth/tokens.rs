// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token issuance and verification.
//!
//! Verification has exactly two outcomes: valid claims, or nothing. The
//! reason a token was rejected (bad signature, expired, wrong algorithm,
//! garbage) is logged at debug level and otherwise discarded.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use super::error::AuthError;
use crate::config::{ConfigError, DEFAULT_TOKEN_TTL_DAYS, JWT_SECRET_ENV};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Signs and verifies bearer tokens with a server-held secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    /// Build a service around `secret`. An empty secret is a configuration error.
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::Missing(JWT_SECRET_ENV));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Mint a token for `user_id` / `email`, valid from now.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Mint a token as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: &str,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::TokenSigning("expiry out of range".to_string()))?;
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Decode and validate a token. Any failure yields `None`.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        match decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                None
            }
        }
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("keys", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    fn service() -> TokenService {
        TokenService::new("test-secret").unwrap()
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            TokenService::new(""),
            Err(ConfigError::Missing(JWT_SECRET_ENV))
        ));
    }

    #[test]
    fn issued_token_round_trips() {
        let tokens = service();
        for (user_id, email) in [
            ("3f1c2d9e-1b7a-4c55-9a0e-2b8f6d4e7a11", "ana@x.com"),
            ("u", "Mixed.Case+tag@Example.ORG"),
            ("user with spaces", "ünïcode@exämple.com"),
        ] {
            let token = tokens.issue(user_id, email).unwrap();
            let claims = tokens.verify(&token).expect("fresh token verifies");
            assert_eq!(claims.user_id, user_id);
            assert_eq!(claims.email, email);
            assert_eq!(claims.exp - claims.iat, Duration::days(7).num_seconds());
        }
    }

    #[test]
    fn token_expires_after_seven_days() {
        let tokens = service();

        let inside = tokens
            .issue_at("u1", "a@x.com", Utc::now() - Duration::days(6))
            .unwrap();
        assert!(tokens.verify(&inside).is_some());

        let expired = tokens
            .issue_at("u1", "a@x.com", Utc::now() - Duration::days(7) - Duration::minutes(5))
            .unwrap();
        assert!(tokens.verify(&expired).is_none());
    }

    #[test]
    fn custom_ttl_is_honored() {
        let tokens = service().with_ttl(Duration::hours(1));
        let stale = tokens
            .issue_at("u1", "a@x.com", Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(tokens.verify(&stale).is_none());
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let tokens = service().with_ttl(Duration::MAX);
        assert!(matches!(
            tokens.issue("u1", "a@x.com"),
            Err(AuthError::TokenSigning(_))
        ));
    }

    #[test]
    fn any_flipped_signature_byte_is_rejected() {
        let tokens = service();
        let token = tokens.issue("u1", "a@x.com").unwrap();
        let (signed, signature) = token.rsplit_once('.').unwrap();
        let signature = URL_SAFE_NO_PAD.decode(signature).unwrap();

        for i in 0..signature.len() {
            let mut tampered = signature.clone();
            tampered[i] ^= 0x01;
            let forged = format!("{signed}.{}", URL_SAFE_NO_PAD.encode(&tampered));
            assert!(tokens.verify(&forged).is_none(), "byte {i} flip accepted");
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue("u1", "a@x.com").unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let payload = String::from_utf8(payload).unwrap().replace("u1", "u2");
        let forged = format!(
            "{}.{}.{}",
            parts[0],
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            parts[2]
        );
        assert!(tokens.verify(&forged).is_none());
    }

    #[test]
    fn foreign_secret_and_garbage_are_rejected() {
        let ours = service();
        let theirs = TokenService::new("another-secret").unwrap();
        let token = theirs.issue("u1", "a@x.com").unwrap();

        assert!(ours.verify(&token).is_none());
        assert!(ours.verify("").is_none());
        assert!(ours.verify("not-a-token").is_none());
        assert!(ours.verify("a.b.c").is_none());
    }

    #[test]
    fn unsigned_token_is_rejected() {
        let tokens = service();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            format!(
                r#"{{"userId":"u1","email":"a@x.com","iat":{},"exp":9999999999}}"#,
                Utc::now().timestamp()
            )
            .as_bytes(),
        );
        assert!(tokens.verify(&format!("{header}.{payload}.")).is_none());
    }

    #[test]
    fn debug_output_redacts_keys() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains("test-secret"));
    }
}
