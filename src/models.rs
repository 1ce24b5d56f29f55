// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the REST API. Stored records
//! (`StoredCategory`, `StoredTransaction`, `UserResponse`) are returned as-is
//! and live in the storage layer.
//!
//! Requests are converted into storage-layer inputs through `into_*`
//! methods that validate every field first, so a rejected request never
//! reaches the database.
//!
//! ## Model Categories
//!
//! - **Auth**: registration, login and the token payload
//! - **Categories**: create and partial update
//! - **Transactions**: create and partial update

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::storage::repository::InvalidTransactionKind;
use crate::storage::{
    CategoryChanges, NewCategory, NewTransaction, TransactionChanges, TransactionKind,
    UserResponse,
};

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

// =============================================================================
// Auth
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::bad_request("Name is required"));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(ApiError::bad_request("A valid email is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthPayload {
    /// Bearer token for subsequent requests
    pub token: String,
    pub user: UserResponse,
}

// =============================================================================
// Shared
// =============================================================================

/// Body of a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteResponse {
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self { deleted: true }
    }
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// An optional field that may be omitted but not set to `null`.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("this field cannot be null"))
}

fn required_text(value: String, field: &str) -> Result<String, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} is required")));
    }
    Ok(value)
}

/// Empty strings are stored as absent.
fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_kind(value: &str) -> Result<TransactionKind, ApiError> {
    value
        .parse()
        .map_err(|e: InvalidTransactionKind| ApiError::bad_request(e.to_string()))
}

fn finite_amount(amount: f64) -> Result<f64, ApiError> {
    if !amount.is_finite() {
        return Err(ApiError::bad_request("Amount must be a finite number"));
    }
    Ok(amount)
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CreateCategoryRequest {
    pub fn into_new_category(self) -> Result<NewCategory, ApiError> {
        Ok(NewCategory {
            name: required_text(self.name, "Name")?,
            description: optional_text(self.description),
            icon: optional_text(self.icon),
            color: optional_text(self.color),
        })
    }
}

/// Partial category update.
///
/// Omitted fields are left untouched; `null` or `""` clears an optional
/// field. `name` can be changed but never cleared.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,
}

impl UpdateCategoryRequest {
    pub fn into_changes(self) -> Result<CategoryChanges, ApiError> {
        Ok(CategoryChanges {
            name: self.name.map(|n| required_text(n, "Name")).transpose()?,
            description: self.description.map(optional_text),
            icon: self.icon.map(optional_text),
            color: self.color.map(optional_text),
        })
    }
}

// =============================================================================
// Transactions
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub title: String,
    pub amount: f64,
    /// `income` or `expense`
    #[serde(rename = "type")]
    pub kind: String,
    pub category_id: String,
}

impl CreateTransactionRequest {
    pub fn into_new_transaction(self) -> Result<NewTransaction, ApiError> {
        let kind = parse_kind(&self.kind)?;
        Ok(NewTransaction {
            title: required_text(self.title, "Title")?,
            amount: finite_amount(self.amount)?,
            kind,
            category_id: self.category_id,
        })
    }
}

/// Partial transaction update; omitted fields are left untouched. Every
/// field is required on the record, so `null` is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(default, deserialize_with = "non_null")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub amount: Option<f64>,
    /// `income` or `expense`
    #[serde(default, rename = "type", deserialize_with = "non_null")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "non_null")]
    pub category_id: Option<String>,
}

impl UpdateTransactionRequest {
    pub fn into_changes(self) -> Result<TransactionChanges, ApiError> {
        Ok(TransactionChanges {
            kind: self.kind.as_deref().map(parse_kind).transpose()?,
            title: self.title.map(|t| required_text(t, "Title")).transpose()?,
            amount: self.amount.map(finite_amount).transpose()?,
            category_id: self.category_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn register_validation() {
        let ok = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in [
            RegisterRequest {
                name: "  ".to_string(),
                ..ok.clone()
            },
            RegisterRequest {
                email: "ana.x.com".to_string(),
                ..ok.clone()
            },
            RegisterRequest {
                password: "short".to_string(),
                ..ok.clone()
            },
        ] {
            assert_eq!(bad.validate().unwrap_err().code, ErrorCode::BadUserInput);
        }
    }

    #[test]
    fn update_category_distinguishes_absent_null_and_empty() {
        let absent: UpdateCategoryRequest = serde_json::from_str(r#"{"name":"Food"}"#).unwrap();
        let changes = absent.into_changes().unwrap();
        assert_eq!(changes.name.as_deref(), Some("Food"));
        assert_eq!(changes.description, None);

        let null: UpdateCategoryRequest =
            serde_json::from_str(r#"{"description":null}"#).unwrap();
        assert_eq!(null.into_changes().unwrap().description, Some(None));

        let empty: UpdateCategoryRequest =
            serde_json::from_str(r#"{"description":"","icon":"cart"}"#).unwrap();
        let changes = empty.into_changes().unwrap();
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.icon, Some(Some("cart".to_string())));
        assert_eq!(changes.color, None);
    }

    #[test]
    fn update_category_rejects_blank_name() {
        let req: UpdateCategoryRequest = serde_json::from_str(r#"{"name":" "}"#).unwrap();
        assert_eq!(req.into_changes().unwrap_err().code, ErrorCode::BadUserInput);
    }

    #[test]
    fn null_is_rejected_for_fields_that_cannot_be_cleared() {
        assert!(serde_json::from_str::<UpdateCategoryRequest>(r#"{"name":null}"#).is_err());
        for body in [
            r#"{"title":null}"#,
            r#"{"amount":null}"#,
            r#"{"type":null}"#,
            r#"{"categoryId":null}"#,
        ] {
            let parsed = serde_json::from_str::<UpdateTransactionRequest>(body);
            assert!(parsed.is_err(), "{body} was accepted");
        }

        let omitted: UpdateTransactionRequest = serde_json::from_str(r#"{"amount":5}"#).unwrap();
        let changes = omitted.into_changes().unwrap();
        assert_eq!(changes.amount, Some(5.0));
        assert_eq!(changes.title, None);
        assert_eq!(changes.kind, None);
    }

    #[test]
    fn create_transaction_reads_wire_names() {
        let req: CreateTransactionRequest = serde_json::from_str(
            r#"{"title":"Rent","amount":1200.5,"type":"expense","categoryId":"c1"}"#,
        )
        .unwrap();
        let new = req.into_new_transaction().unwrap();
        assert_eq!(new.kind, TransactionKind::Expense);
        assert_eq!(new.category_id, "c1");
        assert_eq!(new.amount, 1200.5);
    }

    #[test]
    fn unknown_transaction_type_is_bad_input() {
        let req = CreateTransactionRequest {
            title: "Piggy bank".to_string(),
            amount: 10.0,
            kind: "savings".to_string(),
            category_id: "c1".to_string(),
        };
        let err = req.into_new_transaction().unwrap_err();
        assert_eq!(err.code, ErrorCode::BadUserInput);

        let update = UpdateTransactionRequest {
            kind: Some("INCOME".to_string()),
            ..Default::default()
        };
        assert_eq!(update.into_changes().unwrap_err().code, ErrorCode::BadUserInput);
    }

    #[test]
    fn non_finite_amount_is_bad_input() {
        let update = UpdateTransactionRequest {
            amount: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(update.into_changes().unwrap_err().code, ErrorCode::BadUserInput);
    }
}
