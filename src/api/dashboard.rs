// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Dashboard summary endpoint.
//!
//! Aggregation is a pure function over the caller's own categories and
//! transactions; the handler only loads those two lists.

use std::collections::{BTreeMap, HashMap};

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    auth::Identity,
    error::{ApiError, ErrorBody},
    state::AppState,
    storage::{
        CategoryRepository, StoredCategory, StoredTransaction, TransactionKind,
        TransactionRepository,
    },
};

/// Number of transactions included in `recent`.
pub const RECENT_LIMIT: usize = 5;

/// Income and expense for one calendar month (`YYYY-MM`, UTC).
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category_id: String,
    pub name: String,
    pub count: usize,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expense: f64,
    /// `total_income - total_expense`
    pub balance: f64,
    pub current_month: MonthSummary,
    /// Newest month first
    pub by_month: Vec<MonthSummary>,
    /// Every category, including unused ones, newest first
    pub by_category: Vec<CategorySummary>,
    /// The newest transactions
    pub recent: Vec<StoredTransaction>,
}

fn month_key(at: DateTime<Utc>) -> String {
    at.format("%Y-%m").to_string()
}

fn add(kind: TransactionKind, amount: f64, income: &mut f64, expense: &mut f64) {
    match kind {
        TransactionKind::Income => *income += amount,
        TransactionKind::Expense => *expense += amount,
    }
}

/// Aggregate one user's data.
///
/// `categories` and `transactions` are expected newest first, as the
/// repositories return them.
pub fn summarize(
    categories: &[StoredCategory],
    transactions: &[StoredTransaction],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let (mut total_income, mut total_expense) = (0.0, 0.0);
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    let mut per_category: HashMap<&str, (usize, f64, f64)> = HashMap::new();

    for tx in transactions {
        add(tx.kind, tx.amount, &mut total_income, &mut total_expense);

        let (income, expense) = months.entry(month_key(tx.created_at)).or_default();
        add(tx.kind, tx.amount, income, expense);

        let (count, income, expense) = per_category.entry(tx.category_id.as_str()).or_default();
        *count += 1;
        add(tx.kind, tx.amount, income, expense);
    }

    let current_key = month_key(now);
    let (income, expense) = months.get(&current_key).copied().unwrap_or_default();
    let current_month = MonthSummary {
        month: current_key,
        income,
        expense,
    };

    let by_month = months
        .into_iter()
        .rev()
        .map(|(month, (income, expense))| MonthSummary {
            month,
            income,
            expense,
        })
        .collect();

    let by_category = categories
        .iter()
        .map(|category| {
            let (count, income, expense) = per_category
                .get(category.id.as_str())
                .copied()
                .unwrap_or_default();
            CategorySummary {
                category_id: category.id.clone(),
                name: category.name.clone(),
                count,
                income,
                expense,
            }
        })
        .collect();

    DashboardSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        current_month,
        by_month,
        by_category,
        recent: transactions.iter().take(RECENT_LIMIT).cloned().collect(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/dashboard/summary",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, body = DashboardSummary),
        (status = 401, body = ErrorBody)
    )
)]
pub async fn get_summary(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, ApiError> {
    let user = identity.require()?;

    let categories = CategoryRepository::new(&state.db).list(&user.user_id)?;
    let transactions = TransactionRepository::new(&state.db).list(&user.user_id)?;
    Ok(Json(summarize(&categories, &transactions, Utc::now())))
}
