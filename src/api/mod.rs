// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, Request,
    },
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ErrorBody, ErrorCode},
    models::{
        AuthPayload, CreateCategoryRequest, CreateTransactionRequest, DeleteResponse,
        LoginRequest, RegisterRequest, UpdateCategoryRequest, UpdateTransactionRequest,
    },
    state::AppState,
    storage::{StoredCategory, StoredTransaction, TransactionKind, UserResponse},
};

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod transactions;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application router.
///
/// `allowed_origins` restricts CORS; an empty list allows any origin.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::get_current_user))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{category_id}",
            get(categories::get_category)
                .patch(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/transactions",
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            "/transactions/{transaction_id}",
            get(transactions::get_transaction)
                .patch(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .route("/dashboard/summary", get(dashboard::get_summary))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Registers the bearer token scheme referenced by `security(("bearer" = []))`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Relational Ledger API",
        description = "Personal finance ledger with owner-scoped categories and transactions."
    ),
    modifiers(&SecurityAddon),
    paths(
        auth::register,
        auth::login,
        users::get_current_user,
        categories::list_categories,
        categories::create_category,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        transactions::list_transactions,
        transactions::create_transaction,
        transactions::get_transaction,
        transactions::update_transaction,
        transactions::delete_transaction,
        dashboard::get_summary,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            ErrorBody,
            ErrorCode,
            RegisterRequest,
            LoginRequest,
            AuthPayload,
            UserResponse,
            StoredCategory,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            StoredTransaction,
            TransactionKind,
            CreateTransactionRequest,
            UpdateTransactionRequest,
            DeleteResponse,
            dashboard::DashboardSummary,
            dashboard::MonthSummary,
            dashboard::CategorySummary,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "Current user profile"),
        (name = "Categories", description = "Owner-scoped categories"),
        (name = "Transactions", description = "Owner-scoped income and expense entries"),
        (name = "Dashboard", description = "Aggregated totals"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
