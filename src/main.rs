// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use relational_ledger_server::{
    api::router,
    auth::{PasswordHashing, TokenService},
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::Database,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = result {
        eprintln!("tracing init failed: {e}");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C listener failed");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM listener failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> ExitCode {
    // The secret is mandatory; refuse to start without it.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let tokens = match TokenService::new(&config.jwt_secret) {
        Ok(tokens) => tokens.with_ttl(config.token_ttl),
        Err(e) => {
            tracing::error!(error = %e, "Invalid token configuration");
            return ExitCode::FAILURE;
        }
    };

    let passwords = match PasswordHashing::new() {
        Ok(passwords) => passwords,
        Err(e) => {
            tracing::error!(error = %e, "Password hashing setup failed");
            return ExitCode::FAILURE;
        }
    };

    let db = match Database::open(&config.database_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %config.database_path.display(),
                "Failed to open database"
            );
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(db, tokens, passwords);
    let app = router(state, &config.cors_allowed_origins);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, address = %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        address = %addr,
        database = %config.database_path.display(),
        "Relational Ledger listening (docs at /docs)"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Server shutdown completed");
    ExitCode::SUCCESS
}
