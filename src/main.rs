// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt::Display;

use axum_server::tls_rustls::RustlsConfig;
use relational_diet_server::{
    api::router,
    auth::{PasswordHasher, TokenService},
    config::{AppConfig, LogFormat, TlsPaths},
    state::AppState,
    storage::{DietDatabase, FoodRepository},
    telemetry::init_tracing,
};

/// Log a startup failure and exit with a non-zero status.
fn fail(what: &str, err: impl Display) -> ! {
    tracing::error!(error = %err, "{what}");
    std::process::exit(1)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            fail("invalid configuration", e);
        }
    };
    init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    // Key material is checked here so a bad key never reaches the first login
    let tokens = TokenService::from_pem(&config.jwt_private_key, &config.jwt_public_key)
        .unwrap_or_else(|e| fail("JWT keys could not be loaded", e))
        .with_ttl(config.jwt_ttl);

    let db = DietDatabase::open(&config.database_path())
        .unwrap_or_else(|e| fail("database could not be opened", e));

    if let Some(path) = &config.food_catalog_path {
        if let Err(e) = FoodRepository::new(&db).seed_from_file(path) {
            fail("food catalog could not be seeded", e);
        }
    }

    let passwords = PasswordHasher::new(config.bcrypt_cost)
        .unwrap_or_else(|e| fail("password hasher could not be initialised", e));

    let state = AppState::new(db, tokens, passwords);
    let app = router(state);

    let addr = config
        .bind_addr()
        .unwrap_or_else(|e| fail("invalid bind address", e));

    match &config.tls {
        Some(TlsPaths { cert, key }) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            let _ = rustls::crypto::ring::default_provider().install_default();
            let tls_config = RustlsConfig::from_pem_file(cert, key)
                .await
                .unwrap_or_else(|e| fail("TLS certificate could not be loaded", e));

            tracing::info!(%addr, "Relational Diet server listening on https (docs at /docs)");
            if let Err(e) = axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
            {
                fail("HTTPS server failed", e);
            }
        }
        None => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .unwrap_or_else(|e| fail("could not bind listener", e));

            tracing::info!(%addr, "Relational Diet server listening on http (docs at /docs)");
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                fail("HTTP server failed", e);
            }
        }
    }
}
