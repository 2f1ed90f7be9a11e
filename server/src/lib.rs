//! cryptconv: a stateless HTTP conversion service.
//!
//! The crate is a thin shell over `cryptconv-codec`. It owns request
//! validation and routing ([`dispatch`]), the axum transport ([`http`]),
//! configuration and logging. Nothing persists between requests.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod state;
pub mod telemetry;

use std::sync::Arc;

use anyhow::Context;

pub use config::Config;
pub use dispatch::{dispatch, CodecSettings, ConversionRequest, ConversionResult};
pub use error::ConvertError;
pub use state::AppState;

/// Validate `config`, bind the listener and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the address cannot be
/// bound, or the server fails while running.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let settings = config.validate().context("invalid configuration")?;

    if let Err(e) = cryptconv_codec::disable_core_dumps() {
        tracing::warn!("could not disable core dumps: {e}");
    }

    let state = Arc::new(AppState::new(
        settings,
        config.request_timeout(),
        config.max_body_bytes,
        config.max_concurrent_conversions,
    ));
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        kdf_memory_kib = settings.kdf.m_cost,
        kdf_iterations = settings.kdf.t_cost,
        kdf_parallelism = settings.kdf.p_cost,
        max_concurrent_conversions = config.max_concurrent_conversions,
        "cryptconv listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("cryptconv stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
