//! HTTP transport: axum router, worker offload, timeouts and the JSON
//! response shape.
//!
//! Every `/convert` response body is a [`ConversionResult`], including
//! transport failures (malformed JSON, oversized body, timeout).

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cryptconv_codec::DigestAlgorithm;
use serde::Serialize;
use serde_json::error::Category;

use crate::dispatch::{self, ConversionRequest, ConversionResult, CONVERSION_TYPES};
use crate::error::ConvertError;
use crate::state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/convert", post(convert_handler))
        .route("/health", get(health_handler))
        .route("/algorithms", get(algorithms_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// /convert
// ---------------------------------------------------------------------------

async fn convert_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let started = Instant::now();

    let (conversion, action, outcome) = match parse_body(body) {
        Ok(request) => {
            let conversion = request.type_label();
            let action = request.action_label();
            (conversion, action, run_conversion(&state, request).await)
        }
        Err(err) => ("unknown", "-", Err(err)),
    };

    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => err.status_code(),
    };
    match &outcome {
        Ok(_) => tracing::info!(conversion, action, elapsed_ms, "conversion succeeded"),
        Err(err) if status.is_server_error() => tracing::error!(
            conversion,
            action,
            class = err.class(),
            elapsed_ms,
            "conversion failed: {err}"
        ),
        Err(err) => tracing::info!(
            conversion,
            action,
            class = err.class(),
            elapsed_ms,
            "conversion rejected"
        ),
    }

    (status, Json(ConversionResult::from(outcome))).into_response()
}

fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<ConversionRequest, ConvertError> {
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ConvertError::BodyTooLarge
        } else {
            ConvertError::InvalidJson("failed to read request body".into())
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ConvertError::InvalidJson(describe_json_error(&e)))
}

/// Position-only description; serde's own message can quote the input.
fn describe_json_error(err: &serde_json::Error) -> String {
    let what = match err.classify() {
        Category::Syntax => "malformed JSON",
        Category::Eof => "unexpected end of input",
        Category::Data => "expected an object whose fields are strings",
        Category::Io => "unreadable input",
    };
    format!("{what} at line {} column {}", err.line(), err.column())
}

/// Run the conversion on the blocking pool, bounded by the request timeout.
///
/// The timeout covers both the wait for a conversion slot and the work
/// itself. A timed-out conversion keeps running on its worker and keeps its
/// slot until it finishes; only the response is abandoned.
async fn run_conversion(state: &AppState, request: ConversionRequest) -> Result<String, ConvertError> {
    let settings = state.settings;
    let slots = Arc::clone(&state.conversion_slots);
    let work = async move {
        let permit = slots
            .acquire_owned()
            .await
            .map_err(|_| ConvertError::Internal("conversion slots closed"))?;
        tokio::task::spawn_blocking(move || {
            let outcome = dispatch::convert(&request, &settings);
            drop(permit);
            outcome
        })
        .await
        .unwrap_or_else(|join_error| {
            tracing::error!("conversion worker failed: {join_error}");
            Err(ConvertError::Internal("conversion worker failed"))
        })
    };

    tokio::time::timeout(state.request_timeout, work)
        .await
        .unwrap_or(Err(ConvertError::TimedOut))
}

// ---------------------------------------------------------------------------
// Service endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    build: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        build: env!("CRYPTCONV_BUILD_HASH"),
    })
}

#[derive(Debug, Serialize)]
struct AlgorithmsResponse {
    types: [&'static str; 4],
    hash: [DigestAlgorithm; 11],
}

async fn algorithms_handler() -> Json<AlgorithmsResponse> {
    Json(AlgorithmsResponse {
        types: CONVERSION_TYPES,
        hash: DigestAlgorithm::ALL,
    })
}

async fn not_found_handler() -> (StatusCode, Json<ConversionResult>) {
    (
        StatusCode::NOT_FOUND,
        Json(ConversionResult::Error("not found".into())),
    )
}
