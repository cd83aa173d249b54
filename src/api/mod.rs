//! HTTP API over the resolver.
//!
//! `GET /amc/{isin}/{kind}` where `kind` is one of `json`, `primary`,
//! `secondary`, `name`, `amc` or `logo`.

use crate::core::{RecordField, ReferenceData, resolve};
use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

fn is_isin(candidate: &str) -> bool {
    candidate.len() == 12 && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}

async fn record_handler(
    State(reference): State<Arc<ReferenceData>>,
    Path((isin, kind)): Path<(String, String)>,
) -> Response {
    let field = match kind.parse::<RecordField>() {
        Ok(field) if is_isin(&isin) => field,
        _ => return not_found(),
    };

    let Some(record) = resolve(&reference, &isin) else {
        debug!(%isin, "ISIN not found");
        return (StatusCode::NOT_FOUND, "ISIN not found").into_response();
    };

    match field {
        RecordField::Json => Json(record).into_response(),
        RecordField::Logo if record.logo.is_none() => StatusCode::NO_CONTENT.into_response(),
        field => record
            .text(field)
            .unwrap_or_default()
            .to_string()
            .into_response(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

pub fn router(reference: Arc<ReferenceData>) -> Router {
    Router::new()
        .route("/amc/{isin}/{kind}", get(record_handler))
        .fallback(|| async { not_found() })
        .layer(TraceLayer::new_for_http())
        .with_state(reference)
}

/// Serves the API on `bind` until the process is stopped.
pub async fn serve(reference: Arc<ReferenceData>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(reference))
        .await
        .context("HTTP server failed")
}
