// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the Repejo webhook receiver.
//!
//! The handler owns the transport concerns the validator leaves out: reading
//! the raw body, mapping rejections to status codes, and counting outcomes.

use crate::config::{Config, MetricsConfig};
use crate::error::RejectionReason;
use crate::metrics::WebhookMetrics;
use crate::validator::WebhookValidator;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub validator: WebhookValidator,
    pub metrics: WebhookMetrics,
    pub webhook_path: String,
    pub metrics_config: MetricsConfig,
}

impl AppState {
    /// Build state from configuration. The validation settings move into the
    /// validator.
    pub fn new(config: Config) -> Result<Self, prometheus::Error> {
        let Config {
            webhook_path,
            validation,
            metrics,
            ..
        } = config;

        Ok(Self {
            validator: WebhookValidator::new(validation),
            metrics: WebhookMetrics::new()?,
            webhook_path,
            metrics_config: metrics,
        })
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub signature_validation: bool,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route(&state.webhook_path, post(receive_webhook));

    if state.metrics_config.enabled {
        router = router.route(&state.metrics_config.path, get(render_metrics));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "repejo-webhook",
        version: env!("CARGO_PKG_VERSION"),
        signature_validation: state.validator.verifies_signatures(),
    })
}

/// Receive a webhook from Repejo.
///
/// Responds with a JSON array: one normalized event, or none when the event
/// type is not subscribed.
pub async fn receive_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match state.validator.validate_bytes(&headers, &body) {
        Ok(validation) => {
            state.metrics.record_accepted(&validation);
            match validation.events.first() {
                Some(event) => info!(
                    event_type = %event.event_type,
                    entity_id = event.entity.id(),
                    signature = validation.signature.as_str(),
                    "Webhook accepted"
                ),
                None => debug!("Webhook suppressed by event filter"),
            }
            (StatusCode::OK, Json(validation.events)).into_response()
        }
        Err(reason) => {
            state.metrics.record_rejected(&reason);
            if reason.is_authentication_failure() {
                warn!(code = reason.code(), error = %reason, "Webhook rejected");
            } else {
                info!(code = reason.code(), error = %reason, "Webhook rejected");
            }
            (
                rejection_status(&reason),
                Json(ErrorResponse {
                    error: reason.to_string(),
                    code: reason.code(),
                }),
            )
                .into_response()
        }
    }
}

/// Prometheus scrape endpoint.
pub async fn render_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Status code for a rejection.
pub fn rejection_status(reason: &RejectionReason) -> StatusCode {
    if reason.is_authentication_failure() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::BAD_REQUEST
    }
}
