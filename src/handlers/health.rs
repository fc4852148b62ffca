use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::state::AppState;

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let timestamp = chrono::Utc::now().to_rfc3339();
    let llm_configured = state.config.llm.api_key.is_some();
    let metrics = state.limiter.metrics();

    let status = if llm_configured { "healthy" } else { "degraded" };

    let response = json!({
        "status": status,
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "text_extractor": true,
            "llm_configured": llm_configured,
            "model": state.controller.model(),
            "job_description_llm_check": state.config.validator.llm_check
        },
        "rate_limiting": {
            "total_requests": metrics.total_requests,
            "rejected_requests": metrics.rejected_requests,
            "available_permits": metrics.available_permits
        }
    });

    info!(status = status, llm_configured = llm_configured, "Health check completed");

    Json(response)
}

/// Readiness check: analysis cannot succeed without an API key.
pub async fn ready_handler(State(state): State<AppState>) -> StatusCode {
    if state.config.llm.api_key.is_some() {
        StatusCode::OK
    } else {
        info!("Readiness check failed - OPENAI_API_KEY not configured");
        StatusCode::SERVICE_UNAVAILABLE
    }
}
