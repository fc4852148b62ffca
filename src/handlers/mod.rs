pub mod analyze;
pub mod health;
pub mod index;

pub use analyze::*;
pub use health::*;
pub use index::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{logging_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Room for the job description and multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/v1/parse", post(parse_handler))
        .route("/api/v1/analyze", post(analyze_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware))
                .layer(axum::middleware::from_fn_with_state(
                    state.limiter.clone(),
                    rate_limit_middleware,
                )),
        )
        .with_state(state)
}
