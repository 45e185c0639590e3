//! HTTP router for the lookup service.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{trace, warn};

use crate::lookup::BinDayLookup;
use crate::web::event::{BinDayRequest, EventResponse, handle_event, status_for};

/// Shared state for handlers.
#[derive(Clone)]
pub struct AppState {
    pub lookup: BinDayLookup,
}

/// Creates the web server router.
///
/// `request_timeout` bounds a whole lookup (three upstream round trips).
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let api_router = Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/bin-days", get(bin_days))
        .with_state(state);

    Router::new().nest("/api", api_router).layer((
        TraceLayer::new_for_http(),
        TimeoutLayer::new(request_timeout),
    ))
}

/// Health check endpoint
async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("GIT_COMMIT_SHORT"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// `POST /api/invoke`: serverless-style envelope in, envelope out.
async fn invoke(State(state): State<AppState>, Json(event): Json<Value>) -> Response {
    let response: EventResponse = handle_event(&state.lookup, event).await;
    let status = StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response)).into_response()
}

/// `GET /api/bin-days?post_code=GU1%203LN&house_number=26`
async fn bin_days(
    State(state): State<AppState>,
    Query(request): Query<BinDayRequest>,
) -> Response {
    match state
        .lookup
        .find_dates(&request.post_code, &request.house_number)
        .await
    {
        Ok(schedule) => Json(schedule).into_response(),
        Err(e) => {
            warn!(error = %e, kind = e.kind(), "bin day lookup failed");
            let status = StatusCode::from_u16(status_for(&e)).unwrap_or(StatusCode::BAD_GATEWAY);
            let body = json!({ "error": e.kind(), "message": e.to_string() });
            (status, Json(body)).into_response()
        }
    }
}
