//! Inbound HTTP surface
//!
//! - `GET /facilities` returns the mediator envelope as JSON; the HTTP status
//!   mirrors the envelope's `response.status`, except that statuses which
//!   cannot carry a body (1xx, 204, 205, 304) are sent as 502
//! - anything else (any method, any path) gets a plain-text acknowledgment

use crate::core::envelope::ResponseEnvelope;
use crate::core::handler::FacilityService;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Body returned for every request other than `GET /facilities`
pub const CATCH_ALL_TEXT: &str = "Hope you are enjoying the tutorial!!";

/// Build the mediator router
pub fn router(service: Arc<FacilityService>) -> Router {
    Router::new()
        .route("/facilities", get(facilities).fallback(catch_all))
        .fallback(catch_all)
        .with_state(service)
}

/// Serve `router` on `listener` until `shutdown` flips to `true`
///
/// In-flight requests are allowed to finish.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Shutting down listener");
        })
        .await
}

async fn facilities(State(service): State<Arc<FacilityService>>) -> impl IntoResponse {
    let envelope = service.fetch_facilities().await;
    (status_of(&envelope), Json(envelope))
}

async fn catch_all() -> &'static str {
    CATCH_ALL_TEXT
}

fn status_of(envelope: &ResponseEnvelope) -> StatusCode {
    match StatusCode::from_u16(envelope.response.status) {
        Ok(status) if allows_body(status) => status,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn allows_body(status: StatusCode) -> bool {
    !(status.is_informational()
        || status == StatusCode::NO_CONTENT
        || status == StatusCode::RESET_CONTENT
        || status == StatusCode::NOT_MODIFIED)
}
