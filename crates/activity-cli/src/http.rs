use std::net::SocketAddr;
use std::sync::Arc;

use activity_core::atoms::constants::MAX_PIXEL_CONTEXT_ID_LENGTH;
use activity_core::{fingerprint, ActivityError, ActivityService};
use axum::extract::{ConnectInfo, Path};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde_json::json;

type SharedService = Arc<ActivityService>;

pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/count/:context_id", get(count))
        .route("/:pixel", get(pixel))
        .with_state(service)
}

async fn health(
    axum::extract::State(service): axum::extract::State<SharedService>,
) -> impl IntoResponse {
    if service.is_healthy().await {
        (StatusCode::OK, Json(json!({ "status": "healthy" })))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "unhealthy" })))
    }
}

async fn count(
    axum::extract::State(service): axum::extract::State<SharedService>,
    Path(context_id): Path<String>,
) -> Response {
    match service.count_activity(&context_id).await {
        Ok(info) => Json(info).into_response(),
        Err(ActivityError::InvalidContextId) => StatusCode::BAD_REQUEST.into_response(),
        Err(err) => {
            log::warn!("count_activity failed for {context_id:?}: {err}");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// The beacon pixel: `GET /{context_id}.png`. The path segment is matched
/// loosely by axum's router and validated here, since axum's router
/// doesn't support the spec's regex-constrained segment directly.
async fn pixel(
    axum::extract::State(service): axum::extract::State<SharedService>,
    Path(pixel): Path<String>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let Some(context_id) = pixel.strip_suffix(".png") else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if context_id.len() > MAX_PIXEL_CONTEXT_ID_LENGTH {
        return StatusCode::NOT_FOUND.into_response();
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let visitor_id = fingerprint(&remote_addr.ip().to_string(), user_agent);

    if let Err(err) = service.record_activity(context_id, &visitor_id).await {
        log::warn!("record_activity failed for {context_id:?}: {err}");
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache, max-age=0"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::EXPIRES,
        HeaderValue::from_static("Thu, 01 Jan 1970 00:00:00 GMT"),
    );
    response
}
