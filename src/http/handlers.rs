//! Endpoint handlers.

use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::Json;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::notification::{
    DispatchError, HealthResponse, NotificationRequest, NotificationResponse, NotifyPayload,
    ValidationError,
};
use crate::observability::metrics;
use crate::security::bearer_credential;

/// `POST /notify`: validate → authenticate → rate-limit → dispatch.
pub async fn notify(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<NotifyPayload>, JsonRejection>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ValidationError::Malformed(rejection.body_text()))?;
    let request = NotificationRequest::try_from(payload)?;

    if !state.auth.verify(bearer_credential(&headers)) {
        tracing::warn!(client = %addr.ip(), "Rejected notification: invalid token");
        return Err(ApiError::Unauthorized);
    }

    let client = addr.ip().to_string();
    if !state.limiter.is_allowed(&client) {
        tracing::warn!(client = %client, "Rate limit exceeded");
        metrics::record_rate_limited();
        return Err(ApiError::RateLimited);
    }

    tracing::info!(
        client = %client,
        source = request.source().unwrap_or("-"),
        priority = %request.priority(),
        chars = request.message().chars().count(),
        "Dispatching notification"
    );

    // Detached: a client disconnect must not cut speech off mid-sentence.
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move { dispatcher.dispatch(&request).await })
        .await
        .map_err(DispatchError::from)??;

    metrics::record_request("delivered");
    Ok(Json(NotificationResponse::succeeded(
        "Notification sent successfully",
    )))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
