//! Mapping of request failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::notification::{DispatchError, NotificationResponse, ValidationError};
use crate::observability::metrics;

/// Every way a `/notify` request can fail, in the order the checks run.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid authentication token")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn outcome(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "invalid",
            ApiError::Unauthorized => "unauthorized",
            ApiError::RateLimited => "rate_limited",
            ApiError::Dispatch(_) => "failed",
        }
    }

    /// Text sent to the client. Dispatch details stay in the server log.
    fn client_message(&self) -> String {
        match self {
            ApiError::Dispatch(_) => "Failed to send notification".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        metrics::record_request(self.outcome());
        let body = NotificationResponse::failed(self.client_message());
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::channels::AudioError;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::EmptyMessage).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);

        let dispatch = ApiError::from(DispatchError::from(AudioError::TimedOut(
            Duration::from_secs(30),
        )));
        assert_eq!(dispatch.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(dispatch.client_message(), "Failed to send notification");
    }
}
