//! HTTP error mapping
//!
//! Handlers return [`ApiResult`]; any [`SunquoteError`] bubbling out of the
//! services converts into an [`ApiError`], which renders as a JSON
//! `{ "message": ... }` body with the status the variant calls for.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use sunquote_domain::SunquoteError;

/// Result alias for route handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// A domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub SunquoteError);

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl From<SunquoteError> for ApiError {
    fn from(err: SunquoteError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            SunquoteError::NotFound(_) => StatusCode::NOT_FOUND,
            SunquoteError::InvalidInput(_) | SunquoteError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            SunquoteError::Conflict(_) => StatusCode::CONFLICT,
            SunquoteError::Network(_) => StatusCode::BAD_GATEWAY,
            SunquoteError::EngineUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            SunquoteError::Database(_) | SunquoteError::Config(_) | SunquoteError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!(%status, %message, "request failed");
        } else {
            tracing::debug!(%status, %message, "request rejected");
        }

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (SunquoteError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (SunquoteError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (SunquoteError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (SunquoteError::Conflict("x".into()), StatusCode::CONFLICT),
            (SunquoteError::Network("x".into()), StatusCode::BAD_GATEWAY),
            (SunquoteError::EngineUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (SunquoteError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (SunquoteError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
