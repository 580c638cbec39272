//! HTTP error responses
//!
//! All failures leave the API as `{"success": false, "message": "..."}`
//! with either a 400 (request validation) or a 500 (relay failure)
//! status, matching the success envelope in [`crate::dto`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use picrelay_graph::DriveError;
use serde::Serialize;
use tracing::error;

/// JSON body for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub message: String,
}

/// A request failure carrying the status it answers with
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    /// The request itself was unacceptable (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// The relay failed while handling an acceptable request (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<DriveError> for ApiFailure {
    fn from(err: DriveError) -> Self {
        error!(error = %err, "Relay operation failed");
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
