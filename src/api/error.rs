//! Mapping from [`crate::errors::Error`] to HTTP responses.
//!
//! Client mistakes get a 4xx with a descriptive message. Storage and other
//! internal failures are logged and answered with a generic 500 message that
//! names the operation but never the cause.

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// User-facing message
    pub error: String,
}

/// JSON body of delete confirmations
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// User-facing message
    pub message: &'static str,
}

impl MessageBody {
    /// Wraps a confirmation message.
    #[must_use]
    pub const fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// An error paired with the message shown if it turns out to be internal.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    operation: &'static str,
}

impl ApiError {
    /// Returns a closure tagging an error with the failed operation, e.g.
    /// `"Failed to create order"`. Meant for `map_err`.
    pub fn context(operation: &'static str) -> impl FnOnce(Error) -> Self + Copy {
        move |error| Self { error, operation }
    }

    /// Status code and user-facing message for this error.
    fn classify(&self) -> (StatusCode, String) {
        match &self.error {
            Error::MenuItemNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Menu item not found".to_string())
            }
            Error::CustomerNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Customer not found".to_string())
            }
            Error::OrderNotFound { .. } => (StatusCode::NOT_FOUND, "Order not found".to_string()),
            Error::InvalidStatus { .. } => (StatusCode::BAD_REQUEST, "Invalid status".to_string()),
            Error::InvalidPrice { .. }
            | Error::InvalidMenuItem { .. }
            | Error::InvalidQuantity { .. }
            | Error::InvalidOrder { .. }
            | Error::InvalidReportPeriod { .. } => {
                (StatusCode::BAD_REQUEST, self.error.to_string())
            }
            Error::InvalidTransition { .. } | Error::CustomerHasOrders { .. } => {
                (StatusCode::CONFLICT, self.error.to_string())
            }
            Error::InvalidCredentials | Error::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.error.to_string())
            }
            Error::Database(_) | Error::Io(_) | Error::Config { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.operation.to_string())
            }
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self {
            error,
            operation: "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.classify();
        if status.is_server_error() {
            tracing::error!(error = %self.error, operation = self.operation, "request failed");
        } else {
            tracing::debug!(error = %self.error, %status, "request rejected");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
