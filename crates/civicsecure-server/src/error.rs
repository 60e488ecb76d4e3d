use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use civicsecure_shared::protocol::ErrorResponse;
use civicsecure_shared::ValidationErrors;
use civicsecure_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Complaint with this ID already exists")]
    Conflict,

    #[error("Complaint not found")]
    NotFound,

    #[error("Route not found")]
    RouteNotFound(String),

    /// A persistence fault; `context` names the failed operation.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Adapter for `map_err` that keeps duplicate keys distinguishable from
    /// other store faults.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ServerError {
        move |source| match source {
            StoreError::Conflict(_) => ServerError::Conflict,
            source => ServerError::Store { context, source },
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::Validation(errors) => {
                let mut body = ErrorResponse::new(self.to_string());
                body.details = Some(errors.reasons().to_vec());
                (StatusCode::BAD_REQUEST, body)
            }
            ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorResponse::new(self.to_string())),
            ServerError::Conflict => (StatusCode::CONFLICT, ErrorResponse::new(self.to_string())),
            ServerError::NotFound => (StatusCode::NOT_FOUND, ErrorResponse::new(self.to_string())),
            ServerError::RouteNotFound(path) => {
                let mut body = ErrorResponse::new(self.to_string());
                body.path = Some(path.clone());
                (StatusCode::NOT_FOUND, body)
            }
            // Underlying details are logged, never sent to the client.
            ServerError::Store { context, source } => {
                tracing::error!(error = %source, "{context}");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(*context))
            }
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
