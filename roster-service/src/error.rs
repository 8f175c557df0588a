use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use shared::responses::ApiResponse;
use thiserror::Error;

use crate::engine::{ConfigError, DriverError};

#[derive(Debug, Error)]
pub enum RosterServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid roster configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("roster engine failure: {0}")]
    Engine(#[from] DriverError),

    #[error("roster problem is infeasible: {0}")]
    Infeasible(String),
}

impl IntoResponse for RosterServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Oof, Something went wrong while accessing the database.".into(),
            ),
            Self::Config(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Engine(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Infeasible(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Server error");
        } else {
            tracing::warn!(error = %self, %status, "Client error");
        }

        let body = ApiResponse::<()>::err(message);
        (status, axum::Json(body)).into_response()
    }
}
