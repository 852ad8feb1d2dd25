use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::services::ServiceError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Decode(String),
    #[error("{message}")]
    Validation { message: String, fields: Vec<String> },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{message}")]
    Internal { message: String, detail: String },
}

impl IntoResponse for AppError {
    // Errors go out as a bare text message on the default status code.
    fn into_response(self) -> Response {
        match &self {
            AppError::Decode(msg) => warn!(message = %msg, "Request body could not be decoded."),
            AppError::Validation { message, fields } => {
                warn!(message = %message, fields = ?fields, "Request failed validation.")
            }
            AppError::NotFound(msg) => warn!(message = %msg, "Referenced record not found."),
            AppError::Conflict(msg) => {
                warn!(message = %msg, "Request conflicts with existing data.")
            }
            AppError::Internal { message, detail } => {
                error!(message = %message, detail = %detail, "Request failed.")
            }
        }
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => AppError::NotFound(msg.to_string()),
            ServiceError::Conflict(msg) => AppError::Conflict(msg.to_string()),
            ServiceError::Store { message, source } => AppError::Internal {
                message: message.to_string(),
                detail: source.to_string(),
            },
        }
    }
}
