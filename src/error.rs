use actix_multipart::MultipartError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use tracing::error;

use crate::db::StoreError;

/// Errors surfaced by request handlers as plain-text responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("FALTAN DATOS")]
    MissingFields,

    #[error("FAIL")]
    Forbidden,

    #[error("Producto no encontrado")]
    NotFound,

    #[error("No hay base de datos disponible")]
    Unavailable,

    #[error("ERROR: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingFields => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let Self::Internal(message) = self {
            error!("[API] Internal error: {}", message);
        }
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(_) => Self::Unavailable,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// `{"error": message}` with the given status, for the JSON endpoints.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(json!({ "error": message.into() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_fields_is_400() {
        assert_eq!(AppError::MissingFields.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_is_403() {
        let response = AppError::Forbidden.error_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unavailable_store_maps_to_503() {
        let err: AppError = StoreError::Unavailable(PathBuf::from("products.db")).into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn internal_error_keeps_message() {
        let err = AppError::Internal("file is not a database".into());
        assert_eq!(err.to_string(), "ERROR: file is not a database");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
