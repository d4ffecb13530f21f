//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::models::quotation::QuotationStatus;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Dependency error: {0}")]
    Dependency(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Products not found or inactive: {0:?}")]
    UnavailableProducts(Vec<Uuid>),

    #[error("A quotation needs at least one product")]
    EmptyQuotation,

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: QuotationStatus,
        to: QuotationStatus,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, details: Option<serde_json::Value>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details,
            code: Some(code.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        Some(json!({ "sql_error": e.to_string() })),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Dependency(msg) => {
                error!("❌ Dependency error: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new(
                        "Dependency Error",
                        "A backing service is unavailable".to_string(),
                        Some(json!({ "dependency_error": msg })),
                        "DEPENDENCY_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        Some(json!(e)),
                        "VALIDATION_ERROR",
                    ),
                )
            }

            AppError::InvalidInput(msg) => {
                warn!("⚠️ Invalid input: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Validation Error", msg, None, "VALIDATION_ERROR"),
                )
            }

            AppError::UnavailableProducts(ids) => {
                warn!("⚠️ Productos inexistentes o inactivos: {:?}", ids);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "One or more products do not exist or are not available".to_string(),
                        Some(json!({ "product_ids": ids })),
                        "PRODUCTS_UNAVAILABLE",
                    ),
                )
            }

            AppError::EmptyQuotation => {
                warn!("⚠️ Cotización sin productos");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "A quotation needs at least one product".to_string(),
                        None,
                        "EMPTY_QUOTATION",
                    ),
                )
            }

            AppError::InvalidTransition { from, to } => {
                warn!("⚠️ Transición de estado inválida: {} -> {}", from, to);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        format!("Cannot move a quotation from '{}' to '{}'", from, to),
                        Some(json!({ "from": from, "to": to })),
                        "INVALID_STATUS_TRANSITION",
                    ),
                )
            }

            AppError::NotFound(msg) => {
                warn!("🔍 Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, None, "NOT_FOUND"),
                )
            }

            AppError::Conflict(msg) => {
                warn!("⚠️ Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Conflict", msg, None, "CONFLICT"),
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        Some(json!({ "internal_error": msg })),
                        "INTERNAL_ERROR",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.add_param("field".into(), &field);
    error.add_param("message".into(), &message);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &Uuid) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (AppError::EmptyQuotation, StatusCode::BAD_REQUEST),
            (AppError::UnavailableProducts(vec![Uuid::nil()]), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (conflict_error("Category", "name", "Cocina"), StatusCode::CONFLICT),
            (AppError::Dependency("down".to_string()), StatusCode::SERVICE_UNAVAILABLE),
            (validation_error("quantity", "must be positive"), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = not_found_error("Product", &Uuid::nil());
        assert_eq!(
            err.to_string(),
            "Not found: Product with id '00000000-0000-0000-0000-000000000000' not found"
        );
    }
}
