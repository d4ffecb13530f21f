//! Envoltorio común de las respuestas exitosas de la API

use serde::Serialize;

use crate::services::catalog_query::PageInfo;

/// `{ success, message, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Listado paginado: `ApiResponse` + metadatos de página
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: PageInfo) -> Self {
        Self {
            success: true,
            data,
            pagination,
        }
    }
}
