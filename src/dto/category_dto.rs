use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::category::CategorySummary;
use crate::utils::validation::validate_not_blank;

// Request para crear una categoría
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub icon: Option<String>,
}

// Request para actualizar una categoría
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub icon: Option<String>,
    pub active: Option<bool>,
}

// Listado cacheado de categorías activas
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub data: Vec<CategorySummary>,
    pub count: usize,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
