//! Data Transfer Objects
//!
//! Requests y responses de la API HTTP.

pub mod api_response;
pub mod category_dto;
pub mod product_dto;
pub mod quotation_dto;

pub use api_response::{ApiResponse, PaginatedResponse};
