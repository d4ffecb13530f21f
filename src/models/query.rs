//! Planes de consulta que entienden los stores
//!
//! Los arma `services::catalog_query` a partir de los parámetros del request;
//! cada store los traduce a su propio lenguaje (SQL o filtros en memoria).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::quotation::QuotationStatus;

/// Filtros de productos (se combinan con AND; `active = true` siempre implícito)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    /// Substring de marca, sin distinguir mayúsculas
    pub brand_contains: Option<String>,
    pub available: Option<bool>,
    /// Búsqueda de texto con ranking por relevancia
    pub text: Option<String>,
}

/// Orden de resultados de productos
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    #[default]
    Recent,
    Alphabetical,
    PriceAsc,
    PriceDesc,
    CategoryName,
    /// Solo válido cuando hay búsqueda de texto
    Relevance,
}

/// Plan completo de consulta de productos
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub order: ProductOrder,
    pub skip: u64,
    pub limit: u64,
}

/// Filtros de cotizaciones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationFilter {
    pub status: Option<QuotationStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    /// Busca en nombre y teléfono del contacto, sin distinguir mayúsculas
    pub contact_search: Option<String>,
}

/// Plan de consulta de cotizaciones (siempre más recientes primero)
#[derive(Debug, Clone, PartialEq)]
pub struct QuotationQuery {
    pub filter: QuotationFilter,
    pub skip: u64,
    pub limit: u64,
}
