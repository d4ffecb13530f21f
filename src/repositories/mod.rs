//! Repositories
//!
//! Interfaces de acceso a datos (`CategoryStore`, `ProductStore`,
//! `QuotationStore`) y sus implementaciones: PostgreSQL con sqlx y un store
//! en memoria para tests y ejecución local sin base de datos.

pub mod category_repository;
pub mod memory;
pub mod product_repository;
pub mod quotation_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::category::{Category, CategoryChanges, NewCategory};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::query::{ProductFilter, ProductQuery, QuotationFilter, QuotationQuery};
use crate::models::quotation::{Quotation, QuotationStatus};
use crate::utils::errors::AppResult;

pub use category_repository::CategoryRepository;
pub use memory::MemoryStore;
pub use product_repository::ProductRepository;
pub use quotation_repository::QuotationRepository;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Categorías activas ordenadas por nombre ascendente
    async fn find_active_sorted_by_name(&self) -> AppResult<Vec<Category>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    /// Falla con `Conflict` si el nombre ya existe
    async fn create(&self, category: NewCategory) -> AppResult<Category>;

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Option<Category>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Ejecuta un plan de consulta; `category_name` viene resuelto
    async fn find(&self, query: &ProductQuery) -> AppResult<Vec<Product>>;

    async fn count(&self, filter: &ProductFilter) -> AppResult<u64>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    /// Solo devuelve los productos activos entre los ids pedidos
    async fn find_active_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Product>>;

    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Option<Product>>;
}

#[async_trait]
pub trait QuotationStore: Send + Sync {
    async fn create(&self, quotation: &Quotation) -> AppResult<Quotation>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Quotation>>;

    /// Más recientes primero
    async fn find(&self, query: &QuotationQuery) -> AppResult<Vec<Quotation>>;

    async fn count(&self, filter: &QuotationFilter) -> AppResult<u64>;

    async fn update_status(
        &self,
        id: Uuid,
        status: QuotationStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Quotation>>;

    /// Devuelve `true` si existía
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn count_by_status(&self) -> AppResult<HashMap<QuotationStatus, u64>>;
}

/// Escapa comodines de LIKE/ILIKE para buscar el texto literal
pub(crate) fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `LIMIT` y `OFFSET` como enteros de Postgres, acotados a `i64::MAX`
pub(crate) fn sql_window(limit: u64, skip: u64) -> (i64, i64) {
    (
        i64::try_from(limit).unwrap_or(i64::MAX),
        i64::try_from(skip).unwrap_or(i64::MAX),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Samsung"), "Samsung");
    }

    #[test]
    fn test_sql_window_never_goes_negative() {
        use crate::services::catalog_query::Pagination;

        assert_eq!(sql_window(20, 40), (20, 40));

        for page in [i64::MAX, 1_000_000_000_000_000_000] {
            let pagination = Pagination::from_params(Some(page), Some(20));
            let (limit, offset) = sql_window(pagination.page_size, pagination.skip());
            assert_eq!(limit, 20);
            assert!(offset >= 0);
        }
        assert_eq!(sql_window(20, u64::MAX), (20, i64::MAX));
    }
}
