//! Constructor de consultas del catálogo
//!
//! Traduce filtros, orden y paginación del request a un `ProductQuery`
//! determinístico, y arma los metadatos de página de la respuesta.

use serde::Serialize;

use crate::dto::product_dto::ProductListParams;
use crate::models::query::{ProductFilter, ProductOrder, ProductQuery};
use crate::utils::validation::normalize_optional;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Página pedida, ya normalizada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    /// `page >= 1` (default 1), `page_size` acotado a [1, 100] (default 20)
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = page.unwrap_or(1).max(1) as u64;
        let page_size = page_size
            .map(|size| size.clamp(1, MAX_PAGE_SIZE as i64) as u64)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { page, page_size }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Metadatos de paginación devueltos junto a los items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_previous: bool,
    pub has_next: bool,
    /// Rango 1-based inclusivo de los items devueltos (0 si la página está vacía)
    pub from: u64,
    pub to: u64,
}

impl PageInfo {
    pub fn new(pagination: Pagination, total: u64, returned: u64) -> Self {
        let total_pages = total.div_ceil(pagination.page_size);
        let skip = pagination.skip();
        let (from, to) = if returned == 0 {
            (0, 0)
        } else {
            (skip + 1, skip + returned)
        };

        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total,
            total_pages,
            has_previous: pagination.page > 1,
            has_next: pagination.page < total_pages,
            from,
            to,
        }
    }
}

/// Interpreta el parámetro `sort`; valores desconocidos caen en "más recientes"
pub fn parse_sort(sort: Option<&str>) -> ProductOrder {
    match sort.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("alphabetical") | Some("name") => ProductOrder::Alphabetical,
        Some("price_asc") => ProductOrder::PriceAsc,
        Some("price_desc") => ProductOrder::PriceDesc,
        Some("category") => ProductOrder::CategoryName,
        _ => ProductOrder::Recent,
    }
}

/// Arma el plan de consulta de productos
///
/// Con búsqueda de texto, el filtro por marca se descarta y el orden pasa a
/// ser por relevancia, ignorando `sort`.
pub fn build_product_query(params: &ProductListParams) -> (ProductQuery, Pagination) {
    let pagination = Pagination::from_params(params.page, params.page_size);
    let text = normalize_optional(params.search.clone());

    let (brand_contains, order) = match text {
        Some(_) => (None, ProductOrder::Relevance),
        None => (
            normalize_optional(params.brand.clone()),
            parse_sort(params.sort.as_deref()),
        ),
    };

    let query = ProductQuery {
        filter: ProductFilter {
            category_id: params.category,
            brand_contains,
            available: params.available,
            text,
        },
        order,
        skip: pagination.skip(),
        limit: pagination.page_size,
    };

    (query, pagination)
}
