use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::pricing::{InstallmentPrices, PricingFactors};
use crate::models::product::{Product, ProductImage, ProductSpecifications, Stock};
use crate::models::quotation::ProductSnapshot;
use crate::utils::validation::{validate_non_negative_price, validate_not_blank};

// Parámetros del listado de productos (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    pub category: Option<Uuid>,
    pub brand: Option<String>,
    pub available: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

// Request para crear un producto
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub brand: String,
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub model: String,
    #[validate(custom = "validate_non_negative_price")]
    pub base_price: Decimal,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub specifications: ProductSpecifications,
    pub stock: Option<Stock>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

// Request para actualizar un producto (todos los campos opcionales)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub model: Option<String>,
    #[validate(custom = "validate_non_negative_price")]
    pub base_price: Option<Decimal>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub specifications: Option<ProductSpecifications>,
    pub stock: Option<Stock>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<ProductImage>>,
    pub active: Option<bool>,
}

// Response de producto con precios calculados
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub brand: String,
    pub model: String,
    pub base_price: Decimal,
    pub description: Option<String>,
    pub specifications: ProductSpecifications,
    pub stock: Stock,
    pub tags: Vec<String>,
    pub active: bool,
    pub images: Vec<ProductImage>,
    pub prices: InstallmentPrices,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, prices: InstallmentPrices) -> Self {
        Self {
            id: product.id,
            category_id: product.category_id,
            category_name: product.category_name,
            brand: product.brand,
            model: product.model,
            base_price: product.base_price,
            description: product.description,
            specifications: product.specifications,
            stock: product.stock,
            tags: product.tags,
            active: product.active,
            images: product.images,
            prices,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

// Response de la cotización rápida de un producto
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub product_id: Uuid,
    pub product: ProductSnapshot,
    pub prices: InstallmentPrices,
    pub factors: PricingFactors,
}
