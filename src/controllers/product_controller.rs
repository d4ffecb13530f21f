use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::{ApiResponse, PaginatedResponse};
use crate::dto::product_dto::{
    CreateProductRequest, ProductListParams, ProductResponse, QuoteResponse, UpdateProductRequest,
};
use crate::models::pricing::{PricingFactors, PricingOverrides};
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::quotation::ProductSnapshot;
use crate::repositories::{CategoryStore, ProductStore};
use crate::services::catalog_query::{build_product_query, PageInfo};
use crate::services::pricing_engine::compute_installments;
use crate::services::quotation_builder::UNKNOWN_CATEGORY;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, validation_error, AppResult};
use crate::utils::validation::normalize_optional;

pub struct ProductController {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    factors: PricingFactors,
}

impl ProductController {
    pub fn new(state: &AppState) -> Self {
        Self {
            products: state.products.clone(),
            categories: state.categories.clone(),
            factors: state.config.pricing,
        }
    }

    /// Listado filtrado, ordenado y paginado
    pub async fn list_products(
        &self,
        params: ProductListParams,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        let (query, pagination) = build_product_query(&params);
        debug!("🔎 Consulta de productos: {:?}", query);

        let products = self.products.find(&query).await?;
        let total = self.products.count(&query.filter).await?;
        let page_info = PageInfo::new(pagination, total, products.len() as u64);

        let data = products
            .into_iter()
            .map(|product| self.with_prices(product))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(PaginatedResponse::new(data, page_info))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<ProductResponse>> {
        let product = self.find_existing(id).await?;
        Ok(ApiResponse::success(self.with_prices(product)?))
    }

    pub async fn create(&self, request: CreateProductRequest) -> AppResult<ApiResponse<ProductResponse>> {
        request.validate()?;
        compute_installments(request.base_price, &self.factors)?;
        self.ensure_category_exists(request.category_id).await?;

        let product = self
            .products
            .create(NewProduct {
                category_id: request.category_id,
                brand: request.brand.trim().to_string(),
                model: request.model.trim().to_string(),
                base_price: request.base_price,
                description: normalize_optional(request.description),
                specifications: request.specifications,
                stock: request.stock.unwrap_or_default(),
                tags: clean_tags(request.tags),
                images: request.images,
            })
            .await?;

        info!("📦 Producto creado: {} {} ({})", product.brand, product.model, product.id);
        Ok(ApiResponse::success_with_message(
            self.with_prices(product)?,
            "Producto creado exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> AppResult<ApiResponse<ProductResponse>> {
        request.validate()?;
        if let Some(base_price) = request.base_price {
            compute_installments(base_price, &self.factors)?;
        }
        if let Some(category_id) = request.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let changes = ProductChanges {
            category_id: request.category_id,
            brand: request.brand.map(|b| b.trim().to_string()),
            model: request.model.map(|m| m.trim().to_string()),
            base_price: request.base_price,
            description: normalize_optional(request.description),
            specifications: request.specifications,
            stock: request.stock,
            tags: request.tags.map(clean_tags),
            images: request.images,
            active: request.active,
        };
        let product = self
            .products
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Product", &id))?;

        info!("✏️ Producto actualizado: {}", product.id);
        Ok(ApiResponse::success_with_message(
            self.with_prices(product)?,
            "Producto actualizado exitosamente".to_string(),
        ))
    }

    /// Baja lógica: el producto deja de listarse y de poder cotizarse
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<ProductResponse>> {
        let changes = ProductChanges {
            active: Some(false),
            ..Default::default()
        };
        let product = self
            .products
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Product", &id))?;

        info!("🗑️ Producto desactivado: {}", product.id);
        Ok(ApiResponse::success_with_message(
            self.with_prices(product)?,
            "Producto eliminado exitosamente".to_string(),
        ))
    }

    /// Cotización rápida de un producto, con factores opcionales del request
    pub async fn quote(
        &self,
        id: Uuid,
        overrides: PricingOverrides,
    ) -> AppResult<ApiResponse<QuoteResponse>> {
        overrides.validate()?;
        let product = self.find_existing(id).await?;
        let factors = self.factors.with_overrides(&overrides);
        let prices = compute_installments(product.base_price, &factors)?.rounded_to_cents();

        Ok(ApiResponse::success(QuoteResponse {
            product_id: product.id,
            product: ProductSnapshot {
                category: product
                    .category_name
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                brand: product.brand,
                model: product.model,
                description: product.description,
                base_price: product.base_price,
            },
            prices,
            factors,
        }))
    }

    async fn find_existing(&self, id: Uuid) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Product", &id))
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> AppResult<()> {
        match self.categories.find_by_id(category_id).await? {
            Some(_) => Ok(()),
            None => Err(validation_error("category_id", "La categoría indicada no existe")),
        }
    }

    fn with_prices(&self, product: Product) -> AppResult<ProductResponse> {
        let prices = compute_installments(product.base_price, &self.factors)?.rounded_to_cents();
        Ok(ProductResponse::new(product, prices))
    }
}

/// Recorta tags y descarta los vacíos
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
