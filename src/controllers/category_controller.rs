use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::cache::CategoryCache;
use crate::dto::api_response::ApiResponse;
use crate::dto::category_dto::{CategoryListResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::category::{Category, CategoryChanges, NewCategory, DEFAULT_CATEGORY_ICON};
use crate::repositories::CategoryStore;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};
use crate::utils::validation::normalize_optional;

pub struct CategoryController {
    store: Arc<dyn CategoryStore>,
    cache: Arc<CategoryCache>,
}

impl CategoryController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.categories.clone(),
            cache: state.category_cache.clone(),
        }
    }

    /// Categorías activas desde el cache
    pub async fn list(&self) -> AppResult<CategoryListResponse> {
        let listing = self.cache.get().await?;
        let data = listing.categories.as_ref().clone();

        Ok(CategoryListResponse {
            success: true,
            count: data.len(),
            data,
            cached: listing.cached,
            warning: listing.warning,
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<Category>> {
        let category = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Category", &id))?;

        Ok(ApiResponse::success(category))
    }

    pub async fn create(&self, request: CreateCategoryRequest) -> AppResult<ApiResponse<Category>> {
        request.validate()?;

        let name = request.name.trim().to_string();
        if self.store.find_by_name(&name).await?.is_some() {
            return Err(conflict_error("Category", "name", &name));
        }

        let category = self
            .store
            .create(NewCategory {
                name,
                description: normalize_optional(request.description),
                icon: normalize_optional(request.icon)
                    .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string()),
            })
            .await?;
        self.cache.invalidate().await;

        info!("📂 Categoría creada: {} ({})", category.name, category.id);
        Ok(ApiResponse::success_with_message(
            category,
            "Categoría creada exitosamente".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateCategoryRequest,
    ) -> AppResult<ApiResponse<Category>> {
        request.validate()?;

        let name = request.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            if let Some(existing) = self.store.find_by_name(name).await? {
                if existing.id != id {
                    return Err(conflict_error("Category", "name", name));
                }
            }
        }

        let changes = CategoryChanges {
            name,
            description: normalize_optional(request.description),
            icon: normalize_optional(request.icon),
            active: request.active,
        };
        let category = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Category", &id))?;
        self.cache.invalidate().await;

        info!("✏️ Categoría actualizada: {}", category.id);
        Ok(ApiResponse::success_with_message(
            category,
            "Categoría actualizada exitosamente".to_string(),
        ))
    }

    /// Baja lógica: la categoría queda inactiva
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<Category>> {
        let changes = CategoryChanges {
            active: Some(false),
            ..Default::default()
        };
        let category = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| not_found_error("Category", &id))?;
        self.cache.invalidate().await;

        info!("🗑️ Categoría desactivada: {}", category.id);
        Ok(ApiResponse::success_with_message(
            category,
            "Categoría eliminada exitosamente".to_string(),
        ))
    }
}
