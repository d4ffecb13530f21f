use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::CategoryStore;
use crate::models::category::{Category, CategoryChanges, NewCategory};
use crate::utils::errors::{conflict_error, AppError, AppResult};

const CATEGORY_COLUMNS: &str = "id, name, description, active, icon, created_at, updated_at";

/// Código de Postgres para violación de índice único
const UNIQUE_VIOLATION: &str = "23505";

pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Traduce una violación de unicidad en `Conflict`; el resto sigue como error de base
fn map_unique_violation(e: sqlx::Error, name: &str) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            conflict_error("Category", "name", name)
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl CategoryStore for CategoryRepository {
    async fn find_active_sorted_by_name(&self) -> AppResult<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories WHERE active = TRUE ORDER BY name ASC, id ASC",
            CATEGORY_COLUMNS
        );
        let categories = sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let query = format!("SELECT {} FROM categories WHERE name = $1", CATEGORY_COLUMNS);
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    async fn create(&self, category: NewCategory) -> AppResult<Category> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO categories (id, name, description, active, icon, created_at, updated_at)
            VALUES ($1, $2, $3, TRUE, $4, $5, $5)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        sqlx::query_as::<_, Category>(&query)
            .bind(Uuid::new_v4())
            .bind(&category.name)
            .bind(&category.description)
            .bind(&category.icon)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &category.name))
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> AppResult<Option<Category>> {
        let query = format!(
            r#"
            UPDATE categories SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                icon = COALESCE($4, icon),
                active = COALESCE($5, active),
                updated_at = $6
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let name = changes.name.clone().unwrap_or_default();
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(changes.name)
            .bind(changes.description)
            .bind(changes.icon)
            .bind(changes.active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, &name))
    }
}
