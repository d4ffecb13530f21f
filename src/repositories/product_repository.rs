use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{escape_like, sql_window, ProductStore};
use crate::models::product::{
    NewProduct, Product, ProductChanges, ProductImage, ProductSpecifications, Stock,
};
use crate::models::query::{ProductFilter, ProductOrder, ProductQuery};
use crate::utils::errors::AppResult;

/// Columnas del producto con la categoría resuelta por LEFT JOIN
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.category_id, c.name AS category_name, p.brand, p.model, p.base_price,
           p.description, p.specifications, p.stock_quantity, p.stock_available, p.tags,
           p.active, p.images, p.created_at, p.updated_at
"#;

/// Documento de búsqueda de texto: marca, modelo, descripción y tags
const SEARCH_DOCUMENT: &str = "to_tsvector('spanish', p.brand || ' ' || p.model || ' ' \
     || COALESCE(p.description, '') || ' ' || array_to_string(p.tags, ' '))";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    category_id: Uuid,
    category_name: Option<String>,
    brand: String,
    model: String,
    base_price: Decimal,
    description: Option<String>,
    specifications: Json<ProductSpecifications>,
    stock_quantity: i32,
    stock_available: bool,
    tags: Vec<String>,
    active: bool,
    images: Json<Vec<ProductImage>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            category_id: row.category_id,
            category_name: row.category_name,
            brand: row.brand,
            model: row.model,
            base_price: row.base_price,
            description: row.description,
            specifications: row.specifications.0,
            stock: Stock {
                quantity: row.stock_quantity,
                available: row.stock_available,
            },
            tags: row.tags,
            active: row.active,
            images: row.images.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE p.active = TRUE");

    if let Some(category_id) = filter.category_id {
        builder.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(brand) = &filter.brand_contains {
        builder
            .push(" AND p.brand ILIKE ")
            .push_bind(format!("%{}%", escape_like(brand)));
    }
    if let Some(available) = filter.available {
        builder.push(" AND p.stock_available = ").push_bind(available);
    }
    if let Some(text) = &filter.text {
        builder
            .push(" AND ")
            .push(SEARCH_DOCUMENT)
            .push(" @@ plainto_tsquery('spanish', ")
            .push_bind(text.clone())
            .push(")");
    }
}

fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: ProductOrder, text: Option<&str>) {
    builder.push(" ORDER BY ");
    match (order, text) {
        (ProductOrder::Relevance, Some(text)) => {
            builder
                .push("ts_rank(")
                .push(SEARCH_DOCUMENT)
                .push(", plainto_tsquery('spanish', ")
                .push_bind(text.to_string())
                .push(")) DESC, p.created_at DESC");
        }
        (ProductOrder::Alphabetical, _) => {
            builder.push("lower(p.brand) ASC, lower(p.model) ASC");
        }
        (ProductOrder::PriceAsc, _) => {
            builder.push("p.base_price ASC");
        }
        (ProductOrder::PriceDesc, _) => {
            builder.push("p.base_price DESC");
        }
        (ProductOrder::CategoryName, _) => {
            builder.push("lower(c.name) ASC NULLS LAST");
        }
        (ProductOrder::Recent, _) | (ProductOrder::Relevance, None) => {
            builder.push("p.created_at DESC");
        }
    }
    builder.push(", p.id ASC");
}

pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn find(&self, query: &ProductQuery) -> AppResult<Vec<Product>> {
        let mut builder = QueryBuilder::<Postgres>::new(PRODUCT_SELECT);
        builder.push(" FROM products p LEFT JOIN categories c ON c.id = p.category_id");
        push_filter(&mut builder, &query.filter);
        push_order(&mut builder, query.order, query.filter.text.as_deref());
        let (limit, offset) = sql_window(query.limit, query.skip);
        builder
            .push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count(&self, filter: &ProductFilter) -> AppResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filter(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        let query = format!(
            "{} FROM products p LEFT JOIN categories c ON c.id = p.category_id WHERE p.id = $1",
            PRODUCT_SELECT
        );
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn find_active_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Product>> {
        let query = format!(
            "{} FROM products p LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.id = ANY($1) AND p.active = TRUE",
            PRODUCT_SELECT
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let now = Utc::now();
        let query = format!(
            r#"
            WITH p AS (
                INSERT INTO products (
                    id, category_id, brand, model, base_price, description, specifications,
                    stock_quantity, stock_available, tags, active, images, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE, $11, $12, $12)
                RETURNING *
            )
            {} FROM p LEFT JOIN categories c ON c.id = p.category_id
            "#,
            PRODUCT_SELECT
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(Uuid::new_v4())
            .bind(product.category_id)
            .bind(product.brand)
            .bind(product.model)
            .bind(product.base_price)
            .bind(product.description)
            .bind(Json(product.specifications))
            .bind(product.stock.quantity)
            .bind(product.stock.available)
            .bind(product.tags)
            .bind(Json(product.images))
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn update(&self, id: Uuid, changes: ProductChanges) -> AppResult<Option<Product>> {
        let query = format!(
            r#"
            WITH p AS (
                UPDATE products SET
                    category_id = COALESCE($2, category_id),
                    brand = COALESCE($3, brand),
                    model = COALESCE($4, model),
                    base_price = COALESCE($5, base_price),
                    description = COALESCE($6, description),
                    specifications = COALESCE($7, specifications),
                    stock_quantity = COALESCE($8, stock_quantity),
                    stock_available = COALESCE($9, stock_available),
                    tags = COALESCE($10, tags),
                    images = COALESCE($11, images),
                    active = COALESCE($12, active),
                    updated_at = $13
                WHERE id = $1
                RETURNING *
            )
            {} FROM p LEFT JOIN categories c ON c.id = p.category_id
            "#,
            PRODUCT_SELECT
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .bind(changes.category_id)
            .bind(changes.brand)
            .bind(changes.model)
            .bind(changes.base_price)
            .bind(changes.description)
            .bind(changes.specifications.map(Json))
            .bind(changes.stock.map(|s| s.quantity))
            .bind(changes.stock.map(|s| s.available))
            .bind(changes.tags)
            .bind(changes.images.map(Json))
            .bind(changes.active)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Product::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_shape() {
        let filter = ProductFilter {
            category_id: Some(Uuid::nil()),
            brand_contains: Some("lg".to_string()),
            available: Some(true),
            text: None,
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products p");
        push_filter(&mut builder, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM products p WHERE p.active = TRUE AND p.category_id = $1 \
             AND p.brand ILIKE $2 AND p.stock_available = $3"
        );
    }

    #[test]
    fn test_relevance_order_binds_search_text() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p");
        push_order(&mut builder, ProductOrder::Relevance, Some("heladera"));
        assert!(builder.sql().contains("ts_rank("));
        assert!(builder.sql().ends_with("DESC, p.created_at DESC, p.id ASC"));
    }

    #[test]
    fn test_category_order_puts_dangling_last() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM products p");
        push_order(&mut builder, ProductOrder::CategoryName, None);
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM products p ORDER BY lower(c.name) ASC NULLS LAST, p.id ASC"
        );
    }
}
