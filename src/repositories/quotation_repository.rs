use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;
use uuid::Uuid;

use super::{escape_like, sql_window, QuotationStore};
use crate::models::pricing::{PaymentMode, PricingFactors};
use crate::models::query::{QuotationFilter, QuotationQuery};
use crate::models::quotation::{
    ContactInfo, Quotation, QuotationItem, QuotationStatus, QuotationTotals,
};
use crate::utils::errors::{AppError, AppResult};

const QUOTATION_COLUMNS: &str = "id, contact, items, payment_mode, factors, totals, status, \
     valid_until, notes, message, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    contact: Json<ContactInfo>,
    items: Json<Vec<QuotationItem>>,
    payment_mode: String,
    factors: Json<PricingFactors>,
    totals: Json<QuotationTotals>,
    status: String,
    valid_until: DateTime<Utc>,
    notes: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuotationRow> for Quotation {
    type Error = AppError;

    fn try_from(row: QuotationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<QuotationStatus>()
            .map_err(AppError::Internal)?;
        let payment_mode = row
            .payment_mode
            .parse::<PaymentMode>()
            .map_err(AppError::Internal)?;

        Ok(Self {
            id: row.id,
            contact: row.contact.0,
            items: row.items.0,
            payment_mode,
            factors: row.factors.0,
            totals: row.totals.0,
            status,
            valid_until: row.valid_until,
            notes: row.notes,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &QuotationFilter) {
    builder.push(" WHERE TRUE");

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(from) = filter.created_from {
        builder.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.created_to {
        builder.push(" AND created_at <= ").push_bind(to);
    }
    if let Some(search) = &filter.contact_search {
        let pattern = format!("%{}%", escape_like(search));
        builder
            .push(" AND (contact->>'name' ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR contact->>'phone' ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

pub struct QuotationRepository {
    pool: PgPool,
}

impl QuotationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuotationStore for QuotationRepository {
    async fn create(&self, quotation: &Quotation) -> AppResult<Quotation> {
        let query = format!(
            r#"
            INSERT INTO quotations (
                id, contact, items, payment_mode, factors, totals, status,
                valid_until, notes, message, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            QUOTATION_COLUMNS
        );

        let row = sqlx::query_as::<_, QuotationRow>(&query)
            .bind(quotation.id)
            .bind(Json(&quotation.contact))
            .bind(Json(&quotation.items))
            .bind(quotation.payment_mode.as_str())
            .bind(Json(&quotation.factors))
            .bind(Json(&quotation.totals))
            .bind(quotation.status.as_str())
            .bind(quotation.valid_until)
            .bind(&quotation.notes)
            .bind(&quotation.message)
            .bind(quotation.created_at)
            .bind(quotation.updated_at)
            .fetch_one(&self.pool)
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Quotation>> {
        let query = format!("SELECT {} FROM quotations WHERE id = $1", QUOTATION_COLUMNS);
        let row = sqlx::query_as::<_, QuotationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Quotation::try_from).transpose()
    }

    async fn find(&self, query: &QuotationQuery) -> AppResult<Vec<Quotation>> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM quotations", QUOTATION_COLUMNS));
        push_filter(&mut builder, &query.filter);
        let (limit, offset) = sql_window(query.limit, query.skip);
        builder
            .push(" ORDER BY created_at DESC, id ASC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<QuotationRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Quotation::try_from).collect()
    }

    async fn count(&self, filter: &QuotationFilter) -> AppResult<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM quotations");
        push_filter(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: QuotationStatus,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Option<Quotation>> {
        let query = format!(
            "UPDATE quotations SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            QUOTATION_COLUMNS
        );
        let row = sqlx::query_as::<_, QuotationRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Quotation::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM quotations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> AppResult<HashMap<QuotationStatus, u64>> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM quotations GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = HashMap::new();
        for (status, total) in rows {
            let status = status.parse::<QuotationStatus>().map_err(AppError::Internal)?;
            counts.insert(status, total.max(0) as u64);
        }

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sql_shape() {
        let filter = QuotationFilter {
            status: Some(QuotationStatus::Sent),
            created_from: Some(Utc::now()),
            created_to: None,
            contact_search: Some("ana".to_string()),
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM quotations");
        push_filter(&mut builder, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM quotations WHERE TRUE AND status = $1 AND created_at >= $2 \
             AND (contact->>'name' ILIKE $3 OR contact->>'phone' ILIKE $4)"
        );
    }

    #[test]
    fn test_empty_filter() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM quotations");
        push_filter(&mut builder, &QuotationFilter::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM quotations WHERE TRUE");
    }
}
