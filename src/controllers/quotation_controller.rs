use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::api_response::{ApiResponse, PaginatedResponse};
use crate::dto::quotation_dto::{
    CreateQuotationRequest, MessageResponse, QuotationListParams, QuotationResponse,
    StatsResponse, UpdateStatusRequest,
};
use crate::models::query::{QuotationFilter, QuotationQuery};
use crate::models::quotation::{Quotation, QuotationStatus};
use crate::repositories::{ProductStore, QuotationStore};
use crate::services::catalog_query::{PageInfo, Pagination};
use crate::services::quotation_builder::{render_message, whatsapp_url, QuotationBuilder};
use crate::state::AppState;
use crate::utils::clock::Clock;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::normalize_optional;

pub struct QuotationController {
    quotations: Arc<dyn QuotationStore>,
    products: Arc<dyn ProductStore>,
    builder: Arc<QuotationBuilder>,
    clock: Arc<dyn Clock>,
}

impl QuotationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            quotations: state.quotations.clone(),
            products: state.products.clone(),
            builder: state.quotation_builder.clone(),
            clock: state.clock.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateQuotationRequest,
    ) -> AppResult<ApiResponse<QuotationResponse>> {
        if request.items.is_empty() {
            return Err(AppError::EmptyQuotation);
        }
        request.validate()?;

        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = request
            .items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| seen.insert(*id))
            .collect();
        let products = self.products.find_active_by_ids(&ids).await?;

        let quotation = self.builder.build(&request, &products)?;
        let stored = self.quotations.create(&quotation).await?;

        info!(
            "🧾 Cotización creada: {} ({} items, total ${})",
            stored.id,
            stored.items.len(),
            stored.totals.selected
        );
        Ok(ApiResponse::success_with_message(
            self.respond(stored),
            "Cotización creada exitosamente".to_string(),
        ))
    }

    /// Listado filtrado, más recientes primero
    pub async fn list(
        &self,
        params: QuotationListParams,
    ) -> AppResult<PaginatedResponse<QuotationResponse>> {
        let pagination = Pagination::from_params(params.page, params.page_size);
        let filter = QuotationFilter {
            status: params.status,
            created_from: params.from,
            created_to: params.to,
            contact_search: normalize_optional(params.search),
        };
        let query = QuotationQuery {
            filter,
            skip: pagination.skip(),
            limit: pagination.page_size,
        };

        let quotations = self.quotations.find(&query).await?;
        let total = self.quotations.count(&query.filter).await?;
        let page_info = PageInfo::new(pagination, total, quotations.len() as u64);

        let data = quotations.into_iter().map(|q| self.respond(q)).collect();
        Ok(PaginatedResponse::new(data, page_info))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<ApiResponse<QuotationResponse>> {
        let quotation = self.find_existing(id).await?;
        Ok(ApiResponse::success(self.respond(quotation)))
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateStatusRequest,
    ) -> AppResult<ApiResponse<QuotationResponse>> {
        let current = self.find_existing(id).await?;
        if !current.status.can_transition_to(request.status) {
            return Err(AppError::InvalidTransition {
                from: current.status,
                to: request.status,
            });
        }

        let updated = self
            .quotations
            .update_status(id, request.status, self.clock.now())
            .await?
            .ok_or_else(|| not_found_error("Quotation", &id))?;

        info!("🔁 Cotización {}: {} -> {}", id, current.status, updated.status);
        Ok(ApiResponse::success_with_message(
            self.respond(updated),
            "Estado actualizado exitosamente".to_string(),
        ))
    }

    /// Mensaje para compartir, regenerado a partir de la cotización guardada
    pub async fn message(&self, id: Uuid) -> AppResult<ApiResponse<MessageResponse>> {
        let quotation = self.find_existing(id).await?;
        let message = render_message(&quotation, self.builder.settings());
        let url = whatsapp_url(&quotation.contact.phone, &message);

        Ok(ApiResponse::success(MessageResponse {
            message,
            phone: quotation.contact.phone,
            whatsapp_url: url,
        }))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<Uuid>> {
        if !self.quotations.delete(id).await? {
            return Err(not_found_error("Quotation", &id));
        }

        info!("🗑️ Cotización eliminada: {}", id);
        Ok(ApiResponse::success_with_message(
            id,
            "Cotización eliminada exitosamente".to_string(),
        ))
    }

    pub async fn stats(&self) -> AppResult<ApiResponse<StatsResponse>> {
        let periods = PeriodStarts::at(self.clock.now(), self.builder.settings().utc_offset);

        let total = self.quotations.count(&QuotationFilter::default()).await?;
        let today = self.count_since(periods.day).await?;
        let this_week = self.count_since(periods.week).await?;
        let this_month = self.count_since(periods.month).await?;

        let counts = self.quotations.count_by_status().await?;
        let by_status = QuotationStatus::ALL
            .iter()
            .map(|status| {
                let count = counts.get(status).copied().unwrap_or(0);
                (status.as_str().to_string(), count)
            })
            .collect::<BTreeMap<_, _>>();

        Ok(ApiResponse::success(StatsResponse {
            total,
            today,
            this_week,
            this_month,
            by_status,
        }))
    }

    async fn count_since(&self, from: DateTime<Utc>) -> AppResult<u64> {
        let filter = QuotationFilter {
            created_from: Some(from),
            ..Default::default()
        };
        self.quotations.count(&filter).await
    }

    async fn find_existing(&self, id: Uuid) -> AppResult<Quotation> {
        self.quotations
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Quotation", &id))
    }

    fn respond(&self, quotation: Quotation) -> QuotationResponse {
        let is_valid = quotation.is_valid(self.clock.now());
        QuotationResponse { quotation, is_valid }
    }
}

/// Inicio del día, de la semana (domingo) y del mes en el huso local
#[derive(Debug, PartialEq)]
struct PeriodStarts {
    day: DateTime<Utc>,
    week: DateTime<Utc>,
    month: DateTime<Utc>,
}

impl PeriodStarts {
    fn at(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        let today = now.with_timezone(&offset).date_naive();
        let week = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
        let month = today - Duration::days(today.day0() as i64);

        Self {
            day: local_midnight(today, offset),
            week: local_midnight(week, offset),
            month: local_midnight(month, offset),
        }
    }
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::default());
    Utc.from_utc_datetime(&(local - Duration::seconds(offset.local_minus_utc() as i64)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_starts_in_local_time() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        // Jueves 12/3/2026 01:00 en UTC-3
        let now = Utc.with_ymd_and_hms(2026, 3, 12, 4, 0, 0).unwrap();

        let periods = PeriodStarts::at(now, offset);
        assert_eq!(periods.day, Utc.with_ymd_and_hms(2026, 3, 12, 3, 0, 0).unwrap());
        assert_eq!(periods.week, Utc.with_ymd_and_hms(2026, 3, 8, 3, 0, 0).unwrap());
        assert_eq!(periods.month, Utc.with_ymd_and_hms(2026, 3, 1, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_period_starts_before_local_midnight() {
        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        // 1/4/2026 01:00 UTC es todavía 31/3 en UTC-3
        let now = Utc.with_ymd_and_hms(2026, 4, 1, 1, 0, 0).unwrap();

        let periods = PeriodStarts::at(now, offset);
        assert_eq!(periods.day, Utc.with_ymd_and_hms(2026, 3, 31, 3, 0, 0).unwrap());
        assert_eq!(periods.month, Utc.with_ymd_and_hms(2026, 3, 1, 3, 0, 0).unwrap());
    }
}
