use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::models::pricing::{PaymentMode, PricingOverrides};
use crate::models::quotation::{Quotation, QuotationStatus};
use crate::utils::validation::validate_phone;

// Datos de contacto del cliente
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 8, max = 20), custom = "validate_phone")]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Línea pedida: producto y cantidad
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuotationItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: u32,
}

// Request para crear una cotización
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuotationRequest {
    #[validate]
    pub contact: ContactRequest,
    #[serde(default)]
    #[validate]
    pub items: Vec<QuotationItemRequest>,
    pub payment_mode: Option<PaymentMode>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    #[validate]
    pub factors: Option<PricingOverrides>,
}

// Request para cambiar el estado
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: QuotationStatus,
}

// Parámetros del listado de cotizaciones (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotationListParams {
    pub status: Option<QuotationStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

// Response de cotización con la vigencia calculada al momento de leer
#[derive(Debug, Serialize)]
pub struct QuotationResponse {
    #[serde(flatten)]
    pub quotation: Quotation,
    pub is_valid: bool,
}

// Mensaje listo para compartir
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub phone: String,
    pub whatsapp_url: String,
}

// Resumen estadístico de cotizaciones
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: u64,
    pub today: u64,
    pub this_week: u64,
    pub this_month: u64,
    pub by_status: BTreeMap<String, u64>,
}
