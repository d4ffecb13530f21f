//! Constructor de cotizaciones
//!
//! Toma una foto de los productos pedidos, calcula precios y totales con el
//! motor de precios y arma el mensaje para compartir por WhatsApp.

use chrono::{Duration, FixedOffset, Offset, Utc};
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::quotation_dto::CreateQuotationRequest;
use crate::models::pricing::{InstallmentPrices, PricingFactors};
use crate::models::product::Product;
use crate::models::quotation::{
    ContactInfo, ProductSnapshot, Quotation, QuotationItem, QuotationStatus, QuotationTotals,
};
use crate::services::pricing_engine::compute_installments;
use crate::utils::clock::Clock;
use crate::utils::errors::{validation_error, AppError, AppResult};
use crate::utils::format::{format_amount, format_date, utc_offset};
use crate::utils::validation::{normalize_optional, MAX_ITEM_QUANTITY};

pub const DEFAULT_VALIDITY_DAYS: i64 = 7;

/// Nombre de categoría usado cuando la referencia del producto quedó colgada
pub const UNKNOWN_CATEGORY: &str = "N/A";

/// Datos fijos del negocio que aparecen en el mensaje
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSettings {
    pub business_name: String,
    pub contact_whatsapp: String,
    pub contact_email: String,
    pub utc_offset: FixedOffset,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            business_name: "Hogar Conectado".to_string(),
            contact_whatsapp: "+54 9 11 XXXX-XXXX".to_string(),
            contact_email: "contacto@hogarconectado.com".to_string(),
            utc_offset: utc_offset(-3).unwrap_or_else(|| Utc.fix()),
        }
    }
}

pub struct QuotationBuilder {
    factors: PricingFactors,
    validity: Duration,
    settings: MessageSettings,
    clock: Arc<dyn Clock>,
}

impl QuotationBuilder {
    pub fn new(
        factors: PricingFactors,
        validity_days: i64,
        settings: MessageSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            factors,
            validity: Duration::days(validity_days),
            settings,
            clock,
        }
    }

    pub fn settings(&self) -> &MessageSettings {
        &self.settings
    }

    /// Arma una cotización en estado `draft` a partir del request.
    ///
    /// `products` son los productos activos encontrados para los ids pedidos;
    /// cualquier id ausente se reporta como no disponible.
    pub fn build(
        &self,
        request: &CreateQuotationRequest,
        products: &[Product],
    ) -> AppResult<Quotation> {
        if request.items.is_empty() {
            return Err(AppError::EmptyQuotation);
        }
        if request.items.iter().any(|item| item.quantity == 0) {
            return Err(validation_error("quantity", "La cantidad debe ser al menos 1"));
        }
        if request.items.iter().any(|item| item.quantity > MAX_ITEM_QUANTITY) {
            return Err(validation_error("quantity", "La cantidad supera el máximo por línea"));
        }

        let by_id: HashMap<Uuid, &Product> = products
            .iter()
            .filter(|p| p.active)
            .map(|p| (p.id, p))
            .collect();

        let mut missing: Vec<Uuid> = Vec::new();
        for item in &request.items {
            if !by_id.contains_key(&item.product_id) && !missing.contains(&item.product_id) {
                missing.push(item.product_id);
            }
        }
        if !missing.is_empty() {
            return Err(AppError::UnavailableProducts(missing));
        }

        let factors = match &request.factors {
            Some(overrides) => self.factors.with_overrides(overrides),
            None => self.factors,
        };

        let mut items = Vec::with_capacity(request.items.len());
        for requested in &request.items {
            let Some(product) = by_id.get(&requested.product_id) else {
                continue;
            };
            items.push(QuotationItem {
                product_id: product.id,
                quantity: requested.quantity,
                snapshot: snapshot_of(product),
                prices: compute_installments(product.base_price, &factors)?.rounded_to_cents(),
            });
        }

        let payment_mode = request.payment_mode.unwrap_or_default();
        let sum = sum_prices(&items)?;
        let totals = QuotationTotals {
            cash: sum.cash,
            three_installments: sum.three_installments,
            six_installments: sum.six_installments,
            selected: payment_mode.price_in(&sum),
        };

        let now = self.clock.now();
        let mut quotation = Quotation {
            id: Uuid::new_v4(),
            contact: ContactInfo {
                name: request.contact.name.trim().to_string(),
                phone: request.contact.phone.trim().to_string(),
                email: normalize_optional(request.contact.email.clone()),
                notes: normalize_optional(request.contact.notes.clone()),
            },
            items,
            payment_mode,
            factors,
            totals,
            status: QuotationStatus::Draft,
            valid_until: now + self.validity,
            notes: normalize_optional(request.notes.clone()),
            message: String::new(),
            created_at: now,
            updated_at: now,
        };
        quotation.message = render_message(&quotation, &self.settings);

        Ok(quotation)
    }
}

fn snapshot_of(product: &Product) -> ProductSnapshot {
    ProductSnapshot {
        category: product
            .category_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        brand: product.brand.clone(),
        model: product.model.clone(),
        description: product.description.clone(),
        base_price: product.base_price,
    }
}

/// Suma por plan de `precio unitario × cantidad`
fn sum_prices(items: &[QuotationItem]) -> AppResult<InstallmentPrices> {
    items.iter().try_fold(InstallmentPrices::ZERO, |sum, item| {
        sum.plus(&item.prices.times(item.quantity)?)
    })
}

/// Mensaje de la cotización, listo para compartir
pub fn render_message(quotation: &Quotation, settings: &MessageSettings) -> String {
    let totals = &quotation.totals;
    let mut out = String::new();

    // write! sobre String no falla
    let _ = writeln!(out, "🏠 *{}*", settings.business_name);
    out.push('\n');
    out.push_str("*Cotización*\n");
    let _ = writeln!(out, "👤 Cliente: {}", quotation.contact.name);
    out.push('\n');

    for item in &quotation.items {
        let snapshot = &item.snapshot;
        let _ = writeln!(out, "📦 {}", snapshot.category.to_uppercase());
        let _ = writeln!(
            out,
            "🏷️ {} - {}",
            snapshot.brand.to_uppercase(),
            snapshot.model.to_uppercase()
        );
        if let Some(description) = &snapshot.description {
            let _ = writeln!(out, "✏️ {}", description.to_uppercase());
        }
        let _ = writeln!(out, "🔢 Cantidad: {}", item.quantity);
        out.push('\n');
    }

    out.push_str("💰 *Precios:*\n");
    let _ = writeln!(out, "💵 Contado: ${}", format_amount(totals.cash));
    let _ = writeln!(
        out,
        "💳 3 Cuotas: ${} ({} c/u)",
        format_amount(totals.three_installments.total),
        format_amount(totals.three_installments.per_installment)
    );
    let _ = writeln!(
        out,
        "💳 6 Cuotas: ${} ({} c/u)",
        format_amount(totals.six_installments.total),
        format_amount(totals.six_installments.per_installment)
    );
    out.push('\n');

    let _ = writeln!(
        out,
        "✅ Forma de pago elegida: {} - Total ${}",
        quotation.payment_mode.label(),
        format_amount(totals.selected)
    );
    if let Some(notes) = &quotation.notes {
        let _ = writeln!(out, "📝 Notas: {}", notes);
    }
    out.push('\n');

    out.push_str("📞 *Contacto*\n");
    let _ = writeln!(out, "WhatsApp: {}", settings.contact_whatsapp);
    let _ = writeln!(out, "📧 Email: {}", settings.contact_email);
    out.push('\n');

    let _ = writeln!(
        out,
        "✨ *Cotización válida hasta:* {}",
        format_date(quotation.valid_until, settings.utc_offset)
    );
    out.push('\n');
    out.push_str("¡Gracias por elegirnos! 🌟");

    out
}

/// Enlace `wa.me` con el mensaje precargado; el teléfono se reduce a dígitos
pub fn whatsapp_url(phone: &str, message: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{}?text={}", digits, urlencoding::encode(message))
}
