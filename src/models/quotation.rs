//! Modelo de Quotation
//!
//! Una cotización guarda una foto (snapshot) de los productos y precios al
//! momento de crearse. Cambios posteriores en el producto no la alteran.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::pricing::{InstallmentPlan, InstallmentPrices, PaymentMode, PricingFactors};

/// Estado de la cotización
///
/// `draft -> sent | rejected | expired`, `sent -> accepted | rejected | expired`.
/// `accepted`, `rejected` y `expired` son finales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

impl QuotationStatus {
    pub const ALL: [QuotationStatus; 5] = [
        QuotationStatus::Draft,
        QuotationStatus::Sent,
        QuotationStatus::Accepted,
        QuotationStatus::Rejected,
        QuotationStatus::Expired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Draft => "draft",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Accepted => "accepted",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuotationStatus::Accepted | QuotationStatus::Rejected | QuotationStatus::Expired
        )
    }

    pub fn can_transition_to(&self, next: QuotationStatus) -> bool {
        use QuotationStatus::*;
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Draft, Sent) | (Draft, Rejected) | (Draft, Expired)
                | (Sent, Accepted) | (Sent, Rejected) | (Sent, Expired)
        )
    }
}

impl fmt::Display for QuotationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuotationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown quotation status '{}'", s))
    }
}

/// Datos de contacto del cliente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
}

/// Foto de los datos descriptivos del producto al cotizar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub category: String,
    pub brand: String,
    pub model: String,
    pub description: Option<String>,
    pub base_price: Decimal,
}

/// Línea de la cotización
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub snapshot: ProductSnapshot,
    /// Precios unitarios calculados al cotizar
    pub prices: InstallmentPrices,
}

/// Totales de la cotización por plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotationTotals {
    pub cash: Decimal,
    pub three_installments: InstallmentPlan,
    pub six_installments: InstallmentPlan,
    /// Total de la forma de pago elegida
    pub selected: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub id: Uuid,
    pub contact: ContactInfo,
    pub items: Vec<QuotationItem>,
    pub payment_mode: PaymentMode,
    pub factors: PricingFactors,
    pub totals: QuotationTotals,
    pub status: QuotationStatus,
    pub valid_until: DateTime<Utc>,
    pub notes: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quotation {
    /// Vigencia consultiva: no modifica el estado guardado
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now <= self.valid_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        use QuotationStatus::*;

        assert!(Draft.can_transition_to(Sent));
        assert!(Draft.can_transition_to(Rejected));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Expired));

        assert!(!Draft.can_transition_to(Draft));
        assert!(!Draft.can_transition_to(Accepted));
        assert!(!Accepted.can_transition_to(Sent));
        assert!(!Expired.can_transition_to(Draft));

        for status in QuotationStatus::ALL {
            if status.is_terminal() {
                assert!(QuotationStatus::ALL.iter().all(|next| !status.can_transition_to(*next)));
            }
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in QuotationStatus::ALL {
            assert_eq!(status.as_str().parse::<QuotationStatus>().unwrap(), status);
        }
        assert!("pendiente".parse::<QuotationStatus>().is_err());
    }
}
