//! Modelos de precios: factores de financiación y planes en cuotas

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_margin, validate_positive_factor};

/// Factores usados para pasar de precio base a precio de venta y cuotas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingFactors {
    pub profit_margin: Decimal,
    pub factor3: Decimal,
    pub factor6: Decimal,
}

impl PricingFactors {
    pub const DEFAULT_PROFIT_MARGIN: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
    pub const DEFAULT_FACTOR_3: Decimal = Decimal::from_parts(11298, 0, 0, false, 4);
    pub const DEFAULT_FACTOR_6: Decimal = Decimal::from_parts(12138, 0, 0, false, 4);

    /// Aplica los overrides de un request sobre estos factores
    pub fn with_overrides(&self, overrides: &PricingOverrides) -> Self {
        Self {
            profit_margin: overrides.profit_margin.unwrap_or(self.profit_margin),
            factor3: overrides.factor3.unwrap_or(self.factor3),
            factor6: overrides.factor6.unwrap_or(self.factor6),
        }
    }
}

impl Default for PricingFactors {
    fn default() -> Self {
        Self {
            profit_margin: Self::DEFAULT_PROFIT_MARGIN,
            factor3: Self::DEFAULT_FACTOR_3,
            factor6: Self::DEFAULT_FACTOR_6,
        }
    }
}

/// Overrides opcionales de factores a nivel request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PricingOverrides {
    #[validate(custom = "validate_margin")]
    pub profit_margin: Option<Decimal>,
    #[validate(custom = "validate_positive_factor")]
    pub factor3: Option<Decimal>,
    #[validate(custom = "validate_positive_factor")]
    pub factor6: Option<Decimal>,
}

/// Un plan de financiación: total y valor de cada cuota
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total: Decimal,
    pub per_installment: Decimal,
}

/// Resultado del motor de precios para un precio base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPrices {
    pub cash: Decimal,
    pub three_installments: InstallmentPlan,
    pub six_installments: InstallmentPlan,
}

/// Forma de pago elegida en una cotización
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Cash,
    ThreeInstallments,
    SixInstallments,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::ThreeInstallments => "three_installments",
            PaymentMode::SixInstallments => "six_installments",
        }
    }

    /// Etiqueta usada en los mensajes
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Contado",
            PaymentMode::ThreeInstallments => "3 Cuotas",
            PaymentMode::SixInstallments => "6 Cuotas",
        }
    }

    /// Precio correspondiente a esta forma de pago
    pub fn price_in(&self, prices: &InstallmentPrices) -> Decimal {
        match self {
            PaymentMode::Cash => prices.cash,
            PaymentMode::ThreeInstallments => prices.three_installments.total,
            PaymentMode::SixInstallments => prices.six_installments.total,
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMode::Cash),
            "three_installments" => Ok(PaymentMode::ThreeInstallments),
            "six_installments" => Ok(PaymentMode::SixInstallments),
            other => Err(format!("unknown payment mode '{}'", other)),
        }
    }
}
