//! Motor de precios
//!
//! Convierte un precio base en precio de contado y planes en cuotas.
//! Es puro y determinístico: no lee configuración ni valida la entrada.
//! Toda la aritmética es chequeada: un desborde de `Decimal` se reporta
//! como `AppError::InvalidInput` en lugar de abortar el request.
//!
//! Precondición: `base_price >= 0` (lo garantiza el modelo de Product).

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::pricing::{InstallmentPlan, InstallmentPrices, PricingFactors};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::format::round_currency;

/// Calcula precio de contado y planes de 3 y 6 cuotas
pub fn compute_installments(
    base_price: Decimal,
    factors: &PricingFactors,
) -> AppResult<InstallmentPrices> {
    let markup = Decimal::ONE.checked_add(factors.profit_margin).ok_or_else(overflow)?;
    let cash = checked_mul(base_price, markup)?;

    Ok(InstallmentPrices {
        cash,
        three_installments: plan(checked_mul(cash, factors.factor3)?, 3),
        six_installments: plan(checked_mul(cash, factors.factor6)?, 6),
    })
}

fn plan(total: Decimal, installments: u32) -> InstallmentPlan {
    InstallmentPlan {
        total,
        per_installment: total / Decimal::from(installments),
    }
}

fn checked_mul(a: Decimal, b: Decimal) -> AppResult<Decimal> {
    a.checked_mul(b).ok_or_else(overflow)
}

fn checked_add(a: Decimal, b: Decimal) -> AppResult<Decimal> {
    a.checked_add(b).ok_or_else(overflow)
}

fn overflow() -> AppError {
    AppError::InvalidInput("Los montos calculados exceden el rango numérico soportado".to_string())
}

impl InstallmentPrices {
    pub const ZERO: InstallmentPrices = InstallmentPrices {
        cash: Decimal::ZERO,
        three_installments: InstallmentPlan {
            total: Decimal::ZERO,
            per_installment: Decimal::ZERO,
        },
        six_installments: InstallmentPlan {
            total: Decimal::ZERO,
            per_installment: Decimal::ZERO,
        },
    };

    /// Copia con todos los montos redondeados a unidades enteras
    pub fn rounded(&self) -> Self {
        self.map_amounts(round_currency)
    }

    /// Copia con todos los montos redondeados a centavos
    pub fn rounded_to_cents(&self) -> Self {
        self.map_amounts(|amount| {
            amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        })
    }

    /// Multiplica todos los montos por una cantidad
    pub fn times(&self, quantity: u32) -> AppResult<Self> {
        let qty = Decimal::from(quantity);
        Ok(Self {
            cash: checked_mul(self.cash, qty)?,
            three_installments: InstallmentPlan {
                total: checked_mul(self.three_installments.total, qty)?,
                per_installment: checked_mul(self.three_installments.per_installment, qty)?,
            },
            six_installments: InstallmentPlan {
                total: checked_mul(self.six_installments.total, qty)?,
                per_installment: checked_mul(self.six_installments.per_installment, qty)?,
            },
        })
    }

    /// Suma monto a monto
    pub fn plus(&self, other: &Self) -> AppResult<Self> {
        Ok(Self {
            cash: checked_add(self.cash, other.cash)?,
            three_installments: InstallmentPlan {
                total: checked_add(self.three_installments.total, other.three_installments.total)?,
                per_installment: checked_add(
                    self.three_installments.per_installment,
                    other.three_installments.per_installment,
                )?,
            },
            six_installments: InstallmentPlan {
                total: checked_add(self.six_installments.total, other.six_installments.total)?,
                per_installment: checked_add(
                    self.six_installments.per_installment,
                    other.six_installments.per_installment,
                )?,
            },
        })
    }

    fn map_amounts(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            cash: f(self.cash),
            three_installments: InstallmentPlan {
                total: f(self.three_installments.total),
                per_installment: f(self.three_installments.per_installment),
            },
            six_installments: InstallmentPlan {
                total: f(self.six_installments.total),
                per_installment: f(self.six_installments.per_installment),
            },
        }
    }
}
