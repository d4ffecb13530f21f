//! Formato de montos y fechas para los mensajes de cotización (es-AR)

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Redondea a unidades enteras de moneda (medio hacia afuera)
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Formatea un monto en unidades enteras con `.` como separador de miles.
///
/// `146874.4` -> `"146.874"`, `1234567` -> `"1.234.567"`.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_currency(value).to_i128().unwrap_or_default();
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Fecha corta `d/m/aaaa` en el huso horario indicado
pub fn format_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%-d/%-m/%Y").to_string()
}

/// Construye un huso horario fijo a partir de horas respecto de UTC
pub fn utc_offset(hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_format_amount_groups_thousands() {
        assert_eq!(format_amount(Decimal::from(0)), "0");
        assert_eq!(format_amount(Decimal::from(999)), "999");
        assert_eq!(format_amount(Decimal::from(1000)), "1.000");
        assert_eq!(format_amount(Decimal::from(146874)), "146.874");
        assert_eq!(format_amount(Decimal::from(1234567)), "1.234.567");
        assert_eq!(format_amount(Decimal::from(-25000)), "-25.000");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(Decimal::from_str("48957.5").unwrap()), "48.958");
        assert_eq!(format_amount(Decimal::from_str("26298.49").unwrap()), "26.298");
    }

    #[test]
    fn test_format_date_uses_offset() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 2, 30, 0).unwrap();
        // 02:30 UTC es todavía el día anterior en UTC-3
        assert_eq!(format_date(at, utc_offset(-3).unwrap()), "4/3/2026");
        assert_eq!(format_date(at, utc_offset(0).unwrap()), "5/3/2026");
    }
}
