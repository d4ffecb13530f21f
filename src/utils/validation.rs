//! Utilidades de validación
//!
//! Este módulo contiene funciones helper usadas por los `#[validate(custom)]`
//! de los DTOs y por los controladores.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Precio base máximo aceptado (10^15)
pub const MAX_BASE_PRICE: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);

/// Tope para factores de cuotas y margen de ganancia
pub const MAX_PRICING_FACTOR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Cantidad máxima por línea de cotización
pub const MAX_ITEM_QUANTITY: u32 = 10_000;

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio base no sea negativo ni supere `MAX_BASE_PRICE`
pub fn validate_non_negative_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("El precio base no puede ser negativo".into());
        return Err(error);
    }
    if *value > MAX_BASE_PRICE {
        let mut error = ValidationError::new("max_price");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max".into(), &MAX_BASE_PRICE.to_string());
        error.message = Some("El precio base supera el máximo permitido".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que un factor de precio sea positivo y no supere `MAX_PRICING_FACTOR`
pub fn validate_positive_factor(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    check_factor_cap(value)
}

/// Validar que un margen de ganancia no sea negativo ni excesivo
pub fn validate_margin(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        error.message = Some("El margen de ganancia no puede ser negativo".into());
        return Err(error);
    }
    check_factor_cap(value)
}

fn check_factor_cap(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_PRICING_FACTOR {
        let mut error = ValidationError::new("max_factor");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max".into(), &MAX_PRICING_FACTOR.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar un teléfono: debe contener al menos 8 dígitos
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        error.add_param("min_digits".into(), &8);
        return Err(error);
    }
    Ok(())
}

/// Normaliza un texto opcional: recorta espacios y descarta vacíos
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Heladeras").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_non_negative_price() {
        assert!(validate_non_negative_price(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_price(&Decimal::from(100)).is_ok());
        assert!(validate_non_negative_price(&Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_validate_positive_factor() {
        assert!(validate_positive_factor(&Decimal::from_str("1.1298").unwrap()).is_ok());
        assert!(validate_positive_factor(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_upper_bounds() {
        assert_eq!(MAX_BASE_PRICE, Decimal::from_str("1000000000000000").unwrap());
        assert!(validate_non_negative_price(&MAX_BASE_PRICE).is_ok());
        assert!(validate_non_negative_price(&Decimal::from_str("70000000000000000000000000000").unwrap()).is_err());

        assert!(validate_positive_factor(&Decimal::from(100)).is_ok());
        assert!(validate_positive_factor(&Decimal::from_str("100.01").unwrap()).is_err());
        assert!(validate_positive_factor(&Decimal::MAX).is_err());
        assert!(validate_margin(&Decimal::ZERO).is_ok());
        assert!(validate_margin(&Decimal::from(101)).is_err());
        assert!(validate_margin(&Decimal::from_str("-0.1").unwrap()).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+54 9 11 5555-1234").is_ok());
        assert!(validate_phone("abc-1234").is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  hola ".to_string())), Some("hola".to_string()));
        assert_eq!(normalize_optional(Some("   ".to_string())), None);
        assert_eq!(normalize_optional(None), None);
    }
}
