//! Configuración de variables de entorno
//!
//! Todas las variables tienen un valor por defecto salvo `DATABASE_URL`;
//! un valor numérico inválido es un error de arranque.

use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use std::env;
use std::str::FromStr;

use crate::cache::CacheConfig;
use crate::cache::cache_config::DEFAULT_CATEGORY_TTL_SECS;
use crate::models::pricing::PricingFactors;
use crate::services::quotation_builder::{MessageSettings, DEFAULT_VALIDITY_DAYS};
use crate::utils::format::utc_offset;
use crate::utils::validation::{validate_margin, validate_positive_factor};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub database_url: Option<String>,
    pub cache: CacheConfig,
    pub pricing: PricingFactors,
    pub quotation_validity_days: i64,
    pub message: MessageSettings,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            database_url: None,
            cache: CacheConfig::default(),
            pricing: PricingFactors::default(),
            quotation_validity_days: DEFAULT_VALIDITY_DAYS,
            message: MessageSettings::default(),
        }
    }
}

impl EnvironmentConfig {
    /// Lee la configuración de las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables inyectable
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let cache_ttl: u64 = parse_or(&get, "CATEGORY_CACHE_TTL_SECS", DEFAULT_CATEGORY_TTL_SECS)?;
        let offset_hours: i32 = parse_or(&get, "QUOTE_UTC_OFFSET_HOURS", -3)?;
        let offset: FixedOffset = utc_offset(offset_hours)
            .ok_or_else(|| anyhow!("QUOTE_UTC_OFFSET_HOURS fuera de rango: {}", offset_hours))?;

        let pricing = PricingFactors {
            profit_margin: parse_or(&get, "PRICING_PROFIT_MARGIN", defaults.pricing.profit_margin)?,
            factor3: parse_or(&get, "PRICING_FACTOR_3", defaults.pricing.factor3)?,
            factor6: parse_or(&get, "PRICING_FACTOR_6", defaults.pricing.factor6)?,
        };
        if validate_margin(&pricing.profit_margin).is_err()
            || validate_positive_factor(&pricing.factor3).is_err()
            || validate_positive_factor(&pricing.factor6).is_err()
        {
            return Err(anyhow!("Factores de precio inválidos: {:?}", pricing));
        }

        let quotation_validity_days: i64 =
            parse_or(&get, "QUOTATION_VALIDITY_DAYS", defaults.quotation_validity_days)?;
        if quotation_validity_days < 1 {
            return Err(anyhow!("QUOTATION_VALIDITY_DAYS debe ser al menos 1"));
        }

        Ok(Self {
            environment: get("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_or(&get, "PORT", defaults.port)?,
            host: get("HOST").unwrap_or(defaults.host),
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            database_url: get("DATABASE_URL"),
            cache: CacheConfig::with_ttl_secs(cache_ttl),
            pricing,
            quotation_validity_days,
            message: MessageSettings {
                business_name: get("QUOTE_BUSINESS_NAME").unwrap_or(defaults.message.business_name),
                contact_whatsapp: get("QUOTE_CONTACT_WHATSAPP")
                    .unwrap_or(defaults.message.contact_whatsapp),
                contact_email: get("QUOTE_CONTACT_EMAIL").unwrap_or(defaults.message.contact_email),
                utc_offset: offset,
            },
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{} inválido: '{}' ({})", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = EnvironmentConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.database_url.is_none());
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cache.category_ttl.as_secs(), 300);
        assert_eq!(config.pricing, PricingFactors::default());
        assert_eq!(config.quotation_validity_days, 7);
        assert_eq!(config.message.business_name, "Hogar Conectado");
        assert!(config.is_development());
    }

    #[test]
    fn test_overrides_from_variables() {
        let config = EnvironmentConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://a.com, https://b.com,"),
            ("CATEGORY_CACHE_TTL_SECS", "60"),
            ("PRICING_PROFIT_MARGIN", "0.25"),
            ("QUOTE_BUSINESS_NAME", "Casa Norte"),
            ("QUOTE_UTC_OFFSET_HOURS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["https://a.com", "https://b.com"]);
        assert_eq!(config.cache.category_ttl.as_secs(), 60);
        assert_eq!(config.pricing.profit_margin, Decimal::from_str("0.25").unwrap());
        assert_eq!(config.message.business_name, "Casa Norte");
        assert_eq!(config.message.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(EnvironmentConfig::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup(&[("PRICING_FACTOR_3", "-1")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup(&[("PRICING_FACTOR_6", "1000")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup(&[("QUOTATION_VALIDITY_DAYS", "0")])).is_err());
        assert!(EnvironmentConfig::from_lookup(lookup(&[("QUOTE_UTC_OFFSET_HOURS", "30")])).is_err());
    }
}
