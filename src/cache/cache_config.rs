//! Configuración de cache
//!
//! Este módulo contiene la configuración para el cache de categorías.

use std::time::Duration;

/// TTL por defecto del listado de categorías (5 minutos)
pub const DEFAULT_CATEGORY_TTL_SECS: u64 = 300;

/// Configuración del cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub category_ttl: Duration,
}

impl CacheConfig {
    pub fn with_ttl_secs(secs: u64) -> Self {
        Self {
            category_ttl: Duration::from_secs(secs),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::with_ttl_secs(DEFAULT_CATEGORY_TTL_SECS)
    }
}
