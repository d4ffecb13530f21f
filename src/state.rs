//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::CategoryCache;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    CategoryRepository, CategoryStore, MemoryStore, ProductRepository, ProductStore,
    QuotationRepository, QuotationStore,
};
use crate::services::quotation_builder::QuotationBuilder;
use crate::utils::clock::Clock;

#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryStore>,
    pub products: Arc<dyn ProductStore>,
    pub quotations: Arc<dyn QuotationStore>,
    pub category_cache: Arc<CategoryCache>,
    pub quotation_builder: Arc<QuotationBuilder>,
    pub config: Arc<EnvironmentConfig>,
    pub clock: Arc<dyn Clock>,
    /// "postgres" o "memory", informado por /health
    pub backend: &'static str,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn with_postgres(pool: PgPool, config: EnvironmentConfig, clock: Arc<dyn Clock>) -> Self {
        Self::assemble(
            Arc::new(CategoryRepository::new(pool.clone())),
            Arc::new(ProductRepository::new(pool.clone())),
            Arc::new(QuotationRepository::new(pool)),
            config,
            clock,
            "postgres",
        )
    }

    /// Estado respaldado por el store en memoria
    pub fn in_memory(config: EnvironmentConfig, clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(MemoryStore::new(clock.clone()));
        Self::assemble(store.clone(), store.clone(), store, config, clock, "memory")
    }

    fn assemble(
        categories: Arc<dyn CategoryStore>,
        products: Arc<dyn ProductStore>,
        quotations: Arc<dyn QuotationStore>,
        config: EnvironmentConfig,
        clock: Arc<dyn Clock>,
        backend: &'static str,
    ) -> Self {
        let category_cache = Arc::new(CategoryCache::new(
            categories.clone(),
            clock.clone(),
            config.cache.category_ttl,
        ));
        let quotation_builder = Arc::new(QuotationBuilder::new(
            config.pricing,
            config.quotation_validity_days,
            config.message.clone(),
            clock.clone(),
        ));

        Self {
            categories,
            products,
            quotations,
            category_cache,
            quotation_builder,
            config: Arc::new(config),
            clock,
            backend,
        }
    }
}
