//! Cache del listado de categorías activas
//!
//! Guarda una única entrada con el listado ordenado por nombre. Se sirve desde
//! memoria mientras `now - refreshed_at < ttl`; si el refresco falla y existe
//! un valor previo, se devuelve ese valor con un aviso en lugar del error.
//!
//! Cada `invalidate()` incrementa una generación: un refresco que empezó antes
//! de la invalidación no instala su resultado.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::category::CategorySummary;
use crate::repositories::CategoryStore;
use crate::utils::clock::Clock;
use crate::utils::errors::AppResult;

/// Resultado de una lectura del cache
#[derive(Debug, Clone)]
pub struct CategoryListing {
    pub categories: Arc<Vec<CategorySummary>>,
    /// `true` si no se consultó el store en esta lectura
    pub cached: bool,
    /// Presente cuando se sirvió un valor vencido por falla del store
    pub warning: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedEntry {
    categories: Arc<Vec<CategorySummary>>,
    refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    entry: Option<CachedEntry>,
    generation: u64,
}

pub struct CategoryCache {
    store: Arc<dyn CategoryStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl CategoryCache {
    pub fn new(store: Arc<dyn CategoryStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Listado de categorías activas ordenado por nombre
    pub async fn get(&self) -> AppResult<CategoryListing> {
        let now = self.clock.now();

        let (previous, generation) = {
            let state = self.state.read().await;
            if let Some(entry) = &state.entry {
                if self.is_fresh(entry, now) {
                    debug!("📂 Category cache HIT ({} categorías)", entry.categories.len());
                    return Ok(CategoryListing {
                        categories: Arc::clone(&entry.categories),
                        cached: true,
                        warning: None,
                    });
                }
            }
            (state.entry.clone(), state.generation)
        };

        debug!("🔄 Category cache MISS, consultando store");

        match self.store.find_active_sorted_by_name().await {
            Ok(categories) => {
                let categories: Arc<Vec<CategorySummary>> =
                    Arc::new(categories.into_iter().map(CategorySummary::from).collect());

                let mut state = self.state.write().await;
                if state.generation == generation {
                    state.entry = Some(CachedEntry {
                        categories: Arc::clone(&categories),
                        refreshed_at: now,
                    });
                } else {
                    debug!("⏭️ Cache invalidado durante el refresco, no se guarda el resultado");
                }

                Ok(CategoryListing {
                    categories,
                    cached: false,
                    warning: None,
                })
            }
            Err(e) => match previous {
                Some(entry) => {
                    warn!("⚠️ Falló el refresco de categorías, sirviendo cache vencido: {}", e);
                    Ok(CategoryListing {
                        categories: entry.categories,
                        cached: true,
                        warning: Some(format!(
                            "Datos posiblemente desactualizados: no se pudo refrescar el listado ({})",
                            e
                        )),
                    })
                }
                None => Err(e),
            },
        }
    }

    /// Descarta el valor cacheado; la próxima lectura va al store
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.entry = None;
        state.generation = state.generation.wrapping_add(1);
        info!("🗑️ Category cache invalidado");
    }

    fn is_fresh(&self, entry: &CachedEntry, now: DateTime<Utc>) -> bool {
        match now.signed_duration_since(entry.refreshed_at).to_std() {
            Ok(age) => age < self.ttl,
            // Reloj hacia atrás
            Err(_) => true,
        }
    }
}
