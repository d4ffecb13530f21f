//! Cache
//!
//! Cache en memoria del proceso para el listado de categorías activas.

pub mod cache_config;
pub mod category_cache;

pub use cache_config::CacheConfig;
pub use category_cache::{CategoryCache, CategoryListing};
