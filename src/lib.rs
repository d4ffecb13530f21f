//! Backend de catálogo, precios en cuotas y cotizaciones

pub mod cache;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use middleware::cors::cors_layer;
use state::AppState;

/// Router completo de la aplicación con sus capas
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .nest("/api/categories", routes::category_routes::create_category_router())
        .nest("/api/products", routes::product_routes::create_product_router())
        .nest("/api/quotations", routes::quotation_routes::create_quotation_router())
        .merge(routes::health::create_health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
