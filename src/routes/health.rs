use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::clock::Clock;

pub fn create_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": state.clock.now(),
        "store": state.backend,
        "environment": state.config.environment,
    }))
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "categories": "/api/categories",
            "products": "/api/products",
            "quotations": "/api/quotations",
            "health": "/health",
        }
    }))
}
