//! Routers HTTP por recurso

pub mod category_routes;
pub mod health;
pub mod product_routes;
pub mod quotation_routes;
