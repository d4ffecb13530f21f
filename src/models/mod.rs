//! Modelos del sistema
//!
//! Este módulo contiene los modelos de dominio: categorías, productos,
//! cotizaciones, precios y los planes de consulta que usan los stores.

pub mod category;
pub mod pricing;
pub mod product;
pub mod query;
pub mod quotation;
