//! Services module
//!
//! Este módulo contiene la lógica de negocio: motor de precios, armado de
//! consultas del catálogo y construcción de cotizaciones. No accede a la
//! base de datos.

pub mod catalog_query;
pub mod pricing_engine;
pub mod quotation_builder;

pub use catalog_query::{build_product_query, PageInfo, Pagination};
pub use pricing_engine::compute_installments;
pub use quotation_builder::{render_message, whatsapp_url, MessageSettings, QuotationBuilder};
