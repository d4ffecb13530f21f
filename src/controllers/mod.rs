//! Controllers
//!
//! Orquestan stores, cache y servicios para cada recurso de la API.

pub mod category_controller;
pub mod product_controller;
pub mod quotation_controller;

pub use category_controller::CategoryController;
pub use product_controller::ProductController;
pub use quotation_controller::QuotationController;
