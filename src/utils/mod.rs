//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! formato de montos y la fuente de tiempo.

pub mod clock;
pub mod errors;
pub mod format;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::{AppError, AppResult};
