//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y secuenciación de respuestas.

pub mod errors;
pub mod sequencing;
pub mod validation;

pub use errors::{AppError, AppResult};
