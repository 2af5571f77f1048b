//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de formularios antes de enviarlos al backend CMMS.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;
use validator::ValidationError;

lazy_static! {
    static ref LICENSE_PLATE: Regex = Regex::new(r"^[A-Z0-9]{2,4}(-?[A-Z0-9]{2,4}){1,2}$")
        .expect("license plate pattern is valid");
}

/// Validar que un identificador tenga forma de UUID
pub fn validate_entity_id(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Variante para `#[validate(custom = ...)]` sobre referencias a entidades
pub fn validate_entity_ref(value: &str) -> Result<(), ValidationError> {
    validate_entity_id(value).map(|_| ())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.message = Some("Este campo es obligatorio".into());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.message = Some("Debe ser mayor que cero".into());
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.message = Some("No puede ser negativo".into());
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Adaptadores para `#[validate(custom = ...)]`
pub fn validate_positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Forma canónica de una matrícula: sin espacios y en mayúsculas
pub fn normalize_license_plate(value: &str) -> String {
    value.to_uppercase().split_whitespace().collect()
}

/// Validar formato de matrícula de vehículo (mayúsculas, dígitos y guiones)
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    if !LICENSE_PLATE.is_match(&normalize_license_plate(value)) {
        let mut error = ValidationError::new("license_plate");
        error.message = Some("Formato de placa inválido".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
