//! DTOs de la API
//!
//! Requests y vistas que intercambia el gateway con el navegador y con el
//! backend CMMS. Cada endpoint del backend tiene su propio struct.

pub mod asset_dto;
pub mod auth_dto;
pub mod dashboard_dto;
pub mod maintenance_dto;
pub mod work_order_dto;

use serde::Serialize;

// Respuesta genérica de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}
