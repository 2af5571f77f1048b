//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del gateway
//! y su conversión a respuestas HTTP apropiadas.

use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Action not allowed: {0}")]
    ActionNotAllowed(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("Server rejected request ({status}): {rejection}")]
    ServerRejected { status: u16, rejection: ServerRejection },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Jwt(err.to_string())
    }
}

/// Cuerpo de error devuelto por el backend CMMS, ya clasificado.
///
/// Un cuerpo `{campo: mensaje}` se reporta campo por campo para que el
/// formulario marque cada input; `{detail}` o `{error}` se muestra como una
/// sola alerta con el texto tal cual lo envió el servidor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerRejection {
    Message(String),
    FieldErrors(BTreeMap<String, Vec<String>>),
}

impl ServerRejection {
    /// Clasificar el cuerpo de una respuesta de error del backend.
    /// `fallback` se usa cuando el cuerpo no trae un mensaje legible.
    pub fn from_body(body: &str, fallback: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for key in ["error", "detail"] {
                    if let Some(message) = map.get(key).and_then(message_text) {
                        return ServerRejection::Message(message);
                    }
                }

                let fields: BTreeMap<String, Vec<String>> = map
                    .iter()
                    .filter_map(|(field, value)| {
                        let messages = field_messages(value);
                        (!messages.is_empty()).then(|| (field.clone(), messages))
                    })
                    .collect();

                if fields.is_empty() {
                    ServerRejection::Message(fallback.to_string())
                } else {
                    ServerRejection::FieldErrors(fields)
                }
            }
            Ok(other) => message_text(&other)
                .map(ServerRejection::Message)
                .unwrap_or_else(|| ServerRejection::Message(fallback.to_string())),
            Err(_) => ServerRejection::Message(fallback.to_string()),
        }
    }

    /// Texto para mostrar en una alerta única
    pub fn message(&self) -> String {
        match self {
            ServerRejection::Message(message) => message.clone(),
            ServerRejection::FieldErrors(fields) => fields
                .iter()
                .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

impl fmt::Display for ServerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) => vec![text.clone()],
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::Object(_) => vec![value.to_string()],
        _ => Vec::new(),
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(error: &str, message: String, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details: None,
            code: Some(code.to_string()),
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(
                        "Validation Error",
                        "Los datos enviados no son válidos".to_string(),
                        "VALIDATION_ERROR",
                    )
                    .with_details(json!(e)),
                )
            }

            AppError::Unauthorized(msg) => {
                warn!("🔒 Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, "UNAUTHORIZED"),
                )
            }

            AppError::Forbidden(msg) => {
                warn!("🚫 Forbidden access: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse::new("Forbidden", msg, "FORBIDDEN"),
                )
            }

            AppError::NotFound(msg) => {
                warn!("🔍 Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, "NOT_FOUND"),
                )
            }

            AppError::BadRequest(msg) => {
                warn!("⚠️ Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Bad Request", msg, "BAD_REQUEST"),
                )
            }

            AppError::InvalidTransition { from, to } => {
                warn!("⛔ Invalid transition: {} -> {}", from, to);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(
                        "Invalid Transition",
                        format!("No se puede cambiar el estado de '{}' a '{}'", from, to),
                        "INVALID_TRANSITION",
                    )
                    .with_details(json!({ "from": from, "to": to })),
                )
            }

            AppError::ActionNotAllowed(msg) => {
                warn!("⛔ Action not allowed: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Action Not Allowed", msg, "ACTION_NOT_ALLOWED"),
                )
            }

            AppError::ConfirmationRequired(msg) => {
                warn!("✋ Confirmation required: {}", msg);
                (
                    StatusCode::PRECONDITION_REQUIRED,
                    ErrorResponse::new("Confirmation Required", msg, "CONFIRMATION_REQUIRED"),
                )
            }

            AppError::ServerRejected { status, rejection } => {
                warn!("📡 Backend rejected request ({}): {}", status, rejection);
                let http_status = StatusCode::from_u16(status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                let mut response = ErrorResponse::new(
                    "Server Rejected",
                    rejection.message(),
                    "SERVER_REJECTED",
                );
                if let ServerRejection::FieldErrors(fields) = &rejection {
                    response = response.with_details(json!({ "fields": fields }));
                }
                (http_status, response)
            }

            AppError::Transport(msg) => {
                error!("❌ Transport error talking to CMMS backend: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse::new(
                        "Transport Error",
                        "No se pudo comunicar con el servidor. Intente nuevamente.".to_string(),
                        "TRANSPORT_ERROR",
                    ),
                )
            }

            AppError::Jwt(msg) => {
                warn!("🔑 JWT error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("JWT Error", "Sesión inválida".to_string(), "JWT_ERROR"),
                )
            }

            AppError::RateLimitExceeded => {
                warn!("🚦 Rate limit exceeded");
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    ErrorResponse::new(
                        "Rate Limit Exceeded",
                        "Too many requests. Please try again later".to_string(),
                        "RATE_LIMIT_EXCEEDED",
                    ),
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        "INTERNAL_ERROR",
                    ),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}
