use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::auth::{UserInfo, UserRole};
use crate::utils::errors::{AppError, AppResult};

// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Respuesta de `POST /auth/login/` del backend
#[derive(Debug, Clone, Deserialize)]
pub struct BackendLoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    pub user: BackendUser,
}

/// Usuario tal como lo devuelve el backend. El rol llega como texto libre
/// y se valida al abrir la sesión.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: String,
}

impl BackendUser {
    /// Sólo los roles conocidos pueden abrir sesión en el gateway
    pub fn into_user_info(self) -> AppResult<UserInfo> {
        let role = UserRole::from_str(&self.role).ok_or_else(|| {
            AppError::Forbidden(format!(
                "El rol '{}' no tiene acceso a esta aplicación",
                self.role
            ))
        })?;

        Ok(UserInfo {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
        })
    }
}

/// Cuerpo de `POST /auth/logout/`
#[derive(Debug, Clone, Serialize)]
pub struct LogoutBackendRequest {
    pub refresh: String,
}

// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}
