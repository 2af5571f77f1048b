use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Operador,
    Supervisor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Operador => "OPERADOR",
            UserRole::Supervisor => "SUPERVISOR",
            UserRole::Admin => "ADMIN",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "OPERADOR" => Some(UserRole::Operador),
            "SUPERVISOR" => Some(UserRole::Supervisor),
            "ADMIN" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// Información del usuario autenticado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: UserRole,
}

/// Claims del token de sesión emitido por el gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // user_id
    pub sid: String, // session_id
    pub exp: i64,
    pub iat: i64,
}

/// Información de la sesión activa
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub user: UserInfo,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
