//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Errores al leer la configuración
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cmms_api_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    pub http_timeout_secs: u64,
    pub notification_poll_secs: u64,
    pub session_reap_secs: u64,
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        _ => Ok(default),
    }
}

fn positive<T: FromStr + PartialOrd + Default + ToString>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    let value = parsed(name, default)?;
    if value > T::default() {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

impl EnvironmentConfig {
    /// Configuración con valores por defecto para un backend dado
    pub fn new(cmms_api_url: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cmms_api_url: cmms_api_url.into(),
            session_secret: session_secret.into(),
            session_ttl_hours: 12,
            cors_origins: vec!["*".to_string()],
            rate_limit_requests: 120,
            rate_limit_window: 60,
            http_timeout_secs: 30,
            notification_poll_secs: 60,
            session_reap_secs: 60,
        }
    }

    /// Leer la configuración de las variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::new(required("CMMS_API_URL")?, required("SESSION_SECRET")?);

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parsed("PORT", defaults.port)?,
            host: env::var("HOST").unwrap_or(defaults.host),
            session_ttl_hours: positive("SESSION_TTL_HOURS", defaults.session_ttl_hours)?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            rate_limit_requests: positive("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window: positive("RATE_LIMIT_WINDOW", defaults.rate_limit_window)?,
            http_timeout_secs: positive("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            notification_poll_secs: positive("NOTIFICATION_POLL_SECS", defaults.notification_poll_secs)?,
            session_reap_secs: positive("SESSION_REAP_SECS", defaults.session_reap_secs)?,
            ..defaults
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Nombre legible del entorno para los logs de arranque
    pub fn environment_label(&self) -> &'static str {
        if self.is_production() {
            "producción"
        } else if self.is_development() {
            "desarrollo"
        } else {
            "otro"
        }
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Permitir cualquier origen en CORS
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|origin| origin == "*")
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
