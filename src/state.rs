//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use std::time::Duration;

use crate::clients::CmmsApiClient;
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::services::session_service::SessionManager;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub client: Arc<CmmsApiClient>,
    pub sessions: SessionManager,
    pub rate_limit: RateLimitState,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let client = Arc::new(CmmsApiClient::new(
            &config.cmms_api_url,
            Duration::from_secs(config.http_timeout_secs),
        )?);
        let sessions = SessionManager::new(client.clone(), &config);
        let rate_limit = RateLimitState::from_config(&config);

        Ok(Self {
            config,
            client,
            sessions,
            rate_limit,
        })
    }
}
