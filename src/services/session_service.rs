//! Servicio de sesiones
//!
//! Una sesión nace con el login (`init`) y muere con el logout o al expirar
//! (`teardown`). Mientras vive guarda el token del backend, el usuario con
//! su rol y la bandeja de notificaciones que refresca su propio poller.
//! El poller se detiene solo al vencer la sesión; el reaper periódico
//! (`spawn_reaper`) retira del registro las sesiones vencidas que nadie
//! volvió a usar.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::clients::CmmsApiClient;
use crate::config::EnvironmentConfig;
use crate::dto::auth_dto::{LoginRequest, LoginResponse, LogoutBackendRequest};
use crate::models::auth::{SessionClaims, SessionInfo, UserInfo, UserRole};
use crate::services::notification_poller::{NotificationInbox, NotificationPoller};
use crate::utils::errors::{AppError, AppResult};

/// Sesión autenticada
pub struct Session {
    pub id: String,
    pub user: UserInfo,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    upstream_token: String,
    refresh_token: Option<String>,
    inbox: Arc<NotificationInbox>,
}

impl Session {
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Token del backend CMMS para esta sesión
    pub fn upstream_token(&self) -> &str {
        &self.upstream_token
    }

    pub fn inbox(&self) -> &Arc<NotificationInbox> {
        &self.inbox
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            user: self.user.clone(),
            created_at: self.created_at,
            expires_at: self.expires_at,
        }
    }
}

struct SessionEntry {
    session: Arc<Session>,
    poller: NotificationPoller,
}

/// Registro de sesiones activas
#[derive(Clone)]
pub struct SessionManager {
    client: Arc<CmmsApiClient>,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    secret: Arc<String>,
    ttl: chrono::Duration,
    poll_interval: Duration,
}

impl SessionManager {
    pub fn new(client: Arc<CmmsApiClient>, config: &EnvironmentConfig) -> Self {
        Self {
            client,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            secret: Arc::new(config.session_secret.clone()),
            ttl: chrono::Duration::hours(config.session_ttl_hours),
            poll_interval: Duration::from_secs(config.notification_poll_secs),
        }
    }

    /// Iniciar sesión contra el backend, arrancar el polling de
    /// notificaciones y emitir el token de sesión del gateway.
    pub async fn init(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let login = self.client.login(&request).await?;
        let user = login.user.into_user_info()?;
        let now = Utc::now();
        let session_id = Uuid::new_v4().to_string();

        let inbox = Arc::new(NotificationInbox::new());
        let poller = NotificationPoller::start(
            self.client.clone(),
            login.access.clone(),
            inbox.clone(),
            self.poll_interval,
            Instant::now() + self.ttl.to_std().unwrap_or(Duration::ZERO),
        );

        let session = Arc::new(Session {
            id: session_id.clone(),
            user,
            created_at: now,
            expires_at: now + self.ttl,
            upstream_token: login.access,
            refresh_token: login.refresh,
            inbox,
        });

        let token = self.issue_token(&session)?;

        info!(
            "🔐 Sesión iniciada: {} ({}) rol {}",
            session.user.username,
            session_id,
            session.role().as_str()
        );

        let response = LoginResponse {
            token,
            expires_at: session.expires_at,
            user: session.user.clone(),
        };

        self.sessions
            .write()
            .await
            .insert(session_id, SessionEntry { session, poller });

        Ok(response)
    }

    fn issue_token(&self, session: &Session) -> AppResult<String> {
        let claims = SessionClaims {
            sub: session.user.id.clone(),
            sid: session.id.clone(),
            exp: session.expires_at.timestamp(),
            iat: session.created_at.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    /// Resolver la sesión de un token del gateway.
    ///
    /// La firma se valida siempre; el vencimiento se comprueba contra la
    /// sesión registrada para poder cerrarla aunque el token ya esté vencido.
    pub async fn resolve(&self, token: &str) -> AppResult<Arc<Session>> {
        let mut validation = Validation::default();
        validation.validate_exp = false;

        let claims = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))?
        .claims;

        let session = self
            .sessions
            .read()
            .await
            .get(&claims.sid)
            .map(|entry| entry.session.clone())
            .ok_or_else(|| AppError::Unauthorized("Sesión cerrada o inexistente".to_string()))?;

        if session.is_expired() {
            self.teardown(&session.id).await;
            return Err(AppError::Unauthorized("Sesión expirada".to_string()));
        }

        Ok(session)
    }

    /// Cerrar la sesión: detener el poller, avisar al backend (sin fallar
    /// si no responde) y olvidarla. Cerrar dos veces no es un error.
    pub async fn teardown(&self, session_id: &str) {
        let entry = self.sessions.write().await.remove(session_id);
        let Some(SessionEntry { session, poller }) = entry else {
            return;
        };

        poller.stop().await;

        if let Some(refresh) = session.refresh_token.clone() {
            let request = LogoutBackendRequest { refresh };
            if let Err(e) = self.client.logout(session.upstream_token(), &request).await {
                warn!("⚠️ Logout en el backend falló para sesión {}: {}", session.id, e);
            }
        }

        info!("👋 Sesión cerrada: {} ({})", session.user.username, session.id);
    }

    /// Cerrar todas las sesiones (apagado del servidor)
    pub async fn teardown_all(&self) {
        let ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        for id in ids {
            self.teardown(&id).await;
        }
    }

    /// Cerrar todas las sesiones vencidas. Devuelve cuántas se cerraron.
    pub async fn reap_expired(&self) -> usize {
        let expired: Vec<String> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|entry| entry.session.is_expired())
            .map(|entry| entry.session.id.clone())
            .collect();

        for id in &expired {
            self.teardown(id).await;
        }
        if !expired.is_empty() {
            info!("🧹 {} sesiones vencidas cerradas", expired.len());
        }
        expired.len()
    }

    /// Tarea de fondo que ejecuta `reap_expired` cada `every`
    pub fn spawn_reaper(&self, every: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                manager.reap_expired().await;
            }
        })
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }
}
