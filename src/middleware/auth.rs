//! Middleware de autenticación
//!
//! Este módulo extrae el token de sesión del header Authorization,
//! resuelve la sesión activa y la inyecta en la request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{
    models::auth::{UserInfo, UserRole},
    services::session_service::Session,
    state::AppState,
    utils::errors::AppError,
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub session: Arc<Session>,
}

impl AuthenticatedUser {
    pub fn session_id(&self) -> &str {
        &self.session.id
    }

    pub fn user(&self) -> &UserInfo {
        &self.session.user
    }

    pub fn role(&self) -> UserRole {
        self.session.role()
    }

    /// Token para llamar al backend CMMS en nombre del usuario
    pub fn token(&self) -> &str {
        self.session.upstream_token()
    }
}

/// Middleware de autenticación por token de sesión
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let session = state.sessions.resolve(token.trim()).await?;

    // Inyectar usuario autenticado en las extensions
    request
        .extensions_mut()
        .insert(AuthenticatedUser { session });

    Ok(next.run(request).await)
}
