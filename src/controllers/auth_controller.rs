use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::auth::SessionInfo;
use crate::services::session_service::SessionManager;
use crate::utils::errors::AppResult;

pub struct AuthController {
    sessions: SessionManager,
}

impl AuthController {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
        let response = self.sessions.init(request).await?;
        Ok(ApiResponse::success_with_message(response, "Sesión iniciada"))
    }

    pub async fn logout(&self, user: &AuthenticatedUser) -> ApiResponse<()> {
        self.sessions.teardown(user.session_id()).await;
        ApiResponse::message("Sesión cerrada")
    }

    pub fn me(&self, user: &AuthenticatedUser) -> SessionInfo {
        user.session.info()
    }
}
