use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::auth::SessionInfo;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación. `login` es pública; `logout` y
/// `me` requieren sesión.
pub fn create_auth_router(state: AppState) -> Router<AppState> {
    let session_routes = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(login))
        .merge(session_routes)
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let controller = AuthController::new(state.sessions.clone());
    let response = controller.login(request).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<ApiResponse<()>> {
    let controller = AuthController::new(state.sessions.clone());
    Json(controller.logout(&user).await)
}

async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<SessionInfo> {
    let controller = AuthController::new(state.sessions.clone());
    Json(controller.me(&user))
}
