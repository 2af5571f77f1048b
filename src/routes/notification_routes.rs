use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::notification_controller::NotificationController;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::notification::InboxSnapshot;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_inbox))
        .route("/refresh", post(refresh_inbox))
        .route("/:id/read", post(mark_read))
}

async fn get_inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<InboxSnapshot>, AppError> {
    let controller = NotificationController::new(state.client.clone());
    Ok(Json(controller.inbox(&user).await?))
}

async fn refresh_inbox(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<InboxSnapshot>, AppError> {
    let controller = NotificationController::new(state.client.clone());
    Ok(Json(controller.refresh(&user).await?))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<InboxSnapshot>, AppError> {
    let controller = NotificationController::new(state.client.clone());
    Ok(Json(controller.mark_read(&user, &id.to_string()).await?))
}
