use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::controllers::dashboard_controller::DashboardController;
use crate::dto::dashboard_dto::DashboardSummary;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_summary))
}

async fn get_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Json<DashboardSummary> {
    let controller = DashboardController::new(state.client.clone());
    Json(controller.summary(&user).await)
}
