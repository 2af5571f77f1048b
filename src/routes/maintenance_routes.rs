use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{
    CompletePlanRequest, ConfirmActionRequest, CreatePlanRequest, PlanView, UpdatePlanRequest,
    UpdateUsageRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::pagination::{ListQuery, Paginated};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plans).post(create_plan))
        .route("/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .route("/:id/pause", post(pause_plan))
        .route("/:id/resume", post(resume_plan))
        .route("/:id/complete", post(complete_plan))
        .route("/:id/usage", post(update_usage))
}

async fn list_plans(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<PlanView>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.list(&user, &query).await?))
}

async fn get_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanView>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.get(&user, &id.to_string()).await?))
}

async fn create_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreatePlanRequest>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn update_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlanRequest>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.update(&user, &id.to_string(), request).await?))
}

async fn delete_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    controller.delete(&user, &id.to_string()).await?;
    Ok(Json(ApiResponse::message("Plan eliminado exitosamente")))
}

// Sin cuerpo equivale a no confirmado
async fn pause_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    body: Option<Json<ConfirmActionRequest>>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let confirmation = body.map(|Json(body)| body).unwrap_or_default();
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.pause(&user, &id.to_string(), confirmation).await?))
}

async fn resume_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    body: Option<Json<ConfirmActionRequest>>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let confirmation = body.map(|Json(body)| body).unwrap_or_default();
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.resume(&user, &id.to_string(), confirmation).await?))
}

async fn complete_plan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompletePlanRequest>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.complete(&user, &id.to_string(), request).await?))
}

async fn update_usage(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUsageRequest>,
) -> Result<Json<ApiResponse<PlanView>>, AppError> {
    let controller = MaintenanceController::new(state.client.clone());
    Ok(Json(controller.update_usage(&user, &id.to_string(), request).await?))
}
