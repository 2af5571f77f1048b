use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::work_order_controller::WorkOrderController;
use crate::dto::work_order_dto::{
    CompleteWorkOrderRequest, CreateWorkOrderRequest, TransitionStatusRequest,
    UpdateWorkOrderRequest, WorkOrderView,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::pagination::{ListQuery, Paginated};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_work_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_work_orders).post(create_work_order))
        .route(
            "/:id",
            get(get_work_order)
                .put(update_work_order)
                .delete(delete_work_order),
        )
        .route("/:id/transition", post(transition_work_order))
        .route("/:id/complete", post(complete_work_order))
}

async fn list_work_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<WorkOrderView>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.list(&user, &query).await?))
}

async fn get_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkOrderView>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.get(&user, &id.to_string()).await?))
}

async fn create_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderView>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.create(&user, request).await?))
}

async fn update_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderView>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.update(&user, &id.to_string(), request).await?))
}

async fn delete_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    controller.delete(&user, &id.to_string()).await?;
    Ok(Json(ApiResponse::message("Orden de trabajo eliminada exitosamente")))
}

async fn transition_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionStatusRequest>,
) -> Result<Json<ApiResponse<WorkOrderView>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.transition(&user, &id.to_string(), request).await?))
}

async fn complete_work_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompleteWorkOrderRequest>,
) -> Result<Json<ApiResponse<WorkOrderView>>, AppError> {
    let controller = WorkOrderController::new(state.client.clone());
    Ok(Json(controller.complete(&user, &id.to_string(), request).await?))
}
