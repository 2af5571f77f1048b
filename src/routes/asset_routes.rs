use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::asset_controller::AssetController;
use crate::dto::asset_dto::{AssetFormView, AssetSubmission};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::asset::Asset;
use crate::models::pagination::{ListQuery, Paginated};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_asset_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/form", get(new_asset_form))
        .route("/:id", get(get_asset).put(update_asset).delete(archive_asset))
        .route("/:id/form", get(edit_asset_form))
}

async fn list_assets(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Paginated<Asset>>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.list(&user, &query).await?))
}

async fn get_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Asset>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.get(&user, &id.to_string()).await?))
}

async fn new_asset_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<AssetFormView>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.new_form(&user).await?))
}

async fn edit_asset_form(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssetFormView>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.edit_form(&user, &id.to_string()).await?))
}

async fn create_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(submission): Json<AssetSubmission>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.create(&user, submission).await?))
}

async fn update_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(submission): Json<AssetSubmission>,
) -> Result<Json<ApiResponse<Asset>>, AppError> {
    let controller = AssetController::new(state.client.clone());
    Ok(Json(controller.update(&user, &id.to_string(), submission).await?))
}

async fn archive_asset(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AssetController::new(state.client.clone());
    controller.archive(&user, &id.to_string()).await?;
    Ok(Json(ApiResponse::message("Activo archivado exitosamente")))
}
