use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::clients::CmmsApiClient;
use crate::dto::asset_dto::{AssetFormView, AssetSubmission};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::asset::{Asset, AssetField, AssetPayload, LocationOption};
use crate::models::auth::UserRole;
use crate::models::pagination::{ListQuery, Paginated};
use crate::utils::errors::{AppError, AppResult};

pub struct AssetController {
    client: Arc<CmmsApiClient>,
}

fn locked_fields_error(role: UserRole, fields: &[AssetField]) -> AppError {
    let names: Vec<&str> = fields.iter().map(AssetField::as_str).collect();
    AppError::Forbidden(format!(
        "El rol {} no puede modificar: {}",
        role.as_str(),
        names.join(", ")
    ))
}

impl AssetController {
    pub fn new(client: Arc<CmmsApiClient>) -> Self {
        Self { client }
    }

    /// Opciones de ubicación; si fallan el formulario se muestra sin ellas
    async fn location_options(&self, user: &AuthenticatedUser) -> Vec<LocationOption> {
        match self.client.list_locations(user.token()).await {
            Ok(locations) => locations,
            Err(e) => {
                warn!("⚠️ No se pudieron cargar las ubicaciones: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &ListQuery,
    ) -> AppResult<Paginated<Asset>> {
        self.client.list_assets(user.token(), query).await
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: &str) -> AppResult<Asset> {
        self.client.get_asset(user.token(), id).await
    }

    /// Formulario vacío para un activo nuevo
    pub async fn new_form(&self, user: &AuthenticatedUser) -> AppResult<AssetFormView> {
        let locations = self.location_options(user).await;
        Ok(AssetFormView::new(
            None,
            user.role(),
            &AssetPayload::default(),
            locations,
        ))
    }

    /// Formulario de edición con los valores actuales
    pub async fn edit_form(&self, user: &AuthenticatedUser, id: &str) -> AppResult<AssetFormView> {
        let (asset, locations) = futures::join!(self.get(user, id), self.location_options(user));
        let asset = asset?;

        Ok(AssetFormView::new(
            Some(asset.id.clone()),
            user.role(),
            &AssetPayload::from(&asset),
            locations,
        ))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        submission: AssetSubmission,
    ) -> AppResult<ApiResponse<Asset>> {
        submission.validate()?;

        let role = user.role();
        let payload = submission
            .resolve(role, &AssetPayload::default())
            .map_err(|fields| locked_fields_error(role, &fields))?;

        let created = self.client.create_asset(user.token(), &payload).await?;
        info!("🚜 Activo creado: {} ({})", created.name, created.id);

        let asset = self.get(user, &created.id).await?;
        Ok(ApiResponse::success_with_message(asset, "Activo creado exitosamente"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        submission: AssetSubmission,
    ) -> AppResult<ApiResponse<Asset>> {
        submission.validate()?;

        let current = self.get(user, id).await?;
        let role = user.role();
        let payload = submission
            .resolve(role, &AssetPayload::from(&current))
            .map_err(|fields| locked_fields_error(role, &fields))?;

        self.client.update_asset(user.token(), id, &payload).await?;
        info!("✏️ Activo actualizado: {} por {}", id, user.user().username);

        let asset = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(asset, "Activo actualizado exitosamente"))
    }

    pub async fn archive(&self, user: &AuthenticatedUser, id: &str) -> AppResult<()> {
        self.client.archive_asset(user.token(), id).await?;
        info!("📦 Activo archivado: {} por {}", id, user.user().username);
        Ok(())
    }
}
