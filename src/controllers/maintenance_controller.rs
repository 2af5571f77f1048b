use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::clients::CmmsApiClient;
use crate::dto::maintenance_dto::{
    CompletePlanRequest, ConfirmActionRequest, CreatePlanRequest, PauseResumeAction,
    PauseResumeRequest, PlanView, UpdatePlanRequest, UpdateUsageRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::maintenance_plan::{MaintenancePlan, PlanAction};
use crate::models::pagination::{ListQuery, Paginated};
use crate::utils::errors::{AppError, AppResult};

pub struct MaintenanceController {
    client: Arc<CmmsApiClient>,
}

fn ensure_allowed(plan: &MaintenancePlan, action: PlanAction) -> AppResult<()> {
    if plan.allows(action) {
        return Ok(());
    }
    Err(AppError::ActionNotAllowed(format!(
        "La acción '{}' no está disponible para el plan '{}' en estado {}",
        action.as_str(),
        plan.name,
        plan.status
    )))
}

impl MaintenanceController {
    pub fn new(client: Arc<CmmsApiClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, user: &AuthenticatedUser, id: &str) -> AppResult<MaintenancePlan> {
        self.client.get_plan(user.token(), id).await
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &ListQuery,
    ) -> AppResult<Paginated<PlanView>> {
        let page = self.client.list_plans(user.token(), query).await?;
        Ok(page.map(PlanView::from))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: &str) -> AppResult<PlanView> {
        Ok(PlanView::from(self.fetch(user, id).await?))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreatePlanRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        request.validate()?;
        let request = request.enforce_usage_rules()?;

        let created = self.client.create_plan(user.token(), &request).await?;
        info!("🗓️ Plan de mantenimiento creado: {} ({})", created.name, created.id);

        let view = self.get(user, &created.id).await?;
        Ok(ApiResponse::success_with_message(view, "Plan creado exitosamente"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdatePlanRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        request.validate()?;

        let current = self.fetch(user, id).await?;
        if current.is_terminal() {
            return Err(AppError::ActionNotAllowed(format!(
                "El plan está {} y no admite cambios",
                current.status
            )));
        }
        let request = request.enforce_usage_rules(&current)?;

        self.client.update_plan(user.token(), id, &request).await?;

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(view, "Plan actualizado exitosamente"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: &str) -> AppResult<()> {
        self.client.delete_plan(user.token(), id).await?;
        info!("🗑️ Plan eliminado: {} por {}", id, user.user().username);
        Ok(())
    }

    /// Pausar o reanudar. Requiere confirmación explícita del usuario.
    async fn pause_resume(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        action: PauseResumeAction,
        confirmation: ConfirmActionRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        let (plan_action, verb) = match action {
            PauseResumeAction::Pause => (PlanAction::Pause, "pausar"),
            PauseResumeAction::Resume => (PlanAction::Resume, "reanudar"),
        };

        if !confirmation.confirmed {
            return Err(AppError::ConfirmationRequired(format!(
                "Confirme que desea {} el plan",
                verb
            )));
        }

        let current = self.fetch(user, id).await?;
        ensure_allowed(&current, plan_action)?;

        self.client
            .pause_resume_plan(user.token(), id, &PauseResumeRequest { action })
            .await?;
        info!("⏯️ Plan {}: {} por {}", id, plan_action.as_str(), user.user().username);

        let view = self.get(user, id).await?;
        let message = match action {
            PauseResumeAction::Pause => "Plan pausado",
            PauseResumeAction::Resume => "Plan reanudado",
        };
        Ok(ApiResponse::success_with_message(view, message))
    }

    pub async fn pause(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        confirmation: ConfirmActionRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        self.pause_resume(user, id, PauseResumeAction::Pause, confirmation)
            .await
    }

    pub async fn resume(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        confirmation: ConfirmActionRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        self.pause_resume(user, id, PauseResumeAction::Resume, confirmation)
            .await
    }

    pub async fn complete(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: CompletePlanRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        request.validate()?;

        let current = self.fetch(user, id).await?;
        ensure_allowed(&current, PlanAction::Complete)?;
        let request = request.for_plan(&current)?;

        self.client.complete_plan(user.token(), id, &request).await?;
        info!("✅ Plan {} completado el {}", id, request.completion_date);

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(view, "Mantenimiento registrado"))
    }

    pub async fn update_usage(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateUsageRequest,
    ) -> AppResult<ApiResponse<PlanView>> {
        request.validate()?;

        let current = self.fetch(user, id).await?;
        ensure_allowed(&current, PlanAction::UpdateUsage)?;

        self.client.update_plan_usage(user.token(), id, &request).await?;
        info!("📈 Plan {}: lectura de uso {}", id, request.current_usage);

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(view, "Lectura de uso actualizada"))
    }
}
