use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use crate::clients::CmmsApiClient;
use crate::dto::work_order_dto::{
    CompleteWorkOrderRequest, CreateWorkOrderRequest, TransitionStatusRequest,
    UpdateWorkOrderRequest, WorkOrderView,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::pagination::{ListQuery, Paginated};
use crate::models::work_order::{WorkOrder, WorkOrderStatus};
use crate::utils::errors::{AppError, AppResult};

pub struct WorkOrderController {
    client: Arc<CmmsApiClient>,
}

/// Registrar órdenes cuyo estado contradice sus campos de cierre
fn check_completion_fields(order: &WorkOrder) {
    if !order.completion_is_consistent() {
        warn!(
            "⚠️ Orden {} en estado '{}' con campos de cierre inconsistentes",
            order.id, order.status
        );
    }
}

impl WorkOrderController {
    pub fn new(client: Arc<CmmsApiClient>) -> Self {
        Self { client }
    }

    async fn fetch(&self, user: &AuthenticatedUser, id: &str) -> AppResult<WorkOrder> {
        let order = self.client.get_work_order(user.token(), id).await?;
        check_completion_fields(&order);
        Ok(order)
    }

    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &ListQuery,
    ) -> AppResult<Paginated<WorkOrderView>> {
        let page = self.client.list_work_orders(user.token(), query).await?;
        Ok(page.map(|order| {
            check_completion_fields(&order);
            WorkOrderView::from(order)
        }))
    }

    pub async fn get(&self, user: &AuthenticatedUser, id: &str) -> AppResult<WorkOrderView> {
        Ok(WorkOrderView::from(self.fetch(user, id).await?))
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateWorkOrderRequest,
    ) -> AppResult<ApiResponse<WorkOrderView>> {
        request.validate()?;

        let created = self.client.create_work_order(user.token(), &request).await?;
        info!("🛠️ Orden de trabajo creada: {} por {}", created.id, user.user().username);

        let view = self.get(user, &created.id).await?;
        Ok(ApiResponse::success_with_message(view, "Orden de trabajo creada exitosamente"))
    }

    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateWorkOrderRequest,
    ) -> AppResult<ApiResponse<WorkOrderView>> {
        request.validate()?;

        self.client.update_work_order(user.token(), id, &request).await?;

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(view, "Orden de trabajo actualizada exitosamente"))
    }

    pub async fn delete(&self, user: &AuthenticatedUser, id: &str) -> AppResult<()> {
        self.client.delete_work_order(user.token(), id).await?;
        info!("🗑️ Orden de trabajo eliminada: {} por {}", id, user.user().username);
        Ok(())
    }

    /// Cambio directo de estado. La transición a `Completada` exige el
    /// formulario de cierre y va por `complete`.
    pub async fn transition(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: TransitionStatusRequest,
    ) -> AppResult<ApiResponse<WorkOrderView>> {
        let current = self.fetch(user, id).await?;
        let target = request.new_status;

        if !current.status.can_transition_to(target) {
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: target.to_string(),
            });
        }
        if target.requires_completion_form() {
            return Err(AppError::BadRequest(
                "Para completar la orden se deben informar horas reales y notas de cierre"
                    .to_string(),
            ));
        }

        self.client
            .transition_work_order_status(user.token(), id, &request)
            .await?;
        info!("🔄 Orden {}: {} -> {}", id, current.status, target);

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(
            view,
            format!("Estado actualizado a {}", target),
        ))
    }

    /// Completar la orden con horas reales y notas, en una sola llamada
    pub async fn complete(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: CompleteWorkOrderRequest,
    ) -> AppResult<ApiResponse<WorkOrderView>> {
        // Validar antes de cualquier llamada al backend
        request.validate()?;
        let request = CompleteWorkOrderRequest {
            completion_notes: request.completion_notes.trim().to_string(),
            ..request
        };

        let current = self.fetch(user, id).await?;
        if !current.status.can_transition_to(WorkOrderStatus::Completada) {
            return Err(AppError::InvalidTransition {
                from: current.status.to_string(),
                to: WorkOrderStatus::Completada.to_string(),
            });
        }

        self.client.complete_work_order(user.token(), id, &request).await?;
        info!(
            "✅ Orden {} completada ({} h) por {}",
            id,
            request.actual_hours,
            user.user().username
        );

        let view = self.get(user, id).await?;
        Ok(ApiResponse::success_with_message(view, "Orden de trabajo completada"))
    }
}
