use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::clients::CmmsApiClient;
use crate::dto::dashboard_dto::DashboardSummary;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::work_order::WorkOrderStatus;
use crate::utils::errors::AppResult;

pub struct DashboardController {
    client: Arc<CmmsApiClient>,
}

fn counter(name: &str, result: AppResult<u64>) -> Option<u64> {
    match result {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("⚠️ Contador '{}' no disponible: {}", name, e);
            None
        }
    }
}

impl DashboardController {
    pub fn new(client: Arc<CmmsApiClient>) -> Self {
        Self { client }
    }

    /// Contadores del panel, consultados en paralelo
    pub async fn summary(&self, user: &AuthenticatedUser) -> DashboardSummary {
        let token = user.token();
        let (overdue, due, pending, in_progress) = futures::join!(
            self.client.count_plans(token, "is_overdue"),
            self.client.count_plans(token, "is_due"),
            self.client
                .count_work_orders(token, WorkOrderStatus::Pendiente.as_str()),
            self.client
                .count_work_orders(token, WorkOrderStatus::EnProgreso.as_str())
        );

        let unread_notifications = user
            .session
            .inbox()
            .snapshot()
            .await
            .map(|snapshot| snapshot.unread_count);

        DashboardSummary {
            overdue_plans: counter("overdue_plans", overdue),
            due_plans: counter("due_plans", due),
            pending_work_orders: counter("pending_work_orders", pending),
            in_progress_work_orders: counter("in_progress_work_orders", in_progress),
            unread_notifications,
            generated_at: Utc::now(),
        }
    }
}
