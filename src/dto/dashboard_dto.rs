use chrono::{DateTime, Utc};
use serde::Serialize;

/// Contadores del panel principal.
///
/// Cada contador se obtiene por separado; si una consulta falla el valor
/// queda en `null` y el resto del panel se muestra igual.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSummary {
    pub overdue_plans: Option<u64>,
    pub due_plans: Option<u64>,
    pub pending_work_orders: Option<u64>,
    pub in_progress_work_orders: Option<u64>,
    pub unread_notifications: Option<u64>,
    pub generated_at: DateTime<Utc>,
}
