//! Modelo de WorkOrder
//!
//! Orden de trabajo tal como la devuelve el backend CMMS, junto con la
//! tabla de transiciones de estado que el gateway debe respetar.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prioridad de la orden de trabajo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderPriority {
    Baja,
    Media,
    Alta,
    Urgente,
}

/// Estado de la orden de trabajo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkOrderStatus {
    Pendiente,
    #[serde(rename = "En Progreso")]
    EnProgreso,
    Completada,
    Cancelada,
}

impl WorkOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkOrderStatus::Pendiente => "Pendiente",
            WorkOrderStatus::EnProgreso => "En Progreso",
            WorkOrderStatus::Completada => "Completada",
            WorkOrderStatus::Cancelada => "Cancelada",
        }
    }

    /// Estados destino permitidos desde este estado
    pub fn available_transitions(&self) -> &'static [WorkOrderStatus] {
        match self {
            WorkOrderStatus::Pendiente => &[WorkOrderStatus::EnProgreso, WorkOrderStatus::Cancelada],
            WorkOrderStatus::EnProgreso => &[WorkOrderStatus::Completada, WorkOrderStatus::Cancelada],
            WorkOrderStatus::Completada | WorkOrderStatus::Cancelada => &[],
        }
    }

    pub fn can_transition_to(&self, target: WorkOrderStatus) -> bool {
        self.available_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.available_transitions().is_empty()
    }

    /// `Completada` sólo se alcanza con el formulario de cierre
    /// (horas reales + notas), nunca con un cambio de estado directo.
    pub fn requires_completion_form(&self) -> bool {
        matches!(self, WorkOrderStatus::Completada)
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WorkOrder principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: WorkOrderPriority,
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub asset_name: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_hours: Option<Decimal>,
    #[serde(default)]
    pub completion_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkOrder {
    /// Los campos de cierre sólo existen cuando la orden está `Completada`
    pub fn completion_is_consistent(&self) -> bool {
        let has_completion_fields = self.completed_date.is_some()
            || self.actual_hours.is_some()
            || self
                .completion_notes
                .as_deref()
                .map_or(false, |notes| !notes.is_empty());

        match self.status {
            WorkOrderStatus::Completada => true,
            _ => !has_completion_fields,
        }
    }
}
