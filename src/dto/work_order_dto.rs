use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::work_order::{WorkOrder, WorkOrderPriority, WorkOrderStatus};
use crate::utils::validation::{validate_entity_ref, validate_not_empty, validate_positive_decimal};

// Request para crear una orden de trabajo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    #[validate(length(min = 3, max = 200))]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub description: Option<String>,

    pub priority: WorkOrderPriority,

    #[validate(custom = "validate_entity_ref")]
    pub asset: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_entity_ref")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

// Request para editar una orden de trabajo. El estado no está aquí: sólo
// cambia mediante transiciones.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateWorkOrderRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<WorkOrderPriority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_entity_ref")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
}

/// Cuerpo de `POST /work-orders/{id}/transition_status/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionStatusRequest {
    pub new_status: WorkOrderStatus,
}

/// Cuerpo de `POST /work-orders/{id}/complete/`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompleteWorkOrderRequest {
    #[validate(custom = "validate_not_empty")]
    pub completion_notes: String,

    #[validate(custom = "validate_positive_decimal")]
    pub actual_hours: Decimal,
}

/// Botón de transición disponible en la vista de detalle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionOption {
    pub target: WorkOrderStatus,
    pub requires_completion_form: bool,
}

/// Vista de detalle de una orden con sus transiciones disponibles
#[derive(Debug, Clone, Serialize)]
pub struct WorkOrderView {
    #[serde(flatten)]
    pub work_order: WorkOrder,
    pub available_transitions: Vec<TransitionOption>,
    pub is_terminal: bool,
}

impl From<WorkOrder> for WorkOrderView {
    fn from(work_order: WorkOrder) -> Self {
        let available_transitions = work_order
            .status
            .available_transitions()
            .iter()
            .map(|target| TransitionOption {
                target: *target,
                requires_completion_form: target.requires_completion_form(),
            })
            .collect();

        Self {
            is_terminal: work_order.status.is_terminal(),
            available_transitions,
            work_order,
        }
    }
}
