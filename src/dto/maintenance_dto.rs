use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::maintenance_plan::{DueBadge, MaintenancePlan, PlanAction, RecurrenceType};
use crate::utils::errors::{validation_error, AppResult};
use crate::utils::validation::{
    validate_entity_ref, validate_non_negative_decimal, validate_positive_decimal,
};

// Request para crear un plan de mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePlanRequest {
    #[validate(length(min = 3, max = 200))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[validate(custom = "validate_entity_ref")]
    pub asset: String,

    pub recurrence_type: RecurrenceType,

    #[validate(range(min = 1))]
    pub recurrence_interval: u32,

    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_positive_decimal")]
    pub usage_threshold: Option<Decimal>,
}

impl CreatePlanRequest {
    /// Los planes por uso exigen umbral; los planes por tiempo no envían
    /// campos de uso.
    pub fn enforce_usage_rules(mut self) -> AppResult<Self> {
        if self.recurrence_type.is_usage_based() {
            if self.usage_threshold.is_none() {
                return Err(validation_error(
                    "usage_threshold",
                    "El umbral de uso es obligatorio para planes por horas o kilómetros",
                ));
            }
        } else {
            self.usage_threshold = None;
        }
        Ok(self)
    }
}

// Request para editar un plan de mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdatePlanRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_type: Option<RecurrenceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub recurrence_interval: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_positive_decimal")]
    pub usage_threshold: Option<Decimal>,
}

impl UpdatePlanRequest {
    /// Igual que al crear, pero contra el tipo de recurrencia efectivo
    /// (el enviado o, si no cambia, el actual del plan).
    pub fn enforce_usage_rules(mut self, current: &MaintenancePlan) -> AppResult<Self> {
        let effective = self.recurrence_type.unwrap_or(current.recurrence_type);
        if effective.is_usage_based() {
            if self.usage_threshold.or(current.usage_threshold).is_none() {
                return Err(validation_error(
                    "usage_threshold",
                    "El umbral de uso es obligatorio para planes por horas o kilómetros",
                ));
            }
        } else {
            self.usage_threshold = None;
        }
        Ok(self)
    }
}

/// Acción del endpoint `pause_resume`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseResumeAction {
    Pause,
    Resume,
}

/// Cuerpo de `POST /maintenance/plans/{id}/pause_resume/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PauseResumeRequest {
    pub action: PauseResumeAction,
}

/// Confirmación explícita del usuario antes de pausar o reanudar
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmActionRequest {
    #[serde(default)]
    pub confirmed: bool,
}

/// Cuerpo de `POST /maintenance/plans/{id}/complete/`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompletePlanRequest {
    pub completion_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub usage_value: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub notes: Option<String>,
}

impl CompletePlanRequest {
    /// `usage_value` es obligatorio sólo si el plan es por uso; en planes por
    /// tiempo no se envía.
    pub fn for_plan(mut self, plan: &MaintenancePlan) -> AppResult<Self> {
        if plan.recurrence_type.is_usage_based() {
            if self.usage_value.is_none() {
                return Err(validation_error(
                    "usage_value",
                    "La lectura de uso es obligatoria para planes por horas o kilómetros",
                ));
            }
        } else {
            self.usage_value = None;
        }
        self.notes = self
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        Ok(self)
    }
}

/// Cuerpo de `POST /maintenance/plans/{id}/update_usage/`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUsageRequest {
    #[validate(custom = "validate_non_negative_decimal")]
    pub current_usage: Decimal,
}

/// Acción disponible en la vista de detalle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanActionOption {
    pub action: PlanAction,
    pub requires_confirmation: bool,
}

/// Vista de un plan con su indicador de vencimiento y acciones
#[derive(Debug, Clone, Serialize)]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: MaintenancePlan,
    pub due_badge: DueBadge,
    pub available_actions: Vec<PlanActionOption>,
    pub usage_unit: Option<&'static str>,
    pub is_terminal: bool,
}

impl From<MaintenancePlan> for PlanView {
    fn from(plan: MaintenancePlan) -> Self {
        let available_actions = plan
            .available_actions()
            .into_iter()
            .map(|action| PlanActionOption {
                action,
                requires_confirmation: action.requires_confirmation(),
            })
            .collect();

        Self {
            due_badge: plan.due_badge(),
            usage_unit: plan.recurrence_type.usage_unit(),
            is_terminal: plan.is_terminal(),
            available_actions,
            plan,
        }
    }
}
