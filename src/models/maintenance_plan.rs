//! Modelo de MaintenancePlan
//!
//! Plan de mantenimiento preventivo. Los campos derivados (`is_due`,
//! `is_overdue`, `days_until_due`, `usage_until_due`, `next_due_date`) los
//! calcula el backend; aquí sólo se decide qué acciones ofrecer y cómo
//! rotular el estado de vencimiento.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tipo de recurrencia
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecurrenceType {
    Diario,
    Semanal,
    Mensual,
    Trimestral,
    Anual,
    #[serde(rename = "Por Horas")]
    PorHoras,
    #[serde(rename = "Por Kilómetros")]
    PorKilometros,
}

impl RecurrenceType {
    /// Recurrencia disparada por uso acumulado (horas o kilómetros)
    pub fn is_usage_based(&self) -> bool {
        matches!(self, RecurrenceType::PorHoras | RecurrenceType::PorKilometros)
    }

    /// Unidad para mostrar el uso restante
    pub fn usage_unit(&self) -> Option<&'static str> {
        match self {
            RecurrenceType::PorHoras => Some("hrs"),
            RecurrenceType::PorKilometros => Some("km"),
            _ => None,
        }
    }
}

/// Estado del plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanStatus {
    Activo,
    Pausado,
    Completado,
    Cancelado,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Activo => "Activo",
            PlanStatus::Pausado => "Pausado",
            PlanStatus::Completado => "Completado",
            PlanStatus::Cancelado => "Cancelado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::Completado | PlanStatus::Cancelado)
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acciones de ciclo de vida que puede ofrecer la vista de detalle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanAction {
    Pause,
    Resume,
    Complete,
    UpdateUsage,
}

impl PlanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanAction::Pause => "pause",
            PlanAction::Resume => "resume",
            PlanAction::Complete => "complete",
            PlanAction::UpdateUsage => "update_usage",
        }
    }

    /// Pausar y reanudar piden confirmación explícita del usuario
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, PlanAction::Pause | PlanAction::Resume)
    }
}

/// Color del indicador de vencimiento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueTone {
    Red,
    Orange,
    Gray,
}

/// Indicador de vencimiento listo para mostrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueBadge {
    pub tone: DueTone,
    pub label: String,
}

/// MaintenancePlan principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenancePlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub recurrence_type: RecurrenceType,
    pub recurrence_interval: u32,
    pub start_date: NaiveDate,
    pub status: PlanStatus,
    #[serde(default)]
    pub is_paused: bool,
    #[serde(default)]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub paused_by: Option<String>,
    #[serde(default)]
    pub usage_threshold: Option<Decimal>,
    #[serde(default)]
    pub last_usage_value: Option<Decimal>,
    #[serde(default)]
    pub is_due: bool,
    #[serde(default)]
    pub is_overdue: bool,
    #[serde(default)]
    pub days_until_due: Option<i64>,
    #[serde(default)]
    pub usage_until_due: Option<Decimal>,
    #[serde(default)]
    pub next_due_date: Option<NaiveDate>,
}

impl MaintenancePlan {
    /// El plan está pausado si el backend lo marca así por cualquiera de
    /// sus dos campos.
    pub fn is_paused_state(&self) -> bool {
        self.is_paused || self.status == PlanStatus::Pausado
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn can_pause(&self) -> bool {
        self.status == PlanStatus::Activo && !self.is_paused_state()
    }

    pub fn can_resume(&self) -> bool {
        !self.is_terminal() && self.is_paused_state()
    }

    pub fn can_complete(&self) -> bool {
        self.status == PlanStatus::Activo && !self.is_paused_state()
    }

    pub fn can_update_usage(&self) -> bool {
        !self.is_terminal() && self.recurrence_type.is_usage_based()
    }

    /// Conjunto de acciones que la vista puede mostrar
    pub fn available_actions(&self) -> Vec<PlanAction> {
        let mut actions = Vec::new();
        if self.can_pause() {
            actions.push(PlanAction::Pause);
        }
        if self.can_resume() {
            actions.push(PlanAction::Resume);
        }
        if self.can_complete() {
            actions.push(PlanAction::Complete);
        }
        if self.can_update_usage() {
            actions.push(PlanAction::UpdateUsage);
        }
        actions
    }

    pub fn allows(&self, action: PlanAction) -> bool {
        match action {
            PlanAction::Pause => self.can_pause(),
            PlanAction::Resume => self.can_resume(),
            PlanAction::Complete => self.can_complete(),
            PlanAction::UpdateUsage => self.can_update_usage(),
        }
    }

    /// Regla de presentación del vencimiento: vencido gana sobre por vencer,
    /// y ambos ganan sobre el conteo restante.
    pub fn due_badge(&self) -> DueBadge {
        if self.is_overdue {
            return DueBadge {
                tone: DueTone::Red,
                label: "Vencido".to_string(),
            };
        }
        if self.is_due {
            return DueBadge {
                tone: DueTone::Orange,
                label: "Por vencer".to_string(),
            };
        }
        DueBadge {
            tone: DueTone::Gray,
            label: self.remaining_label(),
        }
    }

    fn remaining_label(&self) -> String {
        match (self.usage_until_due, self.recurrence_type.usage_unit(), self.days_until_due) {
            (Some(usage), Some(unit), _) => format!("{} {} restantes", usage.normalize(), unit),
            (_, _, Some(1)) => "1 día restante".to_string(),
            (_, _, Some(days)) => format!("{} días restantes", days),
            _ => "Sin programación".to_string(),
        }
    }
}
