use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::asset::{AssetField, AssetPayload, AssetStatus, LocationOption};
use crate::models::auth::UserRole;
use crate::utils::validation::{normalize_license_plate, validate_license_plate};

// Request del formulario de activos (crear o actualizar)
#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct AssetSubmission {
    #[validate(length(min = 2, max = 150))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub model: Option<String>,

    #[serde(default)]
    #[validate(custom = "validate_license_plate")]
    pub license_plate: Option<String>,

    #[serde(default)]
    pub installation_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: Option<AssetStatus>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub vehicle_type: Option<String>,

    #[serde(default)]
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AssetSubmission {
    /// Construir el cuerpo completo para el backend.
    ///
    /// `baseline` es el valor vigente de cada campo (el activo actual al
    /// editar, los valores por defecto al crear). Los campos que el rol no
    /// puede editar se envían con el valor de `baseline`; si el formulario
    /// intentó cambiarlos se devuelve la lista de campos infractores.
    pub fn resolve(
        self,
        role: UserRole,
        baseline: &AssetPayload,
    ) -> Result<AssetPayload, Vec<AssetField>> {
        let submitted = AssetPayload {
            name: self.name.trim().to_string(),
            model: clean(self.model),
            license_plate: clean(self.license_plate).map(|plate| normalize_license_plate(&plate)),
            installation_date: self.installation_date,
            status: self.status.unwrap_or(baseline.status),
            location: clean(self.location),
            vehicle_type: clean(self.vehicle_type),
            serial_number: clean(self.serial_number),
        };

        let mut resolved = submitted.clone();
        let mut violations = Vec::new();

        for field in AssetField::ALL {
            if field.editable_by(role) {
                continue;
            }
            let current = baseline.field_value(field);
            let attempted = submitted.field_value(field);
            // Un campo bloqueado que llega vacío se interpreta como "sin tocar"
            if !attempted.is_null() && attempted != current {
                violations.push(field);
            }
            match field {
                AssetField::Status => resolved.status = baseline.status,
                AssetField::Location => resolved.location = baseline.location.clone(),
                AssetField::VehicleType => resolved.vehicle_type = baseline.vehicle_type.clone(),
                AssetField::SerialNumber => resolved.serial_number = baseline.serial_number.clone(),
                AssetField::Name
                | AssetField::Model
                | AssetField::LicensePlate
                | AssetField::InstallationDate => {}
            }
        }

        if violations.is_empty() {
            Ok(resolved)
        } else {
            Err(violations)
        }
    }
}

/// Estado de un input del formulario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormFieldState {
    pub field: AssetField,
    pub value: Value,
    pub disabled: bool,
}

/// Formulario de activos listo para renderizar
#[derive(Debug, Clone, Serialize)]
pub struct AssetFormView {
    pub asset_id: Option<String>,
    pub role: UserRole,
    pub fields: Vec<FormFieldState>,
    pub location_options: Vec<LocationOption>,
}

impl AssetFormView {
    pub fn new(
        asset_id: Option<String>,
        role: UserRole,
        values: &AssetPayload,
        location_options: Vec<LocationOption>,
    ) -> Self {
        let fields = AssetField::ALL
            .into_iter()
            .map(|field| FormFieldState {
                field,
                value: values.field_value(field),
                disabled: !field.editable_by(role),
            })
            .collect();

        Self {
            asset_id,
            role,
            fields,
            location_options,
        }
    }

    pub fn field(&self, field: AssetField) -> Option<&FormFieldState> {
        self.fields.iter().find(|state| state.field == field)
    }
}
