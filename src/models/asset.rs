//! Modelo de Asset
//!
//! Activos físicos (vehículos y equipos) y la tabla de edición por rol
//! del formulario de activos.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::auth::UserRole;

/// Estado operativo del activo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    #[default]
    Activo,
    #[serde(rename = "En Mantenimiento")]
    EnMantenimiento,
    #[serde(rename = "Fuera de Servicio")]
    FueraDeServicio,
}

/// Asset principal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub installation_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
}

/// Ubicación seleccionable en el formulario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationOption {
    pub id: String,
    pub name: String,
}

/// Campos del formulario de activos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetField {
    Name,
    Model,
    LicensePlate,
    InstallationDate,
    Status,
    Location,
    VehicleType,
    SerialNumber,
}

impl AssetField {
    /// Orden en que el formulario presenta los campos
    pub const ALL: [AssetField; 8] = [
        AssetField::Name,
        AssetField::Model,
        AssetField::LicensePlate,
        AssetField::InstallationDate,
        AssetField::Status,
        AssetField::Location,
        AssetField::VehicleType,
        AssetField::SerialNumber,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetField::Name => "name",
            AssetField::Model => "model",
            AssetField::LicensePlate => "license_plate",
            AssetField::InstallationDate => "installation_date",
            AssetField::Status => "status",
            AssetField::Location => "location",
            AssetField::VehicleType => "vehicle_type",
            AssetField::SerialNumber => "serial_number",
        }
    }

    /// Tabla de edición por rol. El servidor es la autoridad; el gateway la
    /// aplica antes de enviar.
    pub fn editable_by(&self, role: UserRole) -> bool {
        match self {
            AssetField::Status | AssetField::Location => {
                matches!(role, UserRole::Supervisor | UserRole::Admin)
            }
            AssetField::VehicleType | AssetField::SerialNumber => role == UserRole::Admin,
            AssetField::Name
            | AssetField::Model
            | AssetField::LicensePlate
            | AssetField::InstallationDate => true,
        }
    }
}

/// Cuerpo completo que se envía al backend al crear o actualizar.
/// Siempre incluye todos los campos, incluso los que el rol no puede editar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssetPayload {
    pub name: String,
    pub model: Option<String>,
    pub license_plate: Option<String>,
    pub installation_date: Option<NaiveDate>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub vehicle_type: Option<String>,
    pub serial_number: Option<String>,
}

impl AssetPayload {
    /// Valor actual de un campo, tal como se mostraría en el formulario
    pub fn field_value(&self, field: AssetField) -> Value {
        let value = match field {
            AssetField::Name => serde_json::to_value(&self.name),
            AssetField::Model => serde_json::to_value(&self.model),
            AssetField::LicensePlate => serde_json::to_value(&self.license_plate),
            AssetField::InstallationDate => serde_json::to_value(self.installation_date),
            AssetField::Status => serde_json::to_value(self.status),
            AssetField::Location => serde_json::to_value(&self.location),
            AssetField::VehicleType => serde_json::to_value(&self.vehicle_type),
            AssetField::SerialNumber => serde_json::to_value(&self.serial_number),
        };
        value.unwrap_or(Value::Null)
    }
}

impl From<&Asset> for AssetPayload {
    fn from(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            model: asset.model.clone(),
            license_plate: asset.license_plate.clone(),
            installation_date: asset.installation_date,
            status: asset.status,
            location: asset.location.clone(),
            vehicle_type: asset.vehicle_type.clone(),
            serial_number: asset.serial_number.clone(),
        }
    }
}
