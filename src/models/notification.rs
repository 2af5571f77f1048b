use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Notificación para el usuario (vencimientos, asignaciones, etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub notification_type: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Estado de la bandeja de una sesión
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InboxSnapshot {
    pub unread_count: u64,
    pub notifications: Vec<Notification>,
    pub fetched_at: DateTime<Utc>,
}
