//! Services module
//!
//! Este módulo contiene la lógica con estado del gateway: las sesiones
//! autenticadas y el polling de notificaciones de cada una.

pub mod notification_poller;
pub mod session_service;

pub use notification_poller::{NotificationInbox, NotificationPoller, NotificationSource};
pub use session_service::{Session, SessionManager};
