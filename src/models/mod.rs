//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos tal como los expone el backend
//! CMMS, junto con las reglas de estado que el gateway aplica.

pub mod asset;
pub mod auth;
pub mod maintenance_plan;
pub mod notification;
pub mod pagination;
pub mod work_order;
