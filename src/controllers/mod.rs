pub mod asset_controller;
pub mod auth_controller;
pub mod dashboard_controller;
pub mod maintenance_controller;
pub mod notification_controller;
pub mod work_order_controller;
