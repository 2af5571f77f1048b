pub mod asset_routes;
pub mod auth_routes;
pub mod dashboard_routes;
pub mod maintenance_routes;
pub mod notification_routes;
pub mod work_order_routes;
