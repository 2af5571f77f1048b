//! Gateway web del sistema de mantenimiento (CMMS)
//!
//! Expone al navegador las vistas de activos, órdenes de trabajo, planes de
//! mantenimiento y notificaciones, aplicando las reglas de estado y de
//! permisos antes de reenviar cada operación al backend CMMS.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{
    extract::State, middleware::from_fn_with_state, response::Json, routing::get, Router,
};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Construir el router completo del gateway
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/assets", routes::asset_routes::create_asset_router())
        .nest(
            "/api/work-orders",
            routes::work_order_routes::create_work_order_router(),
        )
        .nest(
            "/api/maintenance/plans",
            routes::maintenance_routes::create_maintenance_router(),
        )
        .nest(
            "/api/notifications",
            routes::notification_routes::create_notification_router(),
        )
        .nest(
            "/api/dashboard",
            routes::dashboard_routes::create_dashboard_router(),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health))
        .nest(
            "/api/auth",
            routes::auth_routes::create_auth_router(state.clone()),
        )
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_middleware(&state.config))
        .with_state(state)
}

/// Endpoint de salud
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "active_sessions": state.sessions.active_sessions().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
