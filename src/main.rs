use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cmms_gateway::config::environment::EnvironmentConfig;
use cmms_gateway::create_app;
use cmms_gateway::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🔧 CMMS Gateway - Gestión de mantenimiento");
    info!("==========================================");

    let config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuración inválida: {}", e);
        anyhow::anyhow!("Error de configuración: {}", e)
    })?;

    info!("🌍 Entorno: {} ({})", config.environment, config.environment_label());
    info!("📡 Backend CMMS: {}", config.cmms_api_url);

    let addr: SocketAddr = config.server_url().parse()?;
    let state = AppState::new(config).map_err(|e| anyhow::anyhow!("{}", e))?;
    let sessions = state.sessions.clone();
    let reaper = sessions.spawn_reaper(Duration::from_secs(state.config.session_reap_secs));
    let app = create_app(state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado del servicio");
    info!("🔐 Autenticación:");
    info!("   POST /api/auth/login - Iniciar sesión");
    info!("   POST /api/auth/logout - Cerrar sesión");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("🚜 Activos:");
    info!("   GET  /api/assets - Listar activos");
    info!("   GET  /api/assets/form - Formulario de alta");
    info!("   GET  /api/assets/:id - Obtener activo");
    info!("   GET  /api/assets/:id/form - Formulario de edición");
    info!("   POST /api/assets - Crear activo");
    info!("   PUT  /api/assets/:id - Actualizar activo");
    info!("   DELETE /api/assets/:id - Archivar activo");
    info!("🛠️ Órdenes de trabajo:");
    info!("   GET  /api/work-orders - Listar órdenes");
    info!("   POST /api/work-orders - Crear orden");
    info!("   GET  /api/work-orders/:id - Detalle con transiciones");
    info!("   PUT  /api/work-orders/:id - Editar orden");
    info!("   DELETE /api/work-orders/:id - Eliminar orden");
    info!("   POST /api/work-orders/:id/transition - Cambiar estado");
    info!("   POST /api/work-orders/:id/complete - Completar orden");
    info!("🗓️ Planes de mantenimiento:");
    info!("   GET  /api/maintenance/plans - Listar planes");
    info!("   POST /api/maintenance/plans - Crear plan");
    info!("   GET  /api/maintenance/plans/:id - Detalle con acciones");
    info!("   PUT  /api/maintenance/plans/:id - Editar plan");
    info!("   DELETE /api/maintenance/plans/:id - Eliminar plan");
    info!("   POST /api/maintenance/plans/:id/pause - Pausar plan");
    info!("   POST /api/maintenance/plans/:id/resume - Reanudar plan");
    info!("   POST /api/maintenance/plans/:id/complete - Registrar mantenimiento");
    info!("   POST /api/maintenance/plans/:id/usage - Actualizar lectura de uso");
    info!("🔔 Notificaciones:");
    info!("   GET  /api/notifications - Bandeja actual");
    info!("   POST /api/notifications/refresh - Refrescar bandeja");
    info!("   POST /api/notifications/:id/read - Marcar como leída");
    info!("📊 Panel:");
    info!("   GET  /api/dashboard - Contadores");

    // Iniciar servidor en background
    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    // Esperar a que el servidor termine
    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    // Detener el reaper y los pollers de las sesiones abiertas
    reaper.abort();
    sessions.teardown_all().await;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
