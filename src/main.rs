use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use route_registry::config::database::DatabaseConfig;
use route_registry::config::environment::{Cli, EnvironmentConfig};
use route_registry::database::DatabaseConnection;
use route_registry::routes::create_router;
use route_registry::services::deletion_queue::deletion_concurrency;
use route_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let cli = Cli::parse();

    // Configurar logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "route_registry=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚚 Route Registry");
    info!("================");

    let config = EnvironmentConfig::from_cli(cli).context("reading config")?;

    // Inicializar base de datos
    let db_config = DatabaseConfig::from_environment(&config);
    let db_connection = match DatabaseConnection::new(&db_config, config.run_migrations).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    let (app_state, deletion_worker) = AppState::new(
        db_connection.pool().clone(),
        config.delete_timeout,
        deletion_concurrency(db_config.max_connections),
    );

    let app = create_router(app_state, &config.cors_origins);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;

    info!("🌐 Servidor iniciando en http://{}", listener.local_addr()?);
    info!("🔍 Endpoints disponibles:");
    info!("   POST   /api/route/register - Registrar ruta");
    info!("   GET    /api/route/:id - Obtener ruta");
    info!("   DELETE /api/route - Borrar rutas (en segundo plano)");
    info!("   GET    /health - Health check");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Servidor terminó con error: {}", e);
    }

    // El router ya no existe: el worker termina los borrados pendientes y sale
    info!("⏳ Esperando borrados pendientes...");
    match tokio::time::timeout(config.delete_timeout, deletion_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("❌ Worker de borrado terminó con error: {}", e),
        Err(_) => warn!("⏱️ Borrados pendientes abandonados tras {:?}", config.delete_timeout),
    }

    db_connection.pool().close().await;
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
            Ok(mut sig) => {
                sig.recv().await;
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
