use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use dotenvy::dotenv;

use catalog_quotes::config::database::{run_migrations, DatabaseConfig};
use catalog_quotes::config::EnvironmentConfig;
use catalog_quotes::create_app;
use catalog_quotes::state::AppState;
use catalog_quotes::utils::clock::{Clock, SystemClock};

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

    info!("🏠 Catálogo y Cotizaciones - API");
    info!("================================");

    let config = EnvironmentConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Inicializar store
    let app_state = match config.database_url.clone() {
        Some(url) => {
            let pool = match DatabaseConfig::new(url).create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            run_migrations(&pool).await?;
            info!("✅ PostgreSQL conectado");
            AppState::with_postgres(pool, config.clone(), clock)
        }
        None => {
            warn!("⚠️ DATABASE_URL no definida: usando store en memoria (los datos no persisten)");
            AppState::in_memory(config.clone(), clock)
        }
    };

    let app = create_app(app_state);
    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📂 Categorías:");
    info!("   GET|POST /api/categories");
    info!("   GET|PUT|DELETE /api/categories/:id");
    info!("📦 Productos:");
    info!("   GET|POST /api/products");
    info!("   GET|PUT|DELETE /api/products/:id");
    info!("   GET  /api/products/:id/quote");
    info!("🧾 Cotizaciones:");
    info!("   GET|POST /api/quotations");
    info!("   GET  /api/quotations/stats");
    info!("   GET|DELETE /api/quotations/:id");
    info!("   PUT  /api/quotations/:id/status");
    info!("   GET  /api/quotations/:id/message");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo escuchar Ctrl+C: {}", e);
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
