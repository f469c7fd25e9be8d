use mimalloc::MiMalloc;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = photon::config::Config::from_toml();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        remote_folder = %cfg.storage.remote_folder,
        "starting photon"
    );

    let db = photon::db::spawn(&cfg.basic.database_url).await;

    let master_key: Arc<str> = Arc::from(cfg.basic.master_key.clone());
    let state = photon::server::router::PhotonState::new(db, cfg.storage.clone(), master_key);

    // Resolve hrefs for photos that were inserted before the last shutdown.
    if cfg.storage.token.is_empty() {
        info!("no storage token configured; skipping startup href sync");
    } else {
        let db = state.db.clone();
        let disk = state.disk.clone();
        tokio::spawn(async move {
            match photon::disk::sync_missing_hrefs(&db, &disk).await {
                Ok(report) => {
                    info!(
                        synced = report.synced,
                        faults = report.faults.len(),
                        "startup href sync finished"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "startup href sync failed");
                }
            }
        });
    }

    let app = photon::server::router::photon_router(state);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { /* ... */ },
        _ = terminate => { /* ... */ },
    }
}
