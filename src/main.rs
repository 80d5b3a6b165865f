//! Retain Cache - read-through analytics cache service
//!
//! Hosts the cache with its admin/diagnostics API: health probe, stats,
//! and the invalidation entry points.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use retain_cache::api::create_router;
use retain_cache::cache::{CacheService, Store, TtlPolicy};
use retain_cache::{spawn_sweep_task, AppState, Config, MemoryBackend};

/// Main entry point for the cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the backend and connect the store adapter (fatal on failure)
/// 4. Start the background expired-entry sweep task
/// 5. Create Axum router with all admin endpoints
/// 6. Start HTTP server on the configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "retain_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Retain Cache");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, default_ttl={}s, admin_port={}, sweep_interval={}s",
        config.max_entries, config.default_ttl, config.admin_port, config.sweep_interval
    );

    // Create the backend and connect the store adapter.
    // A backend that cannot be reached at startup is fatal.
    let memory = Arc::new(MemoryBackend::new(config.max_entries));
    let store = Store::connect(memory.clone())?;
    let service = CacheService::new(store, TtlPolicy::new(config.default_ttl))
        .set_enabled(config.cache_enabled);
    info!(enabled = config.cache_enabled, "Cache service initialized");

    // Start background sweep task
    let sweep_handle = spawn_sweep_task(memory, config.sweep_interval);
    info!("Background sweep task started");

    // Create router with all admin endpoints
    let app = create_router(AppState::new(service));

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.admin_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Admin server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    sweep_handle.abort();
    warn!("Sweep task aborted");
}
