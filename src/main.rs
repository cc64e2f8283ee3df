//! Balatro backend binary entrypoint wiring configuration, storage and the REST layer.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use balatro_back::{
    build_router,
    config::{AppConfig, StorageBackend},
    dao::game_store::{GameStore, memory::MemoryGameStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = connect_store(&config).await?;

    // Index creation failures are logged by the store and never abort startup.
    store.ensure_indexes().await;

    let port = config.port;
    let app_state = AppState::new(store, config);
    let app = build_router(app_state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    app_state.shutdown().await;
    info!("server stopped");
    Ok(())
}

/// Open the configured store. A failed connection is fatal.
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn GameStore>> {
    match config.storage {
        StorageBackend::Memory => {
            info!("using in-memory storage; data is lost on restart");
            Ok(Arc::new(MemoryGameStore::new()))
        }
        #[cfg(feature = "mongo-store")]
        StorageBackend::Mongo => {
            use balatro_back::dao::game_store::mongodb::{MongoConfig, MongoGameStore};

            let mongo_config = MongoConfig::from_uri(
                &config.mongo_uri,
                &config.database_name,
                config.connect_timeout,
                config.health_timeout,
            )
            .await
            .context("parsing MongoDB connection string")?;
            let store = MongoGameStore::connect(mongo_config)
                .await
                .context("connecting to MongoDB")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongo-store"))]
        StorageBackend::Mongo => {
            anyhow::bail!("MongoDB storage requested but the `mongo-store` feature is disabled")
        }
    }
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
