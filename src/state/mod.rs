use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::{config::AppConfig, dao::game_store::GameStore, dao::storage};

pub type SharedState = Arc<AppState>;

/// Central application state: the persistence gateway and the runtime configuration.
///
/// Built once at startup after the store connection succeeded, and shared read-only by every
/// request handler.
pub struct AppState {
    game_store: Arc<dyn GameStore>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(game_store: Arc<dyn GameStore>, config: AppConfig) -> SharedState {
        Arc::new(Self { game_store, config })
    }

    /// Handle to the persistence gateway.
    pub fn game_store(&self) -> &Arc<dyn GameStore> {
        &self.game_store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Bound for player-state and highscore store calls.
    pub fn operation_timeout(&self) -> Duration {
        self.config.operation_timeout
    }

    /// Bound for health probes and the shutdown disconnect.
    pub fn health_timeout(&self) -> Duration {
        self.config.health_timeout
    }

    /// Release the store connection. Failures are logged only, since this runs during shutdown.
    pub async fn shutdown(&self) {
        let result = storage::bounded(
            "disconnect",
            self.health_timeout(),
            self.game_store.disconnect(),
        )
        .await;

        match result {
            Ok(()) => info!("storage connection released"),
            Err(err) => warn!(error = %err, "failed to release storage connection"),
        }
    }
}
