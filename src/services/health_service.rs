use std::time::SystemTime;

use tracing::warn;

use crate::{
    dao::storage,
    dto::{
        format_system_time,
        health::{ComponentHealth, HealthResponse},
    },
    state::SharedState,
};

/// Probe the store within the health timeout and report the outcome.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let probe = storage::bounded(
        "health check",
        state.health_timeout(),
        state.game_store().health_check(),
    )
    .await;

    let database = match probe {
        Ok(()) => ComponentHealth::healthy(),
        Err(err) => {
            warn!(error = %err, "storage health check failed");
            ComponentHealth::unhealthy(err.to_string())
        }
    };

    HealthResponse::from_database(database, format_system_time(SystemTime::now()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState};

    #[tokio::test]
    async fn memory_store_reports_healthy() {
        let state = AppState::new(Arc::new(MemoryGameStore::new()), AppConfig::in_memory());

        let health = health_status(&state).await;
        assert!(health.is_healthy());
        assert_eq!(health.status, "ok");
        assert_eq!(health.services.database.status, "healthy");
        assert_eq!(health.services.api.status, "healthy");
    }
}
