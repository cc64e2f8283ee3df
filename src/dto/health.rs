use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/api/health` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    pub timestamp: String,
    pub services: HealthServices,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthServices {
    pub database: ComponentHealth,
    pub api: ComponentHealth,
}

/// Status of a single dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// "healthy" or "unhealthy".
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(error),
        }
    }
}

impl HealthResponse {
    /// Build the payload from the database probe outcome.
    pub fn from_database(database: ComponentHealth, timestamp: String) -> Self {
        let status = if database.error.is_some() {
            "degraded"
        } else {
            "ok"
        };

        Self {
            status: status.to_string(),
            timestamp,
            services: HealthServices {
                database,
                api: ComponentHealth::healthy(),
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.services.database.error.is_none()
    }
}
