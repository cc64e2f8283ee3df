//! Application-level configuration: defaults, then an optional JSON file, then environment variables.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BALATRO_BACK_CONFIG_PATH";

const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE_NAME: &str = "balatro_game";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:3000,http://localhost:3001,http://localhost:3002";
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which [`GameStore`](crate::dao::game_store::GameStore) implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Some(Self::Mongo),
            "memory" | "in-memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    pub storage: StorageBackend,
    /// Opaque connection string handed to the MongoDB driver.
    pub mongo_uri: String,
    pub database_name: String,
    pub port: u16,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Bound applied to every player-state and highscore store call.
    pub operation_timeout: Duration,
    /// Bound applied to health probes and to the shutdown disconnect.
    pub health_timeout: Duration,
    /// Bound applied to the startup connection handshake.
    pub connect_timeout: Duration,
}

impl AppConfig {
    /// Load the configuration, layering the JSON file and the environment over built-in defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    config.apply_file(raw);
                    info!(path = %path.display(), "loaded configuration file");
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
            }
        }

        config.apply_env(|key| env::var(key).ok());
        config
    }

    /// Configuration for tests and local runs that need no external services.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }

    fn apply_file(&mut self, raw: RawConfig) {
        if let Some(storage) = raw.storage {
            self.storage = storage;
        }
        if let Some(uri) = raw.mongo_uri {
            self.mongo_uri = uri;
        }
        if let Some(name) = raw.database_name {
            self.database_name = name;
        }
        if let Some(port) = raw.port {
            self.port = port;
        }
        if let Some(origins) = raw.allowed_origins {
            self.allowed_origins = origins;
        }
        if let Some(ms) = raw.operation_timeout_ms {
            self.operation_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.health_timeout_ms {
            self.health_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = raw.connect_timeout_ms {
            self.connect_timeout = Duration::from_millis(ms);
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = var("STORAGE_BACKEND") {
            match StorageBackend::parse(&value) {
                Some(storage) => self.storage = storage,
                None => warn!(value = %value, "ignoring unknown STORAGE_BACKEND"),
            }
        }
        if let Some(uri) = var("MONGODB_URI") {
            self.mongo_uri = uri;
        }
        if let Some(name) = var("DATABASE_NAME") {
            self.database_name = name;
        }
        if let Some(value) = var("PORT") {
            match value.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(err) => warn!(value = %value, error = %err, "ignoring invalid PORT"),
            }
        }
        if let Some(value) = var("ALLOWED_ORIGINS") {
            self.allowed_origins = split_origins(&value);
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Mongo,
            mongo_uri: DEFAULT_MONGO_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            port: DEFAULT_PORT,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    storage: Option<StorageBackend>,
    mongo_uri: Option<String>,
    database_name: Option<String>,
    port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
    operation_timeout_ms: Option<u64>,
    health_timeout_ms: Option<u64>,
    connect_timeout_ms: Option<u64>,
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_deployment_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.storage, StorageBackend::Mongo);
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "balatro_game");
        assert_eq!(config.port, 8080);
        assert_eq!(config.allowed_origins.len(), 3);
        assert_eq!(config.operation_timeout, Duration::from_secs(10));
        assert_eq!(config.health_timeout, Duration::from_secs(5));
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = AppConfig::default();
        let raw: RawConfig = serde_json::from_str(
            r#"{"database_name": "from_file", "port": 9000, "operation_timeout_ms": 2500}"#,
        )
        .unwrap();
        config.apply_file(raw);
        config.apply_env(env_of(&[
            ("DATABASE_NAME", "from_env"),
            ("ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
            ("STORAGE_BACKEND", "memory"),
        ]));

        assert_eq!(config.database_name, "from_env");
        assert_eq!(config.port, 9000);
        assert_eq!(config.operation_timeout, Duration::from_millis(2500));
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(
            config.allowed_origins,
            ["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn invalid_environment_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[
            ("PORT", "eighty"),
            ("STORAGE_BACKEND", "couch"),
            ("MONGODB_URI", "  "),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Mongo);
        assert_eq!(config.mongo_uri, "mongodb://localhost:27017");
    }
}
