//! Error types shared by the MongoDB storage implementation.

use std::time::Duration;

use mongodb::error::Error as MongoError;
use thiserror::Error;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB did not answer within {}ms during initial connection", .after.as_millis())]
    ConnectTimeout { after: Duration },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save player state for user `{user_id}`")]
    SavePlayerState {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load player state for user `{user_id}`")]
    LoadPlayerState {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete player state for user `{user_id}`")]
    DeletePlayerState {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to insert highscore for user `{user_id}`")]
    InsertHighscore {
        user_id: String,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB returned a non-ObjectId identifier for the inserted highscore")]
    UnexpectedInsertedId,
    #[error("failed to list highscores")]
    ListHighscores {
        #[source]
        source: MongoError,
    },
    #[error("failed to count highscores")]
    CountHighscores {
        #[source]
        source: MongoError,
    },
    #[error("failed to load best highscore for user `{user_id}`")]
    BestHighscore {
        user_id: String,
        #[source]
        source: MongoError,
    },
}
