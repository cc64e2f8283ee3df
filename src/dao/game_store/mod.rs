pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{HighscoreEntity, HighscoreQuery, PlayerStateEntity, UpsertOutcome};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Logical collection holding one [`PlayerStateEntity`] per user.
pub const PLAYER_STATES_COLLECTION: &str = "player_states";
/// Logical collection holding append-only [`HighscoreEntity`] records.
pub const HIGHSCORES_COLLECTION: &str = "highscores";

/// Abstraction over the persistence layer for player states and highscores.
pub trait GameStore: Send + Sync {
    /// Replace the state stored for `state.user_id`, inserting it when absent.
    fn save_player_state(
        &self,
        state: PlayerStateEntity,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>>;
    fn find_player_state(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStateEntity>>>;
    /// Remove the state stored for `user_id`, returning how many documents were deleted.
    fn delete_player_state(&self, user_id: String) -> BoxFuture<'static, StorageResult<u64>>;
    /// Append a highscore, returning its generated identity.
    fn insert_highscore(&self, highscore: HighscoreEntity)
    -> BoxFuture<'static, StorageResult<String>>;
    /// Page through highscores ordered by score then achievement date, both descending.
    fn list_highscores(
        &self,
        query: HighscoreQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<HighscoreEntity>>>;
    fn count_highscores(&self, user_id: Option<String>) -> BoxFuture<'static, StorageResult<u64>>;
    /// Highest-scoring record of `user_id`.
    fn best_highscore(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<HighscoreEntity>>>;
    /// Number of records, across all users, whose score is strictly greater than `score`.
    fn count_highscores_above(&self, score: i64) -> BoxFuture<'static, StorageResult<u64>>;
    /// Create the indexes the collections rely on. Individual failures are logged, not returned.
    fn ensure_indexes(&self) -> BoxFuture<'static, ()>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn disconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
