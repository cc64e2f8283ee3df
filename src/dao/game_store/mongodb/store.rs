use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tokio::time::timeout;
use tracing::{info, warn};

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoHighscoreDocument, MongoPlayerStateDocument, by_user, highscore_filter,
        leaderboard_sort, object_id_hex,
    },
};
use crate::dao::{
    game_store::{GameStore, HIGHSCORES_COLLECTION, PLAYER_STATES_COLLECTION},
    models::{HighscoreEntity, HighscoreQuery, PlayerStateEntity, UpsertOutcome},
    storage::{StorageError, StorageResult},
};

/// Index provisioned at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub collection: &'static str,
    pub name: &'static str,
    pub field: &'static str,
    /// `1` ascending, `-1` descending.
    pub direction: i32,
    pub unique: bool,
}

pub const INDEXES: [IndexSpec; 3] = [
    IndexSpec {
        collection: PLAYER_STATES_COLLECTION,
        name: "player_state_user_id_idx",
        field: "userId",
        direction: 1,
        unique: true,
    },
    IndexSpec {
        collection: HIGHSCORES_COLLECTION,
        name: "highscore_score_idx",
        field: "score",
        direction: -1,
        unique: false,
    },
    IndexSpec {
        collection: HIGHSCORES_COLLECTION,
        name: "highscore_date_achieved_idx",
        field: "dateAchieved",
        direction: -1,
        unique: false,
    },
];

impl IndexSpec {
    fn model(&self) -> IndexModel {
        let mut keys = Document::new();
        keys.insert(self.field, self.direction);
        IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(Some(self.name.to_owned()))
                    .unique(self.unique.then_some(true))
                    .build(),
            )
            .build()
    }
}

/// MongoDB-backed [`GameStore`]. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    client: Client,
    database: Database,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB. Fails when the server cannot be reached in time.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = establish_connection(&config).await?;
        info!(database = %config.database_name, "connected to MongoDB");

        Ok(Self::from_parts(client, database, config))
    }

    fn from_parts(client: Client, database: Database, config: MongoConfig) -> Self {
        Self {
            inner: Arc::new(MongoInner {
                client,
                database,
                config,
            }),
        }
    }

    fn player_states(&self) -> Collection<MongoPlayerStateDocument> {
        self.inner
            .database
            .collection::<MongoPlayerStateDocument>(PLAYER_STATES_COLLECTION)
    }

    fn highscores(&self) -> Collection<MongoHighscoreDocument> {
        self.inner
            .database
            .collection::<MongoHighscoreDocument>(HIGHSCORES_COLLECTION)
    }

    /// Create every index in [`INDEXES`]. A failure is logged and the remaining indexes are
    /// still attempted; the per-index outcome is returned in table order.
    async fn ensure_indexes(&self) -> Vec<MongoResult<&'static str>> {
        let mut outcomes = Vec::with_capacity(INDEXES.len());
        for spec in INDEXES {
            let collection = self
                .inner
                .database
                .collection::<Document>(spec.collection);

            let result = collection
                .create_index(spec.model())
                .await
                .map(|_| spec.name)
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection: spec.collection,
                    index: spec.name,
                    source,
                });

            match &result {
                Ok(_) => info!(
                    collection = spec.collection,
                    index = spec.name,
                    "index ensured"
                ),
                Err(err) => warn!(error = %err, "index creation failed; continuing without it"),
            }
            outcomes.push(result);
        }
        outcomes
    }

    async fn save_player_state(&self, state: PlayerStateEntity) -> MongoResult<UpsertOutcome> {
        let user_id = state.user_id.clone();
        let mut document: MongoPlayerStateDocument = state.into();
        // The stored `_id` is immutable; let the server keep or assign it.
        document.id = None;

        let result = self
            .player_states()
            .replace_one(by_user(&user_id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SavePlayerState { user_id, source })?;

        Ok(UpsertOutcome {
            upserted_id: result.upserted_id.as_ref().and_then(object_id_hex),
            matched: result.matched_count > 0,
            modified: result.modified_count > 0,
        })
    }

    async fn find_player_state(&self, user_id: String) -> MongoResult<Option<PlayerStateEntity>> {
        let document = self
            .player_states()
            .find_one(by_user(&user_id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayerState { user_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn delete_player_state(&self, user_id: String) -> MongoResult<u64> {
        let result = self
            .player_states()
            .delete_one(by_user(&user_id))
            .await
            .map_err(|source| MongoDaoError::DeletePlayerState { user_id, source })?;

        Ok(result.deleted_count)
    }

    async fn insert_highscore(&self, highscore: HighscoreEntity) -> MongoResult<String> {
        let user_id = highscore.user_id.clone();
        let mut document: MongoHighscoreDocument = highscore.into();
        document.id = None;

        let result = self
            .highscores()
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::InsertHighscore { user_id, source })?;

        object_id_hex(&result.inserted_id).ok_or(MongoDaoError::UnexpectedInsertedId)
    }

    async fn list_highscores(&self, query: HighscoreQuery) -> MongoResult<Vec<HighscoreEntity>> {
        let documents: Vec<MongoHighscoreDocument> = self
            .highscores()
            .find(highscore_filter(query.user_id.as_deref()))
            .sort(leaderboard_sort())
            .skip(u64::from(query.offset))
            .limit(i64::from(query.limit))
            .await
            .map_err(|source| MongoDaoError::ListHighscores { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListHighscores { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn count_highscores(&self, user_id: Option<String>) -> MongoResult<u64> {
        self.highscores()
            .count_documents(highscore_filter(user_id.as_deref()))
            .await
            .map_err(|source| MongoDaoError::CountHighscores { source })
    }

    async fn best_highscore(&self, user_id: String) -> MongoResult<Option<HighscoreEntity>> {
        let document = self
            .highscores()
            .find_one(by_user(&user_id))
            .sort(doc! { "score": -1 })
            .await
            .map_err(|source| MongoDaoError::BestHighscore { user_id, source })?;

        Ok(document.map(Into::into))
    }

    async fn count_highscores_above(&self, score: i64) -> MongoResult<u64> {
        self.highscores()
            .count_documents(doc! { "score": { "$gt": score } })
            .await
            .map_err(|source| MongoDaoError::CountHighscores { source })
    }

    async fn disconnect(&self) -> StorageResult<()> {
        let limit = self.inner.config.probe_timeout;
        timeout(limit, self.inner.client.clone().shutdown())
            .await
            .map_err(|_| StorageError::Timeout {
                operation: "disconnect",
                after: limit,
            })?;
        info!("MongoDB connection closed");
        Ok(())
    }
}

impl GameStore for MongoGameStore {
    fn save_player_state(
        &self,
        state: PlayerStateEntity,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>> {
        let store = self.clone();
        Box::pin(async move { store.save_player_state(state).await.map_err(Into::into) })
    }

    fn find_player_state(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player_state(user_id).await.map_err(Into::into) })
    }

    fn delete_player_state(&self, user_id: String) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.delete_player_state(user_id).await.map_err(Into::into) })
    }

    fn insert_highscore(
        &self,
        highscore: HighscoreEntity,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        Box::pin(async move { store.insert_highscore(highscore).await.map_err(Into::into) })
    }

    fn list_highscores(
        &self,
        query: HighscoreQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<HighscoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_highscores(query).await.map_err(Into::into) })
    }

    fn count_highscores(&self, user_id: Option<String>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.count_highscores(user_id).await.map_err(Into::into) })
    }

    fn best_highscore(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<HighscoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.best_highscore(user_id).await.map_err(Into::into) })
    }

    fn count_highscores_above(&self, score: i64) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.count_highscores_above(score).await.map_err(Into::into) })
    }

    fn ensure_indexes(&self) -> BoxFuture<'static, ()> {
        let store = self.clone();
        Box::pin(async move {
            store.ensure_indexes().await;
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn disconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.disconnect().await })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn index_table_covers_lookup_and_leaderboard_fields() {
        let player = INDEXES
            .iter()
            .find(|spec| spec.collection == PLAYER_STATES_COLLECTION)
            .unwrap();
        assert_eq!((player.field, player.direction, player.unique), ("userId", 1, true));

        let leaderboard: Vec<_> = INDEXES
            .iter()
            .filter(|spec| spec.collection == HIGHSCORES_COLLECTION)
            .map(|spec| (spec.field, spec.direction, spec.unique))
            .collect();
        assert_eq!(
            leaderboard,
            [("score", -1, false), ("dateAchieved", -1, false)]
        );
    }

    #[tokio::test]
    async fn index_failures_do_not_stop_the_remaining_indexes() {
        let config = MongoConfig::from_uri(
            "mongodb://127.0.0.1:1",
            "balatro_game_test",
            Duration::from_millis(100),
            Duration::from_millis(100),
        )
        .await
        .unwrap();
        let client = Client::with_options(config.options.clone()).unwrap();
        let database = client.database(&config.database_name);
        let store = MongoGameStore::from_parts(client, database, config);

        let outcomes = store.ensure_indexes().await;

        assert_eq!(outcomes.len(), INDEXES.len());
        for (outcome, spec) in outcomes.iter().zip(INDEXES) {
            match outcome {
                Err(MongoDaoError::EnsureIndex { index, .. }) => assert_eq!(*index, spec.name),
                other => panic!("expected index failure for {}, got {other:?}", spec.name),
            }
        }
    }

    #[test]
    fn index_model_carries_name_and_uniqueness() {
        let model = INDEXES[0].model();
        assert_eq!(model.keys, doc! { "userId": 1 });
        let options = model.options.unwrap();
        assert_eq!(options.name.as_deref(), Some("player_state_user_id_idx"));
        assert_eq!(options.unique, Some(true));

        let model = INDEXES[1].model();
        assert_eq!(model.options.unwrap().unique, None);
    }
}
