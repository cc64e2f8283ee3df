//! In-process [`GameStore`] used when no MongoDB instance is available (local runs, tests).

use std::{cmp::Reverse, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{HighscoreEntity, HighscoreQuery, PlayerStateEntity, UpsertOutcome},
    storage::StorageResult,
};

/// Volatile store keeping every document in memory; contents are lost on shutdown.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    player_states: DashMap<String, PlayerStateEntity>,
    highscores: RwLock<Vec<HighscoreEntity>>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn save_player_state(&self, mut state: PlayerStateEntity) -> UpsertOutcome {
        match self.inner.player_states.entry(state.user_id.clone()) {
            Entry::Occupied(mut occupied) => {
                state.id = occupied.get().id.clone();
                let modified = occupied.get() != &state;
                occupied.insert(state);
                UpsertOutcome {
                    upserted_id: None,
                    matched: true,
                    modified,
                }
            }
            Entry::Vacant(vacant) => {
                let id = generate_id();
                state.id = Some(id.clone());
                vacant.insert(state);
                UpsertOutcome {
                    upserted_id: Some(id),
                    matched: false,
                    modified: false,
                }
            }
        }
    }

    async fn insert_highscore(&self, mut highscore: HighscoreEntity) -> String {
        let id = generate_id();
        highscore.id = Some(id.clone());
        self.inner.highscores.write().await.push(highscore);
        id
    }

    async fn list_highscores(&self, query: HighscoreQuery) -> Vec<HighscoreEntity> {
        let mut matching = self.matching(query.user_id.as_deref()).await;
        matching.sort_by_key(|entry| (Reverse(entry.score), Reverse(entry.date_achieved)));
        matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect()
    }

    async fn best_highscore(&self, user_id: &str) -> Option<HighscoreEntity> {
        let guard = self.inner.highscores.read().await;
        // First maximum in insertion order, mirroring a natural-order scan.
        guard
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .fold(None::<&HighscoreEntity>, |best, entry| match best {
                Some(current) if current.score >= entry.score => Some(current),
                _ => Some(entry),
            })
            .cloned()
    }

    async fn matching(&self, user_id: Option<&str>) -> Vec<HighscoreEntity> {
        let guard = self.inner.highscores.read().await;
        guard
            .iter()
            .filter(|entry| user_id.is_none_or(|user_id| entry.user_id == user_id))
            .cloned()
            .collect()
    }
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl GameStore for MemoryGameStore {
    fn save_player_state(
        &self,
        state: PlayerStateEntity,
    ) -> BoxFuture<'static, StorageResult<UpsertOutcome>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.save_player_state(state)) })
    }

    fn find_player_state(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerStateEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .player_states
                .get(&user_id)
                .map(|entry| entry.value().clone()))
        })
    }

    fn delete_player_state(&self, user_id: String) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let removed = store.inner.player_states.remove(&user_id);
            Ok(u64::from(removed.is_some()))
        })
    }

    fn insert_highscore(
        &self,
        highscore: HighscoreEntity,
    ) -> BoxFuture<'static, StorageResult<String>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.insert_highscore(highscore).await) })
    }

    fn list_highscores(
        &self,
        query: HighscoreQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<HighscoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_highscores(query).await) })
    }

    fn count_highscores(&self, user_id: Option<String>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.matching(user_id.as_deref()).await.len() as u64) })
    }

    fn best_highscore(
        &self,
        user_id: String,
    ) -> BoxFuture<'static, StorageResult<Option<HighscoreEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.best_highscore(&user_id).await) })
    }

    fn count_highscores_above(&self, score: i64) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            let guard = store.inner.highscores.read().await;
            Ok(guard.iter().filter(|entry| entry.score > score).count() as u64)
        })
    }

    fn ensure_indexes(&self) -> BoxFuture<'static, ()> {
        Box::pin(async {
            debug!("in-memory store has no indexes to provision");
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn disconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
