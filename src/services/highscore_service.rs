//! Append-only highscore log and the leaderboard queries built on top of it.

use std::time::SystemTime;

use tracing::{info, warn};
use validator::Validate;

use crate::{
    dao::{models::HighscoreQuery, storage},
    dto::highscore::{
        HighscoreListQuery, HighscoreListResponse, SaveHighscoreRequest, SaveHighscoreResponse,
        UserHighscoreResponse,
    },
    error::ServiceError,
    services::require_user_id,
    state::SharedState,
};

/// Record a finished run. Every call inserts a new record.
pub async fn save_highscore(
    state: &SharedState,
    request: SaveHighscoreRequest,
) -> Result<SaveHighscoreResponse, ServiceError> {
    request.validate()?;

    let entity = request.into_entity(SystemTime::now());
    let score = entity.score;
    let user_id = entity.user_id.clone();

    let inserted_id = storage::bounded(
        "insert highscore",
        state.operation_timeout(),
        state.game_store().insert_highscore(entity),
    )
    .await
    .map_err(ServiceError::persistence("failed to save highscore"))?;

    info!(user_id = %user_id, score, id = %inserted_id, "highscore saved");
    Ok(SaveHighscoreResponse { inserted_id, score })
}

/// One leaderboard page, best score first.
pub async fn list_highscores(
    state: &SharedState,
    query: HighscoreListQuery,
) -> Result<HighscoreListResponse, ServiceError> {
    let page = query.page();
    let user_id = query.user_filter();

    let highscores = storage::bounded(
        "list highscores",
        state.operation_timeout(),
        state.game_store().list_highscores(HighscoreQuery {
            user_id: user_id.clone(),
            limit: page.limit,
            offset: page.offset,
        }),
    )
    .await
    .map_err(ServiceError::persistence("failed to load highscores"))?;

    let returned = highscores.len() as u64;
    let total_count = match storage::bounded(
        "count highscores",
        state.operation_timeout(),
        state.game_store().count_highscores(user_id),
    )
    .await
    {
        Ok(count) => count,
        Err(err) => {
            warn!(error = %err, "highscore count failed; reporting page length as total");
            returned
        }
    };

    Ok(HighscoreListResponse {
        has_more: u64::from(page.offset) + u64::from(page.limit) < total_count,
        highscores: highscores.into_iter().map(Into::into).collect(),
        total_count,
        limit: page.limit,
        offset: page.offset,
    })
}

/// Best record of `user_id` and its global rank.
pub async fn user_best_highscore(
    state: &SharedState,
    user_id: &str,
) -> Result<UserHighscoreResponse, ServiceError> {
    require_user_id(user_id)?;

    let best = storage::bounded(
        "find best highscore",
        state.operation_timeout(),
        state.game_store().best_highscore(user_id.to_owned()),
    )
    .await
    .map_err(ServiceError::persistence("failed to load highscore"))?
    .ok_or_else(|| ServiceError::NotFound("no highscore found for user".into()))?;

    let above = storage::bounded(
        "count higher highscores",
        state.operation_timeout(),
        state.game_store().count_highscores_above(best.score),
    )
    .await
    .map_err(ServiceError::persistence("failed to load highscore"))?;

    Ok(UserHighscoreResponse {
        highscore: best.into(),
        rank: above + 1,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{config::AppConfig, dao::game_store::memory::MemoryGameStore, state::AppState};

    fn app_state() -> SharedState {
        AppState::new(Arc::new(MemoryGameStore::new()), AppConfig::in_memory())
    }

    async fn submit(state: &SharedState, user_id: &str, name: &str, score: i64) -> String {
        let request: SaveHighscoreRequest = serde_json::from_value(
            json!({"userId": user_id, "playerName": name, "score": score, "finalBlind": 3}),
        )
        .unwrap();
        save_highscore(state, request).await.unwrap().inserted_id
    }

    fn list_query(
        limit: Option<&str>,
        offset: Option<&str>,
        user_id: Option<&str>,
    ) -> HighscoreListQuery {
        HighscoreListQuery {
            limit: limit.map(Into::into),
            offset: offset.map(Into::into),
            user_id: user_id.map(Into::into),
        }
    }

    #[tokio::test]
    async fn rank_counts_strictly_higher_scores() {
        let state = app_state();
        submit(&state, "u1", "Ann", 1000).await;
        submit(&state, "u2", "Bob", 1500).await;

        let ann = user_best_highscore(&state, "u1").await.unwrap();
        assert_eq!(ann.highscore.score, 1000);
        assert_eq!(ann.rank, 2);

        let bob = user_best_highscore(&state, "u2").await.unwrap();
        assert_eq!(bob.rank, 1);

        submit(&state, "u3", "Cid", 1500).await;
        assert_eq!(user_best_highscore(&state, "u2").await.unwrap().rank, 1);
        assert_eq!(user_best_highscore(&state, "u1").await.unwrap().rank, 3);
    }

    #[tokio::test]
    async fn best_highscore_of_unknown_user_is_not_found() {
        let state = app_state();
        submit(&state, "u1", "Ann", 10).await;

        assert!(matches!(
            user_best_highscore(&state, "ghost").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_is_sorted_and_paged() {
        let state = app_state();
        for (user, score) in [("u1", 300), ("u2", 900), ("u1", 600), ("u3", 100)] {
            submit(&state, user, "P", score).await;
        }

        let first = list_highscores(&state, list_query(Some("2"), None, None))
            .await
            .unwrap();
        let scores: Vec<i64> = first.highscores.iter().map(|h| h.score).collect();
        assert_eq!(scores, [900, 600]);
        assert_eq!(first.total_count, 4);
        assert!(first.has_more);

        let last = list_highscores(&state, list_query(Some("2"), Some("2"), None))
            .await
            .unwrap();
        let scores: Vec<i64> = last.highscores.iter().map(|h| h.score).collect();
        assert_eq!(scores, [300, 100]);
        assert!(!last.has_more);

        let mine = list_highscores(&state, list_query(None, None, Some("u1")))
            .await
            .unwrap();
        assert_eq!(mine.total_count, 2);
        assert_eq!(mine.limit, 10);
        assert!(mine.highscores.iter().all(|h| h.user_id == "u1"));
    }

    #[tokio::test]
    async fn saving_the_same_score_twice_keeps_both_records() {
        let state = app_state();
        let first = submit(&state, "u1", "Ann", 500).await;
        let second = submit(&state, "u1", "Ann", 500).await;
        assert_ne!(first, second);

        let page = list_highscores(&state, HighscoreListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn zero_score_is_rejected() {
        let state = app_state();
        let request: SaveHighscoreRequest =
            serde_json::from_value(json!({"userId": "u1", "playerName": "Ann", "score": 0}))
                .unwrap();

        assert!(matches!(
            save_highscore(&state, request).await,
            Err(ServiceError::InvalidInput { .. })
        ));
    }
}
