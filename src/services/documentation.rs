use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the Balatro backend.
#[openapi(
    info(title = "Balatro Game Backend API"),
    paths(
        crate::routes::health::root,
        crate::routes::health::healthcheck,
        crate::routes::health::info,
        crate::routes::game_state::save_game_state,
        crate::routes::game_state::load_game_state,
        crate::routes::game_state::delete_game_state,
        crate::routes::highscore::save_highscore,
        crate::routes::highscore::list_highscores,
        crate::routes::highscore::user_highscore,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::info::ApiInfo,
            crate::dto::info::RootResponse,
            crate::dto::game_state::SavePlayerStateRequest,
            crate::dto::game_state::PlayerStateDto,
            crate::dto::game_state::SavePlayerStateResponse,
            crate::dto::game_state::DeletePlayerStateResponse,
            crate::dto::highscore::SaveHighscoreRequest,
            crate::dto::highscore::HighscoreDto,
            crate::dto::highscore::HighscoreListResponse,
            crate::dto::highscore::UserHighscoreResponse,
            crate::dao::models::Card,
            crate::dao::models::Joker,
            crate::dao::models::TarotCard,
        )
    ),
    tags(
        (name = "system", description = "Health, info and service banner"),
        (name = "game-state", description = "Per-user game state persistence"),
        (name = "highscores", description = "Highscore log and leaderboard"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/api/health",
            "/api/info",
            "/api/game-state",
            "/api/game-state/{user_id}",
            "/api/highscores",
            "/api/highscores/user/{user_id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
