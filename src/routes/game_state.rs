use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        envelope::{ApiResponse, NoData},
        game_state::{
            DeletePlayerStateResponse, PlayerStateDto, SavePlayerStateRequest,
            SavePlayerStateResponse,
        },
    },
    error::AppError,
    routes::{ApiJson, ApiPath},
    services::game_state_service,
    state::SharedState,
};

/// Player state endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/game-state", post(save_game_state))
        .route(
            "/api/game-state/{user_id}",
            get(load_game_state).delete(delete_game_state),
        )
}

/// Save the full game state of a user, replacing any previous snapshot.
#[utoipa::path(
    post,
    path = "/api/game-state",
    tag = "game-state",
    request_body = SavePlayerStateRequest,
    responses(
        (status = 200, description = "State saved", body = ApiResponse<SavePlayerStateResponse>),
        (status = 400, description = "Malformed body or missing userId", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn save_game_state(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SavePlayerStateRequest>,
) -> Result<Json<ApiResponse<SavePlayerStateResponse>>, AppError> {
    let saved = game_state_service::save_player_state(&state, request).await?;
    Ok(Json(ApiResponse::success(
        "game state saved successfully",
        saved,
    )))
}

/// Load the stored game state of a user.
#[utoipa::path(
    get,
    path = "/api/game-state/{user_id}",
    tag = "game-state",
    params(("user_id" = String, Path, description = "Owner of the game state")),
    responses(
        (status = 200, description = "Stored state", body = ApiResponse<PlayerStateDto>),
        (status = 404, description = "No state stored for this user", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn load_game_state(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<ApiResponse<PlayerStateDto>>, AppError> {
    let loaded = game_state_service::load_player_state(&state, &user_id).await?;
    Ok(Json(ApiResponse::success(
        "game state loaded successfully",
        loaded,
    )))
}

/// Delete the stored game state of a user.
#[utoipa::path(
    delete,
    path = "/api/game-state/{user_id}",
    tag = "game-state",
    params(("user_id" = String, Path, description = "Owner of the game state")),
    responses(
        (status = 200, description = "State deleted", body = ApiResponse<DeletePlayerStateResponse>),
        (status = 404, description = "No state stored for this user", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn delete_game_state(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<ApiResponse<DeletePlayerStateResponse>>, AppError> {
    let deleted = game_state_service::delete_player_state(&state, &user_id).await?;
    Ok(Json(ApiResponse::success(
        "game state deleted successfully",
        deleted,
    )))
}
