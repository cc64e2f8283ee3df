use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        envelope::{ApiResponse, NoData},
        highscore::{
            HighscoreListQuery, HighscoreListResponse, SaveHighscoreRequest,
            SaveHighscoreResponse, UserHighscoreResponse,
        },
    },
    error::AppError,
    routes::{ApiJson, ApiPath, ApiQuery},
    services::highscore_service,
    state::SharedState,
};

/// Highscore and leaderboard endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/highscores", get(list_highscores).post(save_highscore))
        .route("/api/highscores/user/{user_id}", get(user_highscore))
}

/// Record the score of a finished run.
#[utoipa::path(
    post,
    path = "/api/highscores",
    tag = "highscores",
    request_body = SaveHighscoreRequest,
    responses(
        (status = 201, description = "Highscore recorded", body = ApiResponse<SaveHighscoreResponse>),
        (status = 400, description = "Malformed body or missing fields", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn save_highscore(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<SaveHighscoreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SaveHighscoreResponse>>), AppError> {
    let saved = highscore_service::save_highscore(&state, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("highscore saved successfully", saved)),
    ))
}

/// Leaderboard page ordered by score, newest first on ties.
#[utoipa::path(
    get,
    path = "/api/highscores",
    tag = "highscores",
    params(HighscoreListQuery),
    responses(
        (status = 200, description = "Leaderboard page", body = ApiResponse<HighscoreListResponse>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn list_highscores(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<HighscoreListQuery>,
) -> Result<Json<ApiResponse<HighscoreListResponse>>, AppError> {
    let page = highscore_service::list_highscores(&state, query).await?;
    Ok(Json(ApiResponse::success(
        "highscores loaded successfully",
        page,
    )))
}

/// Best score of a user together with its global rank.
#[utoipa::path(
    get,
    path = "/api/highscores/user/{user_id}",
    tag = "highscores",
    params(("user_id" = String, Path, description = "Player whose best score is requested")),
    responses(
        (status = 200, description = "Best highscore and rank", body = ApiResponse<UserHighscoreResponse>),
        (status = 404, description = "User has no highscore", body = ApiResponse<NoData>),
        (status = 500, description = "Storage failure", body = ApiResponse<NoData>)
    )
)]
pub async fn user_highscore(
    State(state): State<SharedState>,
    ApiPath(user_id): ApiPath<String>,
) -> Result<Json<ApiResponse<UserHighscoreResponse>>, AppError> {
    let best = highscore_service::user_best_highscore(&state, &user_id).await?;
    Ok(Json(ApiResponse::success(
        "user highscore loaded successfully",
        best,
    )))
}
