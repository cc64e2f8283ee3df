use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::{
    dto::{
        envelope::ApiResponse,
        health::HealthResponse,
        info::{ApiInfo, RootResponse},
    },
    services::{health_service, info_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "Service and database are healthy", body = ApiResponse<HealthResponse>),
        (status = 503, description = "Database unreachable", body = ApiResponse<HealthResponse>)
    )
)]
/// Return the current health status of the backend and ping the database.
pub async fn healthcheck(
    State(state): State<SharedState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let health = health_service::health_status(&state).await;
    let healthy = health.is_healthy();

    let (status, message) = if healthy {
        (StatusCode::OK, "service is healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "service is degraded")
    };

    let body = ApiResponse {
        success: healthy,
        message: message.to_owned(),
        data: Some(health),
        error: None,
    };
    (status, Json(body))
}

#[utoipa::path(
    get,
    path = "/api/info",
    tag = "system",
    responses((status = 200, description = "API description", body = ApiResponse<ApiInfo>))
)]
/// Describe the API and list its endpoints.
pub async fn info() -> Json<ApiResponse<ApiInfo>> {
    Json(ApiResponse::success(
        "API information",
        info_service::api_info(),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(info_service::root())
}

/// Configure the system routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/", get(root))
        .route("/api/health", get(healthcheck))
        .route("/api/info", get(info))
}
