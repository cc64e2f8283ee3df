use axum::{
    Router,
    extract::{FromRequest, FromRequestParts},
    http::{Method, Uri},
};

use crate::{error::AppError, state::SharedState};

pub mod docs;
pub mod game_state;
pub mod health;
pub mod highscore;

/// JSON body extractor whose rejections render as the standard error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with enveloped rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameter extractor with enveloped rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game_state::router())
        .merge(highscore::router());

    let docs_router = docs::router(state.clone());

    api_router
        .merge(docs_router)
        .fallback(unknown_route)
        .with_state(state)
}

async fn unknown_route(method: Method, uri: Uri) -> AppError {
    AppError::unknown_route(method.as_str(), uri.path())
}
