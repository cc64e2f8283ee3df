//! Save, load and delete the per-user game state snapshot.

use std::time::SystemTime;

use tracing::{debug, info};
use validator::Validate;

use crate::{
    dao::storage,
    dto::game_state::{
        DeletePlayerStateResponse, PlayerStateDto, SavePlayerStateRequest,
        SavePlayerStateResponse,
    },
    error::ServiceError,
    services::require_user_id,
    state::SharedState,
};

/// Replace (or create) the stored state of `request.user_id` with the request's fields.
pub async fn save_player_state(
    state: &SharedState,
    request: SavePlayerStateRequest,
) -> Result<SavePlayerStateResponse, ServiceError> {
    request.validate()?;

    let entity = request.into_entity(SystemTime::now());
    let user_id = entity.user_id.clone();

    let outcome = storage::bounded(
        "save player state",
        state.operation_timeout(),
        state.game_store().save_player_state(entity),
    )
    .await
    .map_err(ServiceError::persistence("failed to save game state"))?;

    info!(user_id = %user_id, created = outcome.created(), "game state saved");
    Ok(outcome.into())
}

/// Fetch the stored state of `user_id`.
pub async fn load_player_state(
    state: &SharedState,
    user_id: &str,
) -> Result<PlayerStateDto, ServiceError> {
    require_user_id(user_id)?;

    let found = storage::bounded(
        "find player state",
        state.operation_timeout(),
        state.game_store().find_player_state(user_id.to_owned()),
    )
    .await
    .map_err(ServiceError::persistence("failed to load game state"))?;

    let Some(entity) = found else {
        debug!(user_id = %user_id, "no game state stored");
        return Err(ServiceError::NotFound("game state not found".into()));
    };

    Ok(entity.into())
}

/// Delete the stored state of `user_id`.
pub async fn delete_player_state(
    state: &SharedState,
    user_id: &str,
) -> Result<DeletePlayerStateResponse, ServiceError> {
    require_user_id(user_id)?;

    let deleted_count = storage::bounded(
        "delete player state",
        state.operation_timeout(),
        state.game_store().delete_player_state(user_id.to_owned()),
    )
    .await
    .map_err(ServiceError::persistence("failed to delete game state"))?;

    if deleted_count == 0 {
        return Err(ServiceError::NotFound("no game state to delete".into()));
    }

    info!(user_id = %user_id, "game state deleted");
    Ok(DeletePlayerStateResponse { deleted_count })
}
