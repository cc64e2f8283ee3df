/// OpenAPI documentation generation.
pub mod documentation;
/// Player state persistence.
pub mod game_state_service;
/// Health check service.
pub mod health_service;
/// Highscore log and leaderboard queries.
pub mod highscore_service;
/// Static API description.
pub mod info_service;

use crate::error::ServiceError;

/// Reject a blank `userId` path parameter.
pub(crate) fn require_user_id(user_id: &str) -> Result<(), ServiceError> {
    if user_id.trim().is_empty() {
        return Err(ServiceError::InvalidInput {
            message: "userId parameter is required".into(),
            cause: None,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_user_id_is_invalid_input() {
        assert!(require_user_id("u1").is_ok());
        assert!(matches!(
            require_user_id(" \t"),
            Err(ServiceError::InvalidInput { .. })
        ));
    }
}
