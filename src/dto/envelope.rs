use serde::Serialize;
use utoipa::ToSchema;

/// Uniform wrapper around every API response.
///
/// `data` is only present on success; `error` only on failures that carry a lower-level cause.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Stable, user-facing summary of the outcome.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload type of failures, which never carry `data`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn failure_omits_data() {
        let body = serde_json::to_value(ApiResponse::<u8>::failure(
            "failed to save game state",
            Some("connection reset".into()),
        ))
        .unwrap();
        assert_eq!(
            body,
            json!({"success": false, "message": "failed to save game state", "error": "connection reset"})
        );

        let bare = serde_json::to_value(ApiResponse::<u8>::failure("game state not found", None))
            .unwrap();
        assert_eq!(bare, json!({"success": false, "message": "game state not found"}));
    }

    #[test]
    fn success_carries_data_without_error() {
        let body = serde_json::to_value(ApiResponse::success("ok", json!({"rank": 2}))).unwrap();
        assert_eq!(body, json!({"success": true, "message": "ok", "data": {"rank": 2}}));
    }
}
