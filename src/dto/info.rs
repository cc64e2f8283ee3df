use serde::Serialize;
use utoipa::ToSchema;

/// Static description of the API and its endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: EndpointGroups,
    pub timestamp: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointGroups {
    pub game_state: Vec<String>,
    pub highscores: Vec<String>,
    pub system: Vec<String>,
}

/// Payload of the bare `/` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}
