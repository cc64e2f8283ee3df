use std::time::SystemTime;

use crate::dto::{
    format_system_time,
    info::{ApiInfo, EndpointGroups, RootResponse},
};

const API_NAME: &str = "Balatro Game Backend API";
const API_DESCRIPTION: &str = "Persists Balatro game states and highscores";

fn endpoints(routes: &[&str]) -> Vec<String> {
    routes.iter().map(|route| (*route).to_owned()).collect()
}

/// Static listing of the public endpoints.
pub fn api_info() -> ApiInfo {
    ApiInfo {
        name: API_NAME.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        description: API_DESCRIPTION.to_owned(),
        endpoints: EndpointGroups {
            game_state: endpoints(&[
                "POST /api/game-state",
                "GET /api/game-state/{userId}",
                "DELETE /api/game-state/{userId}",
            ]),
            highscores: endpoints(&[
                "POST /api/highscores",
                "GET /api/highscores",
                "GET /api/highscores/user/{userId}",
            ]),
            system: endpoints(&["GET /api/health", "GET /api/info", "GET /docs"]),
        },
        timestamp: format_system_time(SystemTime::now()),
    }
}

pub fn root() -> RootResponse {
    RootResponse {
        message: API_NAME.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        status: "running".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_lists_every_group() {
        let info = api_info();
        assert_eq!(info.name, "Balatro Game Backend API");
        assert_eq!(info.endpoints.game_state.len(), 3);
        assert!(info.endpoints.highscores.contains(&"GET /api/highscores".to_owned()));
        assert!(info.endpoints.system.contains(&"GET /api/health".to_owned()));
    }
}
