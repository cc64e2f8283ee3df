use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    dao::models::HighscoreEntity,
    dto::{
        format_system_time,
        validation::{validate_non_zero, validate_not_blank},
    },
};

/// Page size used when the client sends none or an unusable one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Score submitted at the end of a run.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveHighscoreRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_id: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub player_name: String,
    #[validate(custom(function = "validate_non_zero"))]
    pub score: i64,
    #[serde(default)]
    pub final_blind: i32,
    #[serde(default)]
    pub jokers_used: Vec<String>,
    #[serde(default)]
    pub seed: Option<String>,
}

impl SaveHighscoreRequest {
    pub fn into_entity(self, now: SystemTime) -> HighscoreEntity {
        HighscoreEntity {
            id: None,
            user_id: self.user_id,
            player_name: self.player_name,
            score: self.score,
            date_achieved: now,
            final_blind: self.final_blind,
            jokers_used: self.jokers_used,
            seed: self.seed.filter(|seed| !seed.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighscoreDto {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub player_name: String,
    pub score: i64,
    /// RFC 3339 timestamp of the insert.
    pub date_achieved: String,
    pub final_blind: i32,
    pub jokers_used: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl From<HighscoreEntity> for HighscoreDto {
    fn from(entity: HighscoreEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            player_name: entity.player_name,
            score: entity.score,
            date_achieved: format_system_time(entity.date_achieved),
            final_blind: entity.final_blind,
            jokers_used: entity.jokers_used,
            seed: entity.seed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveHighscoreResponse {
    pub inserted_id: String,
    pub score: i64,
}

/// Raw leaderboard query. Values are kept as text so unusable input falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HighscoreListQuery {
    /// Page size, 1 to 100 (default 10).
    pub limit: Option<String>,
    /// Number of records to skip (default 0).
    pub offset: Option<String>,
    /// Restrict the listing to one user.
    pub user_id: Option<String>,
}

/// Normalised paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl HighscoreListQuery {
    pub fn page(&self) -> Page {
        let limit = match parse_number(self.limit.as_deref()) {
            Some(limit) if limit < 1 => DEFAULT_PAGE_LIMIT,
            Some(limit) => limit.min(i64::from(MAX_PAGE_LIMIT)) as u32,
            None => DEFAULT_PAGE_LIMIT,
        };
        let offset = parse_number(self.offset.as_deref())
            .map(|offset| offset.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(0);

        Page { limit, offset }
    }

    pub fn user_filter(&self) -> Option<String> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|user_id| !user_id.is_empty())
            .map(str::to_owned)
    }
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HighscoreListResponse {
    pub highscores: Vec<HighscoreDto>,
    pub total_count: u64,
    pub limit: u32,
    pub offset: u32,
    pub has_more: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserHighscoreResponse {
    pub highscore: HighscoreDto,
    /// 1 + number of records, across all users, with a strictly greater score.
    pub rank: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> HighscoreListQuery {
        HighscoreListQuery {
            limit: limit.map(Into::into),
            offset: offset.map(Into::into),
            user_id: None,
        }
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(query(None, None).page(), Page { limit: 10, offset: 0 });
        assert_eq!(query(Some("200"), None).page().limit, 100);
        assert_eq!(query(Some("0"), None).page().limit, 10);
        assert_eq!(query(Some("-4"), None).page().limit, 10);
        assert_eq!(query(Some("ten"), None).page().limit, 10);
        assert_eq!(query(Some("1"), None).page().limit, 1);
        assert_eq!(query(Some("100"), None).page().limit, 100);
    }

    #[test]
    fn offset_is_clamped() {
        assert_eq!(query(None, Some("-1")).page().offset, 0);
        assert_eq!(query(None, Some("abc")).page().offset, 0);
        assert_eq!(query(None, Some("30")).page().offset, 30);
    }

    #[test]
    fn blank_user_filter_is_ignored() {
        let mut raw = query(None, None);
        raw.user_id = Some(" ".into());
        assert_eq!(raw.user_filter(), None);
        raw.user_id = Some("u1".into());
        assert_eq!(raw.user_filter().as_deref(), Some("u1"));
    }

    #[test]
    fn score_is_required_and_non_zero() {
        let missing = serde_json::from_value::<SaveHighscoreRequest>(
            json!({"userId": "u1", "playerName": "Ann"}),
        );
        assert!(missing.is_err());

        let zero: SaveHighscoreRequest =
            serde_json::from_value(json!({"userId": "u1", "playerName": "Ann", "score": 0}))
                .unwrap();
        assert!(zero.validate().is_err());

        let nameless: SaveHighscoreRequest =
            serde_json::from_value(json!({"userId": "u1", "playerName": "", "score": 5}))
                .unwrap();
        assert!(nameless.validate().is_err());
    }

    #[test]
    fn empty_seed_becomes_absent() {
        let request: SaveHighscoreRequest = serde_json::from_value(
            json!({"userId": "u1", "playerName": "Ann", "score": 1000, "seed": ""}),
        )
        .unwrap();
        let dto = HighscoreDto::from(request.into_entity(SystemTime::UNIX_EPOCH));
        let body = serde_json::to_value(dto).unwrap();
        assert!(body.get("seed").is_none());
        assert_eq!(body["jokersUsed"], json!([]));
        assert_eq!(body["dateAchieved"], json!("1970-01-01T00:00:00Z"));
    }
}
