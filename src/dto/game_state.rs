use std::time::SystemTime;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{Card, Joker, PlayerStateEntity, TarotCard, UpsertOutcome},
    dto::{format_system_time, validation::validate_not_blank},
};

/// Full snapshot sent by the client; every field except `userId` falls back to its default.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SavePlayerStateRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub user_id: String,
    #[serde(default)]
    pub current_score: i64,
    #[serde(default)]
    pub current_blind: i32,
    #[serde(default)]
    pub money: i32,
    #[serde(default)]
    pub lives: i32,
    #[serde(default)]
    pub discards_left: i32,
    #[serde(default)]
    pub hands_left: i32,
    #[serde(default)]
    pub deck_cards: Vec<Card>,
    #[serde(default)]
    pub hand_cards: Vec<Card>,
    #[serde(default)]
    pub jokers: Vec<Joker>,
    #[serde(default)]
    pub tarot_cards_inventory: Vec<TarotCard>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub planet_levels: IndexMap<String, i32>,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub vouchers_owned: IndexSet<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub unlocked_content: IndexMap<String, IndexSet<String>>,
}

impl SavePlayerStateRequest {
    /// Build the record to persist, replacing every stored field.
    pub fn into_entity(self, now: SystemTime) -> PlayerStateEntity {
        PlayerStateEntity {
            id: None,
            user_id: self.user_id,
            current_score: self.current_score,
            current_blind: self.current_blind,
            money: self.money,
            lives: self.lives,
            discards_left: self.discards_left,
            hands_left: self.hands_left,
            deck_cards: self.deck_cards,
            hand_cards: self.hand_cards,
            jokers: self.jokers,
            tarot_cards_inventory: self.tarot_cards_inventory,
            planet_levels: self.planet_levels,
            vouchers_owned: self.vouchers_owned,
            unlocked_content: self.unlocked_content,
            last_played_timestamp: now,
        }
    }
}

/// Stored player state as returned to the client.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStateDto {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub current_score: i64,
    pub current_blind: i32,
    pub money: i32,
    pub lives: i32,
    pub discards_left: i32,
    pub hands_left: i32,
    pub deck_cards: Vec<Card>,
    pub hand_cards: Vec<Card>,
    pub jokers: Vec<Joker>,
    pub tarot_cards_inventory: Vec<TarotCard>,
    #[schema(value_type = Object)]
    pub planet_levels: IndexMap<String, i32>,
    #[schema(value_type = Vec<String>)]
    pub vouchers_owned: IndexSet<String>,
    #[schema(value_type = Object)]
    pub unlocked_content: IndexMap<String, IndexSet<String>>,
    /// RFC 3339 timestamp of the last save.
    pub last_played_timestamp: String,
}

impl From<PlayerStateEntity> for PlayerStateDto {
    fn from(entity: PlayerStateEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            current_score: entity.current_score,
            current_blind: entity.current_blind,
            money: entity.money,
            lives: entity.lives,
            discards_left: entity.discards_left,
            hands_left: entity.hands_left,
            deck_cards: entity.deck_cards,
            hand_cards: entity.hand_cards,
            jokers: entity.jokers,
            tarot_cards_inventory: entity.tarot_cards_inventory,
            planet_levels: entity.planet_levels,
            vouchers_owned: entity.vouchers_owned,
            unlocked_content: entity.unlocked_content,
            last_played_timestamp: format_system_time(entity.last_played_timestamp),
        }
    }
}

/// Result of a save: whether a new document was created or an existing one replaced.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavePlayerStateResponse {
    pub upserted_id: Option<String>,
    pub created: bool,
    pub matched: bool,
    pub modified: bool,
}

impl From<UpsertOutcome> for SavePlayerStateResponse {
    fn from(outcome: UpsertOutcome) -> Self {
        Self {
            created: outcome.created(),
            upserted_id: outcome.upserted_id,
            matched: outcome.matched,
            modified: outcome.modified,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletePlayerStateResponse {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn omitted_fields_default_to_empty() {
        let request: SavePlayerStateRequest =
            serde_json::from_value(json!({"userId": "u1", "currentScore": 500, "money": 10}))
                .unwrap();
        assert!(request.validate().is_ok());

        let entity = request.into_entity(SystemTime::UNIX_EPOCH);
        assert_eq!(entity.current_score, 500);
        assert_eq!(entity.money, 10);
        assert_eq!(entity.lives, 0);
        assert!(entity.deck_cards.is_empty());
        assert!(entity.jokers.is_empty());
        assert!(entity.tarot_cards_inventory.is_empty());
        assert!(entity.planet_levels.is_empty());
        assert!(entity.vouchers_owned.is_empty());
        assert!(entity.unlocked_content.is_empty());
    }

    #[test]
    fn blank_user_id_fails_validation() {
        let request: SavePlayerStateRequest =
            serde_json::from_value(json!({"userId": "  "})).unwrap();
        assert!(request.validate().is_err());

        assert!(serde_json::from_value::<SavePlayerStateRequest>(json!({"money": 3})).is_err());
    }

    #[test]
    fn dto_serialises_camel_case_with_rfc3339_timestamp() {
        let request: SavePlayerStateRequest = serde_json::from_value(json!({
            "userId": "u1",
            "planetLevels": {"FLUSH": 2},
            "vouchersOwned": ["overstock"],
            "unlockedContent": {"decks": ["red", "blue"]}
        }))
        .unwrap();
        let mut entity = request.into_entity(SystemTime::UNIX_EPOCH);
        entity.id = Some("65f0c0ffee0000000000beef".into());

        let body = serde_json::to_value(PlayerStateDto::from(entity)).unwrap();
        assert_eq!(body["_id"], json!("65f0c0ffee0000000000beef"));
        assert_eq!(body["userId"], json!("u1"));
        assert_eq!(body["planetLevels"], json!({"FLUSH": 2}));
        assert_eq!(body["vouchersOwned"], json!(["overstock"]));
        assert_eq!(body["unlockedContent"], json!({"decks": ["red", "blue"]}));
        assert_eq!(body["lastPlayedTimestamp"], json!("1970-01-01T00:00:00Z"));
        assert_eq!(body["deckCards"], json!([]));
    }
}
