use indexmap::{IndexMap, IndexSet};
use mongodb::bson::{Bson, DateTime, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::dao::models::{Card, HighscoreEntity, Joker, PlayerStateEntity, TarotCard};

/// Stored shape of a player state. Field names are shared with documents written by earlier deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoPlayerStateDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
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
    #[serde(default, deserialize_with = "null_as_default")]
    pub deck_cards: Vec<Card>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hand_cards: Vec<Card>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub jokers: Vec<Joker>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tarot_cards_inventory: Vec<TarotCard>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub planet_levels: IndexMap<String, i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vouchers_owned: IndexSet<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unlocked_content: IndexMap<String, IndexSet<String>>,
    pub last_played_timestamp: DateTime,
}

/// Stored shape of a highscore record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoHighscoreDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub player_name: String,
    pub score: i64,
    pub date_achieved: DateTime,
    #[serde(default)]
    pub final_blind: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub jokers_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

/// Earlier writers stored absent collections as `null`; read those back as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<PlayerStateEntity> for MongoPlayerStateDocument {
    fn from(value: PlayerStateEntity) -> Self {
        Self {
            id: value
                .id
                .as_deref()
                .and_then(|id| ObjectId::parse_str(id).ok()),
            user_id: value.user_id,
            current_score: value.current_score,
            current_blind: value.current_blind,
            money: value.money,
            lives: value.lives,
            discards_left: value.discards_left,
            hands_left: value.hands_left,
            deck_cards: value.deck_cards,
            hand_cards: value.hand_cards,
            jokers: value.jokers,
            tarot_cards_inventory: value.tarot_cards_inventory,
            planet_levels: value.planet_levels,
            vouchers_owned: value.vouchers_owned,
            unlocked_content: value.unlocked_content,
            last_played_timestamp: DateTime::from_system_time(value.last_played_timestamp),
        }
    }
}

impl From<MongoPlayerStateDocument> for PlayerStateEntity {
    fn from(value: MongoPlayerStateDocument) -> Self {
        Self {
            id: value.id.map(|id| id.to_hex()),
            user_id: value.user_id,
            current_score: value.current_score,
            current_blind: value.current_blind,
            money: value.money,
            lives: value.lives,
            discards_left: value.discards_left,
            hands_left: value.hands_left,
            deck_cards: value.deck_cards,
            hand_cards: value.hand_cards,
            jokers: value.jokers,
            tarot_cards_inventory: value.tarot_cards_inventory,
            planet_levels: value.planet_levels,
            vouchers_owned: value.vouchers_owned,
            unlocked_content: value.unlocked_content,
            last_played_timestamp: value.last_played_timestamp.to_system_time(),
        }
    }
}

impl From<HighscoreEntity> for MongoHighscoreDocument {
    fn from(value: HighscoreEntity) -> Self {
        Self {
            id: value
                .id
                .as_deref()
                .and_then(|id| ObjectId::parse_str(id).ok()),
            user_id: value.user_id,
            player_name: value.player_name,
            score: value.score,
            date_achieved: DateTime::from_system_time(value.date_achieved),
            final_blind: value.final_blind,
            jokers_used: value.jokers_used,
            seed: value.seed.filter(|seed| !seed.is_empty()),
        }
    }
}

impl From<MongoHighscoreDocument> for HighscoreEntity {
    fn from(value: MongoHighscoreDocument) -> Self {
        Self {
            id: value.id.map(|id| id.to_hex()),
            user_id: value.user_id,
            player_name: value.player_name,
            score: value.score,
            date_achieved: value.date_achieved.to_system_time(),
            final_blind: value.final_blind,
            jokers_used: value.jokers_used,
            seed: value.seed.filter(|seed| !seed.is_empty()),
        }
    }
}

/// Filter selecting the documents of `user_id`.
pub fn by_user(user_id: &str) -> Document {
    doc! { "userId": user_id }
}

/// Filter selecting every highscore, or only those of `user_id`.
pub fn highscore_filter(user_id: Option<&str>) -> Document {
    user_id.map(by_user).unwrap_or_default()
}

/// Leaderboard ordering: best score first, most recent first among equal scores.
pub fn leaderboard_sort() -> Document {
    doc! { "score": -1, "dateAchieved": -1 }
}

/// Hex form of a generated `_id`, when it is an `ObjectId`.
pub fn object_id_hex(id: &Bson) -> Option<String> {
    id.as_object_id().map(|oid| oid.to_hex())
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use mongodb::bson;

    use super::*;

    fn highscore(seed: Option<&str>) -> HighscoreEntity {
        HighscoreEntity {
            id: None,
            user_id: "u1".into(),
            player_name: "Ann".into(),
            score: 1_000,
            date_achieved: SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            final_blind: 8,
            jokers_used: vec!["joker_greedy".into()],
            seed: seed.map(Into::into),
        }
    }

    #[test]
    fn highscore_document_uses_camel_case_fields() {
        let document = bson::serialize_to_document(&MongoHighscoreDocument::from(highscore(
            Some("ABC123"),
        )))
        .unwrap();

        let keys: Vec<_> = document.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "userId",
                "playerName",
                "score",
                "dateAchieved",
                "finalBlind",
                "jokersUsed",
                "seed"
            ]
        );
        assert!(document.get_datetime("dateAchieved").is_ok());
    }

    #[test]
    fn empty_seed_is_not_stored() {
        let document =
            bson::serialize_to_document(&MongoHighscoreDocument::from(highscore(Some(""))))
                .unwrap();
        assert!(!document.contains_key("seed"));
    }

    #[test]
    fn legacy_player_state_with_nulls_reads_as_empty() {
        let stored = doc! {
            "_id": ObjectId::new(),
            "userId": "u1",
            "currentScore": 500_i64,
            "money": 10,
            "deckCards": Bson::Null,
            "handCards": Bson::Null,
            "jokers": Bson::Null,
            "tarotCardsInventory": [],
            "planetLevels": Bson::Null,
            "vouchersOwned": [],
            "unlockedContent": {},
            "lastPlayedTimestamp": DateTime::now(),
        };

        let document: MongoPlayerStateDocument = bson::deserialize_from_document(stored).unwrap();
        let entity = PlayerStateEntity::from(document);

        assert_eq!(entity.current_score, 500);
        assert_eq!(entity.money, 10);
        assert!(entity.deck_cards.is_empty());
        assert!(entity.jokers.is_empty());
        assert!(entity.planet_levels.is_empty());
        assert_eq!(entity.id.as_deref().map(str::len), Some(24));
    }

    #[test]
    fn filters_and_sort() {
        assert_eq!(highscore_filter(None), Document::new());
        assert_eq!(highscore_filter(Some("u1")), doc! { "userId": "u1" });
        let sort = leaderboard_sort();
        let keys: Vec<_> = sort.keys().map(String::as_str).collect();
        assert_eq!(keys, ["score", "dateAchieved"]);
    }
}
