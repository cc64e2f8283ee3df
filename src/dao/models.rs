use std::time::SystemTime;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Suit of a playing card.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

/// Rank of a playing card, serialised the way the game client writes it (`"2"`..`"10"`, `"JACK"`..`"ACE"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub enum CardValue {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "JACK")]
    Jack,
    #[serde(rename = "QUEEN")]
    Queen,
    #[serde(rename = "KING")]
    King,
    #[serde(rename = "ACE")]
    Ace,
}

/// Playing card embedded in a deck or a hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Card {
    pub suit: Suit,
    pub value: CardValue,
    /// Ordered enhancement tags (e.g. "foil", "glass").
    #[serde(default)]
    pub enhancements: Vec<String>,
}

/// Loosely typed joker statistic value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<StatValue>),
}

/// Joker owned by the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Joker {
    pub id: String,
    #[serde(default)]
    pub level: i32,
    /// Stored as `is_active` to stay compatible with the game client and existing documents.
    #[serde(rename = "is_active", alias = "isActive", default)]
    pub is_active: bool,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub stats: IndexMap<String, StatValue>,
}

/// Tarot card stack held in the player's inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TarotCard {
    pub id: String,
    #[serde(default)]
    pub quantity: u32,
}

/// Snapshot of a single player's run, one per `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStateEntity {
    /// Identity assigned by the store on first insert.
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
    /// Poker hand name to upgrade level.
    pub planet_levels: IndexMap<String, i32>,
    pub vouchers_owned: IndexSet<String>,
    /// Content category to unlocked identifiers.
    pub unlocked_content: IndexMap<String, IndexSet<String>>,
    /// Stamped on every write.
    pub last_played_timestamp: SystemTime,
}

/// Append-only leaderboard record.
#[derive(Debug, Clone, PartialEq)]
pub struct HighscoreEntity {
    /// Identity assigned by the store on insert.
    pub id: Option<String>,
    pub user_id: String,
    pub player_name: String,
    pub score: i64,
    pub date_achieved: SystemTime,
    pub final_blind: i32,
    pub jokers_used: Vec<String>,
    pub seed: Option<String>,
}

/// Outcome of a keyed upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Identity of the freshly inserted document, when the upsert created one.
    pub upserted_id: Option<String>,
    pub matched: bool,
    pub modified: bool,
}

impl UpsertOutcome {
    /// Whether the upsert inserted a new document instead of replacing one.
    pub fn created(&self) -> bool {
        self.upserted_id.is_some()
    }
}

/// Page request against the highscore collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighscoreQuery {
    pub user_id: Option<String>,
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_uses_client_spelling() {
        let card = Card {
            suit: Suit::Hearts,
            value: CardValue::Ten,
            enhancements: vec!["foil".into()],
        };
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"suit": "HEARTS", "value": "10", "enhancements": ["foil"]})
        );

        let face: Card = serde_json::from_str(r#"{"suit":"CLUBS","value":"QUEEN"}"#).unwrap();
        assert_eq!(face.value, CardValue::Queen);
        assert!(face.enhancements.is_empty());
    }

    #[test]
    fn unknown_suit_is_rejected() {
        assert!(serde_json::from_str::<Card>(r#"{"suit":"STARS","value":"2"}"#).is_err());
        assert!(serde_json::from_str::<Card>(r#"{"suit":"CLUBS","value":"1"}"#).is_err());
    }

    #[test]
    fn joker_accepts_both_active_spellings() {
        let snake: Joker =
            serde_json::from_str(r#"{"id":"red_card","level":1,"is_active":true,"stats":{}}"#)
                .unwrap();
        let camel: Joker =
            serde_json::from_str(r#"{"id":"red_card","level":1,"isActive":true}"#).unwrap();
        assert_eq!(snake, camel);

        let json = serde_json::to_value(&snake).unwrap();
        assert_eq!(json["is_active"], serde_json::json!(true));
    }

    #[test]
    fn joker_stats_keep_their_variant() {
        let joker: Joker = serde_json::from_str(
            r#"{"id":"j","level":2,"is_active":false,
                "stats":{"mult":4,"ratio":1.5,"name":"greedy","on":true,"hits":[1,"x"]}}"#,
        )
        .unwrap();

        assert_eq!(joker.stats["mult"], StatValue::Integer(4));
        assert_eq!(joker.stats["ratio"], StatValue::Number(1.5));
        assert_eq!(joker.stats["name"], StatValue::Text("greedy".into()));
        assert_eq!(joker.stats["on"], StatValue::Bool(true));
        assert_eq!(
            joker.stats["hits"],
            StatValue::List(vec![StatValue::Integer(1), StatValue::Text("x".into())])
        );
        assert_eq!(
            joker.stats.keys().collect::<Vec<_>>(),
            ["mult", "ratio", "name", "on", "hits"]
        );
    }

    #[test]
    fn upsert_outcome_reports_creation() {
        let created = UpsertOutcome {
            upserted_id: Some("abc".into()),
            matched: false,
            modified: false,
        };
        let replaced = UpsertOutcome {
            upserted_id: None,
            matched: true,
            modified: true,
        };
        assert!(created.created());
        assert!(!replaced.created());
    }
}
