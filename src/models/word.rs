//! Word (flashcard) document and request/response bodies.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

use super::Patch;

/// A single flashcard entry inside a topic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Word {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub topic_id: ObjectId,
    pub user_id: ObjectId,
    pub word: String,
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub word_type: String,
    #[serde(default)]
    pub is_true: bool,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a word.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateWordRequest {
    #[serde(default)]
    pub topic_id: String,
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub word_type: String,
}

/// Request body for updating a word.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateWordRequest {
    #[serde(default)]
    pub word: Patch<String>,
    #[serde(default)]
    pub definition: Patch<String>,
    #[serde(default)]
    pub example: Patch<String>,
    #[serde(default)]
    pub word_type: Patch<String>,
    #[serde(default)]
    pub is_true: Patch<bool>,
}

/// Query string for `GET /api/v1/word`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchWordQuery {
    pub topic_id: Option<String>,
    pub word: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_true: Option<bool>,
}

/// Query string for `GET /api/v1/word/topic/{topic_id}`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TopicWordQuery {
    pub word: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_true: Option<bool>,
}

/// Query flag where an empty value (`?is_true=`) means "not given".
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid is_true value: {:?}", raw))),
        _ => Ok(None),
    }
}

/// Word as returned over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct WordResponse {
    pub id: String,
    pub topic_id: String,
    pub user_id: String,
    pub word: String,
    pub definition: String,
    pub example: Option<String>,
    pub word_type: String,
    pub is_true: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Word> for WordResponse {
    fn from(word: Word) -> Self {
        Self {
            id: word.id.to_hex(),
            topic_id: word.topic_id.to_hex(),
            user_id: word.user_id.to_hex(),
            word: word.word,
            definition: word.definition,
            example: word.example,
            word_type: word.word_type,
            is_true: word.is_true,
            created_at: word.created_at,
            updated_at: word.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_true_is_no_filter() {
        let query: TopicWordQuery = serde_json::from_str(r#"{"is_true": ""}"#).unwrap();
        assert_eq!(query.is_true, None);

        let query: SearchWordQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.is_true, None);
    }

    #[test]
    fn test_is_true_parses_flag() {
        let query: TopicWordQuery = serde_json::from_str(r#"{"is_true": "true"}"#).unwrap();
        assert_eq!(query.is_true, Some(true));

        let query: SearchWordQuery = serde_json::from_str(r#"{"is_true": "false"}"#).unwrap();
        assert_eq!(query.is_true, Some(false));

        assert!(serde_json::from_str::<TopicWordQuery>(r#"{"is_true": "maybe"}"#).is_err());
    }
}
