//! Topic document and request/response bodies.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Patch;

/// Color given to a topic created without one.
pub const DEFAULT_TOPIC_COLOR: &str = "#000000";

/// A named group of words owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    pub user_id: ObjectId,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new topic.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateTopicRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for updating an existing topic.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateTopicRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub color: Patch<String>,
}

/// Topic as returned over HTTP.
#[derive(Debug, Clone, Serialize)]
pub struct TopicResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub user_id: String,
    /// Only filled in by the single-topic lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TopicResponse {
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = Some(word_count);
        self
    }
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id.to_hex(),
            name: topic.name,
            description: topic.description,
            color: topic.color,
            user_id: topic.user_id.to_hex(),
            word_count: None,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }
}
