//! Repository ports, one per collection.
//!
//! Services only see these traits. `mongo` provides the store-backed
//! implementations; tests swap in the in-memory ones from `memory`.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::{Topic, User, Word};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A duplicate email yields `AppError::Conflict`.
    async fn create(&self, user: &User) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    /// Overwrite the stored token pair. Empty strings clear them.
    async fn set_tokens(
        &self,
        id: &ObjectId,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Replace the whole document.
    async fn replace(&self, user: &User) -> Result<(), AppError>;

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError>;
}

#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn create(&self, topic: &Topic) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Topic>, AppError>;

    async fn find_all(&self) -> Result<Vec<Topic>, AppError>;

    async fn find_by_user(&self, user_id: &ObjectId) -> Result<Vec<Topic>, AppError>;

    async fn replace(&self, topic: &Topic) -> Result<(), AppError>;

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError>;
}

#[async_trait]
pub trait WordRepository: Send + Sync {
    async fn create(&self, word: &Word) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Word>, AppError>;

    /// All words matching every present field of `filter`.
    async fn find(&self, filter: &WordFilter) -> Result<Vec<Word>, AppError>;

    async fn replace(&self, word: &Word) -> Result<(), AppError>;

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError>;
}

/// Conjunctive word filter. `None` fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFilter {
    pub topic_id: Option<ObjectId>,
    pub word: Option<String>,
    pub is_true: Option<bool>,
}

impl WordFilter {
    pub fn for_topic(topic_id: ObjectId) -> Self {
        Self {
            topic_id: Some(topic_id),
            ..Self::default()
        }
    }

    /// Store filter document.
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(topic_id) = &self.topic_id {
            filter.insert("topic_id", *topic_id);
        }
        if let Some(word) = &self.word {
            filter.insert("word", word.as_str());
        }
        if let Some(is_true) = self.is_true {
            filter.insert("is_true", is_true);
        }
        filter
    }
}

/// Filter selecting a document by its identifier.
pub fn by_id(id: &ObjectId) -> Document {
    doc! { "_id": *id }
}
