//! In-memory repositories used by the test suite.
//!
//! They honour the same contracts as the MongoDB ones, including the unique
//! email constraint, so services can be exercised without a running store.

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::repository::{TopicRepository, UserRepository, WordFilter, WordRepository};
use crate::errors::AppError;
use crate::models::{Topic, User, Word};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("record already exists".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| &u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.clone())
    }

    async fn set_tokens(
        &self,
        id: &ObjectId,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| &u.id == id) {
            user.token = token.to_string();
            user.refresh_token = refresh_token.to_string();
            user.updated_at = updated_at;
        }
        Ok(())
    }

    async fn replace(&self, user: &User) -> Result<(), AppError> {
        if let Some(slot) = self
            .users
            .write()
            .await
            .iter_mut()
            .find(|u| u.id == user.id)
        {
            *slot = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.users.write().await.retain(|u| &u.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTopicRepository {
    topics: RwLock<Vec<Topic>>,
}

#[async_trait]
impl TopicRepository for MemoryTopicRepository {
    async fn create(&self, topic: &Topic) -> Result<(), AppError> {
        self.topics.write().await.push(topic.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Topic>, AppError> {
        Ok(self.topics.read().await.iter().find(|t| &t.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Topic>, AppError> {
        Ok(self.topics.read().await.clone())
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> Result<Vec<Topic>, AppError> {
        Ok(self
            .topics
            .read()
            .await
            .iter()
            .filter(|t| &t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn replace(&self, topic: &Topic) -> Result<(), AppError> {
        if let Some(slot) = self
            .topics
            .write()
            .await
            .iter_mut()
            .find(|t| t.id == topic.id)
        {
            *slot = topic.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.topics.write().await.retain(|t| &t.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryWordRepository {
    words: RwLock<Vec<Word>>,
}

impl MemoryWordRepository {
    pub async fn count(&self) -> usize {
        self.words.read().await.len()
    }
}

#[async_trait]
impl WordRepository for MemoryWordRepository {
    async fn create(&self, word: &Word) -> Result<(), AppError> {
        self.words.write().await.push(word.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Word>, AppError> {
        Ok(self.words.read().await.iter().find(|w| &w.id == id).cloned())
    }

    async fn find(&self, filter: &WordFilter) -> Result<Vec<Word>, AppError> {
        Ok(self
            .words
            .read()
            .await
            .iter()
            .filter(|w| matches(filter, w))
            .cloned()
            .collect())
    }

    async fn replace(&self, word: &Word) -> Result<(), AppError> {
        if let Some(slot) = self
            .words
            .write()
            .await
            .iter_mut()
            .find(|w| w.id == word.id)
        {
            *slot = word.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.words.write().await.retain(|w| &w.id != id);
        Ok(())
    }
}

/// In-process equivalent of `WordFilter::to_document`.
fn matches(filter: &WordFilter, word: &Word) -> bool {
    filter.topic_id.map_or(true, |id| word.topic_id == id)
        && filter.word.as_ref().map_or(true, |w| &word.word == w)
        && filter.is_true.map_or(true, |flag| word.is_true == flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_word(topic_id: ObjectId, text: &str, is_true: bool) -> Word {
        let now = Utc::now();
        Word {
            id: ObjectId::new(),
            topic_id,
            user_id: ObjectId::new(),
            word: text.to_string(),
            definition: "definition".to_string(),
            example: None,
            word_type: "noun".to_string(),
            is_true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches(
            &WordFilter::default(),
            &sample_word(ObjectId::new(), "apple", false)
        ));
    }

    #[test]
    fn test_matches_is_conjunctive() {
        let topic_id = ObjectId::new();
        let filter = WordFilter {
            topic_id: Some(topic_id),
            word: Some("apple".to_string()),
            is_true: Some(true),
        };

        assert!(matches(&filter, &sample_word(topic_id, "apple", true)));
        assert!(!matches(&filter, &sample_word(topic_id, "apple", false)));
        assert!(!matches(&filter, &sample_word(topic_id, "pear", true)));
        assert!(!matches(&filter, &sample_word(ObjectId::new(), "apple", true)));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = MemoryUserRepository::default();
        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: "a@example.com".to_string(),
            phone: "1".to_string(),
            password: "hash".to_string(),
            token: String::new(),
            refresh_token: String::new(),
            user_type: "user".to_string(),
            created_at: now,
            updated_at: now,
        };
        repo.create(&user).await.unwrap();

        let duplicate = User {
            id: ObjectId::new(),
            ..user
        };
        assert!(matches!(
            repo.create(&duplicate).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}
