//! MongoDB-backed repositories.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::Collection;

use super::repository::{by_id, TopicRepository, UserRepository, WordFilter, WordRepository};
use crate::errors::AppError;
use crate::models::{Topic, User, Word};

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(collection: Collection<User>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        self.collection.insert_one(user, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.collection.find_one(by_id(id), None).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .collection
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.collection.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn set_tokens(
        &self,
        id: &ObjectId,
        token: &str,
        refresh_token: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let update = doc! {
            "$set": {
                "token": token,
                "refresh_token": refresh_token,
                "updated_at": bson::DateTime::from_chrono(updated_at),
            }
        };
        self.collection.update_one(by_id(id), update, None).await?;
        Ok(())
    }

    async fn replace(&self, user: &User) -> Result<(), AppError> {
        self.collection
            .replace_one(by_id(&user.id), user, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.collection.delete_one(by_id(id), None).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoTopicRepository {
    collection: Collection<Topic>,
}

impl MongoTopicRepository {
    pub fn new(collection: Collection<Topic>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl TopicRepository for MongoTopicRepository {
    async fn create(&self, topic: &Topic) -> Result<(), AppError> {
        self.collection.insert_one(topic, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Topic>, AppError> {
        Ok(self.collection.find_one(by_id(id), None).await?)
    }

    async fn find_all(&self) -> Result<Vec<Topic>, AppError> {
        let cursor = self.collection.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_user(&self, user_id: &ObjectId) -> Result<Vec<Topic>, AppError> {
        let cursor = self
            .collection
            .find(doc! { "user_id": *user_id }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn replace(&self, topic: &Topic) -> Result<(), AppError> {
        self.collection
            .replace_one(by_id(&topic.id), topic, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.collection.delete_one(by_id(id), None).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct MongoWordRepository {
    collection: Collection<Word>,
}

impl MongoWordRepository {
    pub fn new(collection: Collection<Word>) -> Self {
        Self { collection }
    }
}

#[async_trait]
impl WordRepository for MongoWordRepository {
    async fn create(&self, word: &Word) -> Result<(), AppError> {
        self.collection.insert_one(word, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Word>, AppError> {
        Ok(self.collection.find_one(by_id(id), None).await?)
    }

    async fn find(&self, filter: &WordFilter) -> Result<Vec<Word>, AppError> {
        let cursor = self.collection.find(filter.to_document(), None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn replace(&self, word: &Word) -> Result<(), AppError> {
        self.collection
            .replace_one(by_id(&word.id), word, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> Result<(), AppError> {
        self.collection.delete_one(by_id(id), None).await?;
        Ok(())
    }
}
