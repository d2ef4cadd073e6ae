//! Topics and the cascade onto their words.

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;

use super::{parse_id, require, WordService};
use crate::db::TopicRepository;
use crate::errors::AppError;
use crate::models::{
    CreateTopicRequest, Patch, Topic, TopicResponse, UpdateTopicRequest, DEFAULT_TOPIC_COLOR,
};

pub struct TopicService {
    repo: Arc<dyn TopicRepository>,
    words: Arc<WordService>,
}

impl TopicService {
    pub fn new(repo: Arc<dyn TopicRepository>, words: Arc<WordService>) -> Self {
        Self { repo, words }
    }

    pub async fn create(
        &self,
        request: CreateTopicRequest,
        user_id: &str,
    ) -> Result<TopicResponse, AppError> {
        require(&request.name, "name")?;
        let user_id = parse_id(user_id, "user_id")?;

        let now = Utc::now();
        let topic = Topic {
            id: ObjectId::new(),
            name: request.name,
            description: request.description,
            color: color_or_default(request.color),
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&topic).await?;

        Ok(topic.into())
    }

    /// A single topic together with the number of words it holds.
    pub async fn get_by_id(&self, topic_id: &str) -> Result<TopicResponse, AppError> {
        let id = parse_id(topic_id, "topic_id")?;
        let topic = self.find(&id).await?;
        let word_count = self.words.words_of_topic(id).await?.len();

        Ok(TopicResponse::from(topic).with_word_count(word_count))
    }

    pub async fn get_all(&self) -> Result<Vec<TopicResponse>, AppError> {
        Ok(into_responses(self.repo.find_all().await?))
    }

    pub async fn get_all_by_user(&self, user_id: &str) -> Result<Vec<TopicResponse>, AppError> {
        let user_id = parse_id(user_id, "user_id")?;
        Ok(into_responses(self.repo.find_by_user(&user_id).await?))
    }

    pub async fn update(
        &self,
        topic_id: &str,
        request: UpdateTopicRequest,
    ) -> Result<TopicResponse, AppError> {
        let id = parse_id(topic_id, "topic_id")?;
        let mut topic = self.find(&id).await?;

        if let Some(name) = request.name.required("name")? {
            require(&name, "name")?;
            topic.name = name;
        }
        request.description.apply_to(&mut topic.description);
        match request.color {
            Patch::Absent => {}
            Patch::Null => topic.color = DEFAULT_TOPIC_COLOR.to_string(),
            Patch::Value(color) => topic.color = color_or_default(Some(color)),
        }
        topic.updated_at = Utc::now();

        self.repo.replace(&topic).await?;
        Ok(topic.into())
    }

    /// Delete a topic after deleting each of its words.
    ///
    /// The cascade is not atomic. If a word delete fails the loop stops, the
    /// topic and every word not yet removed stay in place, and the error is
    /// returned.
    pub async fn delete(&self, topic_id: &str) -> Result<(), AppError> {
        let id = parse_id(topic_id, "topic_id")?;
        self.find(&id).await?;

        let words = self.words.words_of_topic(id).await?;
        let total = words.len();
        for (removed, word) in words.iter().enumerate() {
            if let Err(e) = self.words.delete(&word.id.to_hex()).await {
                tracing::error!(
                    topic_id = %id,
                    removed,
                    total,
                    "Topic cascade aborted: {}",
                    e
                );
                return Err(e);
            }
        }

        self.repo.delete(&id).await?;
        tracing::info!(topic_id = %id, words = total, "Deleted topic");
        Ok(())
    }

    async fn find(&self, id: &ObjectId) -> Result<Topic, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("topic {} not found", id)))
    }
}

fn color_or_default(color: Option<String>) -> String {
    color
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TOPIC_COLOR.to_string())
}

fn into_responses(topics: Vec<Topic>) -> Vec<TopicResponse> {
    topics.into_iter().map(TopicResponse::from).collect()
}
