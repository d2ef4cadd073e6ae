//! Flashcard words and their filters.

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;

use super::{parse_id, require};
use crate::db::{WordFilter, WordRepository};
use crate::errors::AppError;
use crate::models::{
    CreateWordRequest, SearchWordQuery, TopicWordQuery, UpdateWordRequest, Word, WordResponse,
};

pub struct WordService {
    repo: Arc<dyn WordRepository>,
}

impl WordService {
    pub fn new(repo: Arc<dyn WordRepository>) -> Self {
        Self { repo }
    }

    /// Create a word in a topic. The topic itself is not looked up.
    pub async fn create(
        &self,
        request: CreateWordRequest,
        user_id: &str,
    ) -> Result<WordResponse, AppError> {
        let topic_id = parse_id(&request.topic_id, "topic_id")?;
        require(&request.word, "word")?;
        require(&request.definition, "definition")?;
        let user_id = parse_id(user_id, "user_id")?;

        let now = Utc::now();
        let word = Word {
            id: ObjectId::new(),
            topic_id,
            user_id,
            word: request.word,
            definition: request.definition,
            example: request.example,
            word_type: request.word_type,
            is_true: false,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&word).await?;

        Ok(word.into())
    }

    /// Words matching every filter that was supplied. Blank values are ignored.
    pub async fn search(&self, query: SearchWordQuery) -> Result<Vec<WordResponse>, AppError> {
        let topic_id = match query.topic_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_id(raw, "topic_id")?),
            _ => None,
        };
        let filter = WordFilter {
            topic_id,
            word: non_blank(query.word),
            is_true: query.is_true,
        };
        self.find(&filter).await
    }

    pub async fn get_by_id(&self, word_id: &str) -> Result<WordResponse, AppError> {
        let id = parse_id(word_id, "word_id")?;
        self.find_one(&id).await.map(WordResponse::from)
    }

    pub async fn list_by_topic(
        &self,
        topic_id: &str,
        query: TopicWordQuery,
    ) -> Result<Vec<WordResponse>, AppError> {
        let filter = WordFilter {
            topic_id: Some(parse_id(topic_id, "topic_id")?),
            word: non_blank(query.word),
            is_true: query.is_true,
        };
        self.find(&filter).await
    }

    pub async fn update(
        &self,
        word_id: &str,
        request: UpdateWordRequest,
    ) -> Result<WordResponse, AppError> {
        let id = parse_id(word_id, "word_id")?;
        let mut word = self.find_one(&id).await?;

        if let Some(text) = request.word.required("word")? {
            require(&text, "word")?;
            word.word = text;
        }
        if let Some(definition) = request.definition.required("definition")? {
            require(&definition, "definition")?;
            word.definition = definition;
        }
        request.example.apply_to(&mut word.example);
        if let Some(word_type) = request.word_type.required("word_type")? {
            word.word_type = word_type;
        }
        if let Some(is_true) = request.is_true.required("is_true")? {
            word.is_true = is_true;
        }
        word.updated_at = Utc::now();

        self.repo.replace(&word).await?;
        Ok(word.into())
    }

    /// Remove a word. Removing an unknown id is not an error.
    pub async fn delete(&self, word_id: &str) -> Result<(), AppError> {
        let id = parse_id(word_id, "word_id")?;
        self.repo.delete(&id).await
    }

    /// Every stored word of a topic.
    pub(crate) async fn words_of_topic(&self, topic_id: ObjectId) -> Result<Vec<Word>, AppError> {
        self.repo.find(&WordFilter::for_topic(topic_id)).await
    }

    async fn find(&self, filter: &WordFilter) -> Result<Vec<WordResponse>, AppError> {
        Ok(self
            .repo
            .find(filter)
            .await?
            .into_iter()
            .map(WordResponse::from)
            .collect())
    }

    async fn find_one(&self, id: &ObjectId) -> Result<Word, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("word {} not found", id)))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
