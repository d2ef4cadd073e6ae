//! Word API endpoints.

use axum::extract::State;

use super::{created, done, success, ApiResult, AppJson, AppPath, AppQuery};
use crate::auth::AuthUser;
use crate::models::{
    CreateWordRequest, SearchWordQuery, TopicWordQuery, UpdateWordRequest, WordResponse,
};
use crate::AppState;

/// POST /api/v1/word - Create a word owned by the caller.
pub async fn create_word(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<CreateWordRequest>,
) -> ApiResult<WordResponse> {
    created(state.words.create(request, &user.user_id).await?)
}

/// GET /api/v1/word - Search words by topic, text and learned flag.
pub async fn search_words(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchWordQuery>,
) -> ApiResult<Vec<WordResponse>> {
    success(state.words.search(query).await?)
}

/// GET /api/v1/word/{word_id}
pub async fn get_word(
    State(state): State<AppState>,
    AppPath(word_id): AppPath<String>,
) -> ApiResult<WordResponse> {
    success(state.words.get_by_id(&word_id).await?)
}

/// GET /api/v1/word/topic/{topic_id} - List a topic's words.
pub async fn list_topic_words(
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<String>,
    AppQuery(query): AppQuery<TopicWordQuery>,
) -> ApiResult<Vec<WordResponse>> {
    success(state.words.list_by_topic(&topic_id, query).await?)
}

/// PUT /api/v1/word/{word_id}
pub async fn update_word(
    State(state): State<AppState>,
    AppPath(word_id): AppPath<String>,
    AppJson(request): AppJson<UpdateWordRequest>,
) -> ApiResult<WordResponse> {
    success(state.words.update(&word_id, request).await?)
}

/// DELETE /api/v1/word/{word_id}
pub async fn delete_word(
    State(state): State<AppState>,
    AppPath(word_id): AppPath<String>,
) -> ApiResult<()> {
    state.words.delete(&word_id).await?;
    done()
}
