//! Topic API endpoints.

use axum::extract::State;

use super::{created, done, success, ApiResult, AppJson, AppPath};
use crate::auth::AuthUser;
use crate::models::{CreateTopicRequest, TopicResponse, UpdateTopicRequest};
use crate::AppState;

/// POST /api/v1/topic - Create a topic owned by the caller.
pub async fn create_topic(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<CreateTopicRequest>,
) -> ApiResult<TopicResponse> {
    created(state.topics.create(request, &user.user_id).await?)
}

/// GET /api/v1/topic - List all topics.
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Vec<TopicResponse>> {
    success(state.topics.get_all().await?)
}

/// GET /api/v1/topic/user - List the caller's topics.
pub async fn list_my_topics(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<TopicResponse>> {
    success(state.topics.get_all_by_user(&user.user_id).await?)
}

/// GET /api/v1/topic/{topic_id} - Get a topic with its word count.
pub async fn get_topic(
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<String>,
) -> ApiResult<TopicResponse> {
    success(state.topics.get_by_id(&topic_id).await?)
}

/// PUT /api/v1/topic/{topic_id}
pub async fn update_topic(
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<String>,
    AppJson(request): AppJson<UpdateTopicRequest>,
) -> ApiResult<TopicResponse> {
    success(state.topics.update(&topic_id, request).await?)
}

/// DELETE /api/v1/topic/{topic_id} - Delete a topic and its words.
pub async fn delete_topic(
    State(state): State<AppState>,
    AppPath(topic_id): AppPath<String>,
) -> ApiResult<()> {
    state.topics.delete(&topic_id).await?;
    done()
}
