//! User API endpoints.

use axum::extract::State;

use super::{created, done, success, ApiResult, AppJson, AppPath};
use crate::auth::AuthUser;
use crate::models::{
    LoginRequest, RefreshRequest, RegisterRequest, TokenPair, UpdateUserRequest, UserResponse,
};
use crate::AppState;

/// POST /api/v1/user/register - Create an account.
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> ApiResult<UserResponse> {
    created(state.users.register(request).await?)
}

/// POST /api/v1/user/login - Exchange credentials for a token pair.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<UserResponse> {
    success(state.users.login(request).await?)
}

/// POST /api/v1/user/refresh - Exchange a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(request): AppJson<RefreshRequest>,
) -> ApiResult<TokenPair> {
    success(state.users.refresh_token(&request.refresh_token)?)
}

/// POST /api/v1/user/logout
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> ApiResult<()> {
    state.users.logout(&user.user_id).await?;
    done()
}

/// GET /api/v1/user - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    success(state.users.get_all().await?)
}

/// GET /api/v1/user/me
pub async fn get_me(State(state): State<AppState>, user: AuthUser) -> ApiResult<UserResponse> {
    success(state.users.get_by_id(&user.user_id).await?)
}

/// PUT /api/v1/user/me - Partially update the caller's profile.
pub async fn update_me(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> ApiResult<UserResponse> {
    success(state.users.update_profile(&user.user_id, request).await?)
}

/// GET /api/v1/user/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<String>,
) -> ApiResult<UserResponse> {
    success(state.users.get_by_id(&user_id).await?)
}

/// DELETE /api/v1/user/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<String>,
) -> ApiResult<()> {
    state.users.delete(&user_id).await?;
    done()
}
