//! Bearer-token authentication.
//!
//! `require_auth` guards every protected route: it validates the access
//! token and stores an [`AuthUser`] in the request extensions, where
//! handlers pick it up through the `AuthUser` extractor.

mod jwt;
mod password;

pub use jwt::*;
pub use password::*;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// Identity of the caller, injected by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("authentication required".to_string()))
    }
}

/// Access-token middleware for protected routes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(&request) else {
        return AppError::Unauthorized("missing or malformed Authorization header".to_string())
            .into_response();
    };

    match state.users.validate_token(&token) {
        Ok(claims) => {
            request.extensions_mut().insert(AuthUser {
                user_id: claims.user_id,
            });
            next.run(request).await
        }
        Err(err) => {
            tracing::debug!("Rejected bearer token: {}", err);
            err.into_response()
        }
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
