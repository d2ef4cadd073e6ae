//! HS256 access/refresh token issuance and validation.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::AppError;
use crate::models::TokenPair;

/// Which half of the pair a token is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material plus token lifetimes, built once from `Config`.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.access_token_hours),
            Duration::hours(config.refresh_token_hours),
        )
    }

    /// Issue an access/refresh pair for `user_id`.
    pub fn issue_pair(&self, user_id: &str) -> Result<TokenPair, AppError> {
        let now = Utc::now();
        Ok(TokenPair {
            token: self.issue_at(user_id, TokenKind::Access, now)?,
            refresh_token: self.issue_at(user_id, TokenKind::Refresh, now)?,
        })
    }

    /// Issue a single token as if it were `now`.
    pub fn issue_at(
        &self,
        user_id: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            user_id: user_id.to_string(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Token signing failed: {}", e);
            AppError::Internal("failed to issue token".to_string())
        })
    }

    /// Verify signature, algorithm and expiry, then check the token kind.
    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::Unauthorized("token is required".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        if claims.kind != expected {
            return Err(AppError::Unauthorized("wrong token type".to_string()));
        }
        Ok(claims)
    }
}
