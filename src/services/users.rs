//! Accounts: registration, login, token refresh and profile management.

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;

use super::{parse_id, require};
use crate::auth::{hash_password, verify_password, Claims, TokenKeys, TokenKind};
use crate::config::Config;
use crate::db::UserRepository;
use crate::errors::AppError;
use crate::models::{
    LoginRequest, RegisterRequest, TokenPair, UpdateUserRequest, User, UserResponse, USER_TYPE,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub struct UserService {
    repo: Arc<dyn UserRepository>,
    keys: TokenKeys,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, config: &Config) -> Self {
        Self {
            repo,
            keys: TokenKeys::from_config(config),
            bcrypt_cost: config.bcrypt_cost,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AppError> {
        require(&request.email, "email")?;
        require(&request.phone, "phone")?;
        require(&request.password, "password")?;

        if self.repo.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("user already exists".to_string()));
        }

        let password = hash_password(&request.password, self.bcrypt_cost).await?;
        let id = ObjectId::new();
        let tokens = self.keys.issue_pair(&id.to_hex())?;
        let now = Utc::now();

        let user = User {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            password,
            token: tokens.token,
            refresh_token: tokens.refresh_token,
            user_type: USER_TYPE.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;

        tracing::info!(user_id = %id, "Registered user");
        Ok(UserResponse::with_tokens(user))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<UserResponse, AppError> {
        if request.email.trim().is_empty() || request.password.is_empty() {
            return Err(AppError::Validation(
                "email and password are required".to_string(),
            ));
        }

        let Some(mut user) = self.repo.find_by_email(&request.email).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&request.password, &user.password).await? {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let tokens = self.keys.issue_pair(&user.id.to_hex())?;
        let now = Utc::now();
        self.repo
            .set_tokens(&user.id, &tokens.token, &tokens.refresh_token, now)
            .await?;

        user.token = tokens.token;
        user.refresh_token = tokens.refresh_token;
        user.updated_at = now;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(UserResponse::with_tokens(user))
    }

    /// Validate an access token presented on a protected route.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        self.keys.validate(token, TokenKind::Access)
    }

    /// Exchange a refresh token for a new pair. The new pair is not stored.
    pub fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        require(refresh_token, "refresh_token")?;
        let claims = self
            .keys
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::Unauthorized("invalid refresh token".to_string()))?;
        self.keys.issue_pair(&claims.user_id)
    }

    /// Clear the stored token pair.
    ///
    /// Tokens already handed out stay valid until they expire.
    pub async fn logout(&self, user_id: &str) -> Result<(), AppError> {
        let id = parse_id(user_id, "user_id")?;
        self.repo.set_tokens(&id, "", "", Utc::now()).await?;
        tracing::info!(user_id = %id, "User logged out");
        Ok(())
    }

    /// Look up a user. The stored tokens are not part of the answer.
    pub async fn get_by_id(&self, user_id: &str) -> Result<UserResponse, AppError> {
        let id = parse_id(user_id, "user_id")?;
        self.find(&id).await.map(UserResponse::from)
    }

    pub async fn get_all(&self) -> Result<Vec<UserResponse>, AppError> {
        Ok(self
            .repo
            .find_all()
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect())
    }

    /// Remove the account. Topics and words the user owns are left alone.
    pub async fn delete(&self, user_id: &str) -> Result<(), AppError> {
        let id = parse_id(user_id, "user_id")?;
        self.repo.delete(&id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let id = parse_id(user_id, "user_id")?;
        let mut user = self.find(&id).await?;

        if let Some(first_name) = request.first_name.required("first_name")? {
            user.first_name = first_name;
        }
        if let Some(last_name) = request.last_name.required("last_name")? {
            user.last_name = last_name;
        }
        if let Some(phone) = request.phone.required("phone")? {
            require(&phone, "phone")?;
            user.phone = phone;
        }
        user.updated_at = Utc::now();

        self.repo.replace(&user).await?;
        Ok(user.into())
    }

    async fn find(&self, id: &ObjectId) -> Result<User, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryUserRepository;
    use crate::models::Patch;

    fn service() -> UserService {
        service_with_repo().0
    }

    fn service_with_repo() -> (UserService, Arc<MemoryUserRepository>) {
        let repo = Arc::new(MemoryUserRepository::default());
        let service = UserService::new(repo.clone(), &Config::for_tests());
        (service, repo)
    }

    async fn stored(repo: &MemoryUserRepository, user_id: &str) -> User {
        let id = ObjectId::parse_str(user_id).unwrap();
        repo.find_by_id(&id).await.unwrap().unwrap()
    }

    fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            password: "correct horse".to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_issues_tokens() {
        let service = service();
        let user = service.register(registration("ada@example.com")).await.unwrap();

        assert_eq!(user.user_type, "user");
        let claims = service
            .validate_token(user.token.as_deref().unwrap())
            .unwrap();
        assert_eq!(claims.user_id, user.id);
        assert!(service
            .refresh_token(user.refresh_token.as_deref().unwrap())
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let service = service();
        let mut request = registration("ada@example.com");
        request.phone = String::new();

        assert_eq!(
            service.register(request).await.unwrap_err(),
            AppError::Validation("phone is required".to_string())
        );
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = service();
        let first = service.register(registration("ada@example.com")).await.unwrap();

        let err = service
            .register(registration("ada@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let users = service.get_all().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, first.id);
    }

    #[tokio::test]
    async fn test_login_rotates_tokens() {
        let (service, repo) = service_with_repo();
        let registered = service.register(registration("ada@example.com")).await.unwrap();

        let user = service
            .login(login("ada@example.com", "correct horse"))
            .await
            .unwrap();
        assert_eq!(user.id, registered.id);

        let stored = stored(&repo, &user.id).await;
        assert_eq!(user.token.as_deref(), Some(stored.token.as_str()));
        assert_eq!(
            user.refresh_token.as_deref(),
            Some(stored.refresh_token.as_str())
        );
    }

    #[tokio::test]
    async fn test_login_failures_share_message() {
        let service = service();
        service.register(registration("ada@example.com")).await.unwrap();

        let wrong_password = service
            .login(login("ada@example.com", "wrong"))
            .await
            .unwrap_err();
        let unknown_email = service
            .login(login("bob@example.com", "correct horse"))
            .await
            .unwrap_err();

        assert_eq!(
            wrong_password,
            AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
        );
        assert_eq!(wrong_password, unknown_email);
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        assert!(matches!(
            service().login(login("", "x")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let service = service();
        let user = service.register(registration("ada@example.com")).await.unwrap();

        assert_eq!(
            service.refresh_token(user.token.as_deref().unwrap()),
            Err(AppError::Unauthorized("invalid refresh token".to_string()))
        );
    }

    #[tokio::test]
    async fn test_logout_clears_stored_tokens() {
        let (service, repo) = service_with_repo();
        let user = service.register(registration("ada@example.com")).await.unwrap();

        service.logout(&user.id).await.unwrap();

        let stored = stored(&repo, &user.id).await;
        assert!(stored.token.is_empty());
        assert!(stored.refresh_token.is_empty());
        // Issued tokens outlive logout.
        assert!(service
            .validate_token(user.token.as_deref().unwrap())
            .is_ok());
    }

    #[tokio::test]
    async fn test_lookups_never_expose_tokens() {
        let service = service();
        let user = service.register(registration("ada@example.com")).await.unwrap();
        service
            .login(login("ada@example.com", "correct horse"))
            .await
            .unwrap();

        let fetched = service.get_by_id(&user.id).await.unwrap();
        assert_eq!(fetched.token, None);
        assert_eq!(fetched.refresh_token, None);

        for listed in service.get_all().await.unwrap() {
            assert_eq!(listed.token, None);
            assert_eq!(listed.refresh_token, None);
        }

        let updated = service
            .update_profile(&user.id, UpdateUserRequest::default())
            .await
            .unwrap();
        assert_eq!(updated.token, None);
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let service = service();
        let user = service.register(registration("ada@example.com")).await.unwrap();

        let updated = service
            .update_profile(
                &user.id,
                UpdateUserRequest {
                    phone: Patch::Value("555-0199".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.phone, "555-0199");
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let service = service();
        let id = ObjectId::new().to_hex();

        assert!(matches!(
            service.get_by_id(&id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_profile(&id, UpdateUserRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let service = service();
        let user = service.register(registration("ada@example.com")).await.unwrap();

        service.delete(&user.id).await.unwrap();
        assert!(service.get_all().await.unwrap().is_empty());
    }
}
