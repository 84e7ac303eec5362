//! Authentication service - sessions and bearer tokens.
//!
//! A login issues an HS256 token and stores it as the account's current
//! session token. A token is only accepted while it is still the stored
//! one, so a newer login or a logout revokes it.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, DUMMY_PASSWORD_HASH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{AccountView, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Login id
    pub sub: String,
    pub role: String,
    /// Unique per issued token
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
    pub user: AccountView,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials, issue a token and make it the current session
    async fn login(&self, user_id: String, password: String) -> AppResult<TokenResponse>;

    /// Clear the current session token
    async fn logout(&self, user_id: &str) -> AppResult<()>;

    /// Resolve a bearer token to its account. The token must be valid and
    /// still be the account's current session token.
    async fn authenticate(&self, token: &str) -> AppResult<User>;

    /// Verify JWT signature and expiry and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<(String, i64)> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.user_id.clone(),
        role: user.role.clone(),
        jti: Uuid::new_v4().to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok((token, config.jwt_expiration_hours * SECONDS_PER_HOUR))
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, user_id: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_id(user_id.trim()).await?;

        // Verify against a dummy hash for unknown accounts so both paths
        // cost the same.
        let hash = user
            .as_ref()
            .map_or(DUMMY_PASSWORD_HASH, |u| u.password_hash.as_str());
        let password_valid = Password::from_hash(hash).verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::info!(user_id = %user_id.trim(), "Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let (token, expires_in) = generate_token(&user, &self.config)?;
        self.uow
            .users()
            .set_session_token(&user.user_id, Some(token.clone()))
            .await?;

        tracing::info!(user_id = %user.user_id, "Session started");
        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in,
            user: AccountView::from(user),
        })
    }

    async fn logout(&self, user_id: &str) -> AppResult<()> {
        self.uow.users().set_session_token(user_id, None).await?;
        tracing::info!(user_id = %user_id, "Session ended");
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;
        let user = self
            .uow
            .users()
            .find_by_id(&claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.session_token.as_deref() != Some(token) {
            tracing::debug!(user_id = %user.user_id, "Token is not the current session");
            return Err(AppError::Unauthorized);
        }
        Ok(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::with_secret("test-secret-key-for-testing-only-32chars")
    }

    fn user() -> User {
        User {
            user_id: "jdoe".to_string(),
            password_hash: String::new(),
            role: "Admin".to_string(),
            email: None,
            email_credential: None,
            session_token: None,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config();
        let (token, expires_in) = generate_token(&user(), &config).unwrap();
        assert_eq!(expires_in, 3600);

        let claims = verify_token_internal(&token, &config).unwrap();
        assert_eq!(claims.sub, "jdoe");
        assert_eq!(claims.role, "Admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tokens_issued_together_differ() {
        let config = config();
        let (first, _) = generate_token(&user(), &config).unwrap();
        let (second, _) = generate_token(&user(), &config).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let (token, _) = generate_token(&user(), &config()).unwrap();
        let other = Config::with_secret("another-secret-key-for-testing-32chars");
        assert!(matches!(
            verify_token_internal(&token, &other),
            Err(AppError::Jwt(_))
        ));
    }
}
