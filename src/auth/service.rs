use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::db::models::User;
use crate::db::repository::{Store, UserRepository};
use crate::error::{AppError, AuthError};
use crate::Result;

/// Registration, login and bearer-token authentication.
pub struct AuthService {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn register(&self, phone: &str, password: &str) -> Result<User> {
        // Early exit only; the store's unique constraint settles races.
        if self.store.find_by_phone(phone).await?.is_some() {
            return Err(AuthError::DuplicatePhone.into());
        }

        let password = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::InternalError(format!("Hashing task failed: {}", e)))??;

        let user = self.store.create_user(phone, &hash).await?;
        info!(user_id = user.id, "Registered user");
        Ok(user)
    }

    /// Returns a bearer token for valid credentials.
    ///
    /// Unknown phones and wrong passwords are reported separately.
    pub async fn login(&self, phone: &str, password: &str) -> Result<String> {
        let user = self
            .store
            .find_by_phone(phone)
            .await?
            .ok_or(AuthError::UnknownPhone)?;

        let password = password.to_owned();
        let stored_hash = user.hashed_password.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| AppError::InternalError(format!("Verification task failed: {}", e)))?;

        if !matches {
            warn!(user_id = user.id, "Password mismatch on login");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.tokens.issue(&user.phone, self.tokens.ttl())
    }

    /// Resolves a bearer token to the active user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let phone = self.tokens.verify(token)?;

        let user = self.store.find_by_phone(&phone).await?.ok_or_else(|| {
            debug!("Token subject has no matching user");
            AuthError::InvalidToken
        })?;

        if !user.is_active {
            return Err(AuthError::InactiveUser.into());
        }

        Ok(user)
    }
}
