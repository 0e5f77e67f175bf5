//! Sign-up and credential checks.

use std::sync::Arc;

use crate::domain::{NewUser, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, UserRepository};
use crate::validation::{RegistrationForm, validate_credentials, validate_registration};

/// Account operations over the user repository and password hasher.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Register a new user. Usernames are unique.
    pub async fn register(&self, form: &RegistrationForm<'_>) -> Result<User, DomainError> {
        validate_registration(form)?;

        let username = form.username.trim();
        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::Duplicate("Username already exists".to_string()));
        }

        let password_hash = self.passwords.hash(form.password)?;
        let user = self
            .users
            .insert(NewUser::new(
                username.to_string(),
                form.email.trim().to_string(),
                password_hash,
            ))
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, DomainError> {
        validate_credentials(username, password)?;

        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Password mismatch");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Look up the user behind a token.
    pub async fn find_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))
    }
}
