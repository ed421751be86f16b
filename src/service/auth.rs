//! Authentication service
//!
//! Registration and credential verification for the identity store.
//! Passwords are hashed with Argon2id and stored as PHC strings; hashing
//! and verification run on the blocking pool.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use thiserror::Error;

use crate::data::Database;
use crate::error::AppError;

/// Why an authentication attempt failed
///
/// The two credential failures are kept distinct internally; an outer
/// surface that must not enable username enumeration collapses them.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// No user with that name exists
    #[error("no user with that name exists")]
    UnknownUsername,

    /// An incorrect password was provided
    #[error("an incorrect password was provided")]
    WrongPassword,

    /// Infrastructure failure unrelated to the credentials
    #[error(transparent)]
    Internal(#[from] AppError),
}

/// Authentication service
pub struct AuthService {
    db: Arc<Database>,
}

impl AuthService {
    /// Create new authentication service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new user.
    ///
    /// # Returns
    /// `false` when the name is already taken.
    pub async fn register(&self, name: &str, password: &str) -> Result<bool, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("password cannot be empty".to_string()));
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        match self
            .db
            .insert_user(name, &password_hash, chrono::Utc::now())
            .await?
        {
            Some(user_id) => {
                tracing::info!(user_id, name, "user registered");
                Ok(true)
            }
            None => {
                tracing::debug!(name, "registration rejected, name already taken");
                Ok(false)
            }
        }
    }

    /// Verify a user's credentials.
    ///
    /// # Returns
    /// The user's id, or an error pinpointing which credential was wrong.
    pub async fn authenticate(
        &self,
        name: &str,
        password: &str,
    ) -> Result<i64, AuthenticationError> {
        let user = self
            .db
            .get_user_by_name(name)
            .await?
            .ok_or(AuthenticationError::UnknownUsername)?;

        let stored_hash = user.password_hash.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&stored_hash, &password))
            .await
            .map_err(|e| AuthenticationError::Internal(AppError::Internal(e.into())))??;

        if verified {
            Ok(user.id)
        } else {
            tracing::debug!(user_id = user.id, "authentication failed, wrong password");
            Err(AuthenticationError::WrongPassword)
        }
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

    Ok(hash.to_string())
}

fn verify_password(stored_hash: &str, password: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash is invalid: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "password verification failed: {e}"
        ))),
    }
}
