// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use common::model::User;
use common::ServiceError;
use rand::rngs::OsRng;
use tracing::{info, warn};

use crate::repository::UserRepository;

const INVALID_CREDENTIALS: &str = "invalid email or password";

/// Hashes a password with Argon2id into a PHC string.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::storage(format!("Password hashing failed: {e}")))
}

/// A malformed stored hash never verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Resolves credentials to a user id. Unknown emails and wrong passwords
    /// fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<u64, ServiceError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| ServiceError::unauthenticated(INVALID_CREDENTIALS))?;

        if !verify_password(password, &user.password_hash) {
            warn!("Rejected login for user {}", user.id);
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        }

        info!("User {} logged in.", user.id);
        Ok(user.id)
    }

    pub async fn get_user(&self, id: u64) -> Result<User, ServiceError> {
        self.users.find_by_id(id).await
    }

    /// Creates the account unless the email is already registered.
    pub async fn ensure_user(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = email.trim();
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok(existing);
        }
        if email.is_empty() || password.is_empty() {
            return Err(ServiceError::invalid_argument(
                "email and password are required",
            ));
        }

        let hash = hash_password(password)?;
        let user = self.users.create(email, &hash).await?;
        info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }
}
