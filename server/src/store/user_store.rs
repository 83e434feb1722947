// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_trait::async_trait;
use chrono::Utc;
use common::model::User;
use common::ServiceError;
use sqlx::SqlitePool;

use super::db_error;
use super::dto::{to_db_id, UserRow};
use crate::repository::UserRepository;

#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user by email"))?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: u64) -> Result<User, ServiceError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(to_db_id(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch user"))?;

        row.map(User::from)
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, ServiceError> {
        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO users (email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert user"))?
        .last_insert_rowid();

        Ok(User {
            id: id as u64,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}
