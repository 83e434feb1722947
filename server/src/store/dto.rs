// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Row shapes of the SQLite tables and their mapping to the domain model.
//!
//! SQLite integers are signed, so ids are `i64` here and `u64` everywhere else.
use chrono::{DateTime, NaiveDate, Utc};
use common::model;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SubTaskRow {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn to_db_id(id: u64) -> i64 {
    // Ids beyond i64::MAX are never issued by SQLite, so they wrap to a value that matches nothing.
    id as i64
}

fn from_db_id(id: i64) -> u64 {
    id as u64
}

impl From<TaskRow> for model::Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: from_db_id(row.id),
            title: row.title,
            note: row.note,
            completed: row.completed,
            completed_at: row.completed_at,
            due_date: row.due_date,
            category_id: row.category_id.map(from_db_id),
            user_id: row.user_id.map(from_db_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<SubTaskRow> for model::SubTask {
    fn from(row: SubTaskRow) -> Self {
        Self {
            id: from_db_id(row.id),
            task_id: from_db_id(row.task_id),
            title: row.title,
            note: row.note,
            completed: row.completed,
            completed_at: row.completed_at,
            due_date: row.due_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CategoryRow> for model::Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: from_db_id(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<UserRow> for model::User {
    fn from(row: UserRow) -> Self {
        Self {
            id: from_db_id(row.id),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
