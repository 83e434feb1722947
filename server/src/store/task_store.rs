// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_trait::async_trait;
use chrono::Utc;
use common::model::{Task, TaskFilter};
use common::ServiceError;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::db_error;
use super::dto::{to_db_id, TaskRow};
use crate::repository::TaskRepository;

#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Appends one `AND <predicate>` per constrained field of `filter`.
///
/// The builder must already end in a `WHERE` clause. Values are bound, never inlined.
pub(crate) fn push_predicates(builder: &mut QueryBuilder<'_, Sqlite>, filter: &TaskFilter) {
    if let Some(category_id) = filter.category_id {
        builder
            .push(" AND category_id = ")
            .push_bind(to_db_id(category_id));
    }
    if let Some(from) = filter.due_date_from {
        builder.push(" AND due_date >= ").push_bind(from);
    }
    if let Some(to) = filter.due_date_to {
        builder.push(" AND due_date <= ").push_bind(to);
    }
    if filter.incomplete_only == Some(true) {
        builder.push(" AND completed = 0");
    }
    if let Some(user_id) = filter.user_id {
        builder.push(" AND user_id = ").push_bind(to_db_id(user_id));
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM tasks WHERE 1 = 1");
        push_predicates(&mut builder, filter);
        builder.push(" ORDER BY id ASC");
        debug!("Listing tasks: {}", builder.sql());

        let rows = builder
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list tasks"))?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Task, ServiceError> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(to_db_id(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch task"))?;

        row.map(Task::from)
            .ok_or_else(|| ServiceError::not_found("task", id))
    }

    async fn create(&self, task: Task) -> Result<Task, ServiceError> {
        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO tasks (title, note, completed, completed_at, due_date, category_id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&task.title)
        .bind(&task.note)
        .bind(task.completed)
        .bind(task.completed_at)
        .bind(task.due_date)
        .bind(task.category_id.map(to_db_id))
        .bind(task.user_id.map(to_db_id))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert task"))?
        .last_insert_rowid();

        Ok(Task {
            id: id as u64,
            created_at: now,
            updated_at: now,
            ..task
        })
    }

    async fn update(&self, task: Task) -> Result<Task, ServiceError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE tasks SET title = ?, note = ?, completed = ?, completed_at = ?, due_date = ?, category_id = ?, user_id = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&task.title)
        .bind(&task.note)
        .bind(task.completed)
        .bind(task.completed_at)
        .bind(task.due_date)
        .bind(task.category_id.map(to_db_id))
        .bind(task.user_id.map(to_db_id))
        .bind(now)
        .bind(to_db_id(task.id))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update task"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("task", task.id));
        }

        Ok(Task {
            updated_at: now,
            ..task
        })
    }

    async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start delete transaction"))?;

        let removed_sub_tasks = sqlx::query("DELETE FROM sub_tasks WHERE task_id = ?")
            .bind(to_db_id(id))
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete subtasks"))?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(to_db_id(id))
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete task"))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(db_error("Failed to commit delete transaction"))?;

        debug!(
            "Deleted {} task rows and {} subtask rows for task ID: {}",
            removed, removed_sub_tasks, id
        );
        Ok(removed > 0)
    }
}
