// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_trait::async_trait;
use chrono::Utc;
use common::model::SubTask;
use common::ServiceError;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::db_error;
use super::dto::{to_db_id, SubTaskRow};
use crate::repository::SubTaskRepository;

#[derive(Debug, Clone)]
pub struct SqliteSubTaskRepository {
    pool: SqlitePool,
}

impl SqliteSubTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubTaskRepository for SqliteSubTaskRepository {
    async fn list_by_task_id(&self, task_id: u64) -> Result<Vec<SubTask>, ServiceError> {
        let rows = sqlx::query_as::<_, SubTaskRow>(
            "SELECT * FROM sub_tasks WHERE task_id = ? ORDER BY id ASC",
        )
        .bind(to_db_id(task_id))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list subtasks"))?;

        Ok(rows.into_iter().map(SubTask::from).collect())
    }

    async fn list_by_task_ids(&self, task_ids: &[u64]) -> Result<Vec<SubTask>, ServiceError> {
        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM sub_tasks WHERE task_id IN (");
        let mut ids = builder.separated(", ");
        for &task_id in task_ids {
            ids.push_bind(to_db_id(task_id));
        }
        ids.push_unseparated(") ORDER BY id ASC");

        let rows = builder
            .build_query_as::<SubTaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list subtasks"))?;

        Ok(rows.into_iter().map(SubTask::from).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<SubTask, ServiceError> {
        let row = sqlx::query_as::<_, SubTaskRow>("SELECT * FROM sub_tasks WHERE id = ?")
            .bind(to_db_id(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch subtask"))?;

        row.map(SubTask::from)
            .ok_or_else(|| ServiceError::not_found("subtask", id))
    }

    async fn create(&self, sub_task: SubTask) -> Result<SubTask, ServiceError> {
        let now = Utc::now();

        let id = sqlx::query(
            "INSERT INTO sub_tasks (task_id, title, note, completed, completed_at, due_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(to_db_id(sub_task.task_id))
        .bind(&sub_task.title)
        .bind(&sub_task.note)
        .bind(sub_task.completed)
        .bind(sub_task.completed_at)
        .bind(sub_task.due_date)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert subtask"))?
        .last_insert_rowid();

        Ok(SubTask {
            id: id as u64,
            created_at: now,
            updated_at: now,
            ..sub_task
        })
    }

    async fn update(&self, sub_task: SubTask) -> Result<SubTask, ServiceError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE sub_tasks SET task_id = ?, title = ?, note = ?, completed = ?, completed_at = ?, due_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(to_db_id(sub_task.task_id))
        .bind(&sub_task.title)
        .bind(&sub_task.note)
        .bind(sub_task.completed)
        .bind(sub_task.completed_at)
        .bind(sub_task.due_date)
        .bind(now)
        .bind(to_db_id(sub_task.id))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update subtask"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("subtask", sub_task.id));
        }

        Ok(SubTask {
            updated_at: now,
            ..sub_task
        })
    }
}
