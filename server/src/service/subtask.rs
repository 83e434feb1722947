// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use common::model::{Completion, NewSubTask, SubTask};
use common::ServiceError;
use tracing::info;

use crate::repository::{SubTaskRepository, TaskRepository};

#[derive(Clone)]
pub struct SubTaskService {
    repo: Arc<dyn SubTaskRepository>,
    tasks: Arc<dyn TaskRepository>,
}

impl SubTaskService {
    pub fn new(repo: Arc<dyn SubTaskRepository>, tasks: Arc<dyn TaskRepository>) -> Self {
        Self { repo, tasks }
    }

    pub async fn list_by_task_id(&self, task_id: u64) -> Result<Vec<SubTask>, ServiceError> {
        self.repo.list_by_task_id(task_id).await
    }

    /// Subtasks of several tasks fetched at once, keyed by parent id.
    pub async fn list_grouped(
        &self,
        task_ids: &[u64],
    ) -> Result<HashMap<u64, Vec<SubTask>>, ServiceError> {
        let mut grouped: HashMap<u64, Vec<SubTask>> = HashMap::new();
        for sub_task in self.repo.list_by_task_ids(task_ids).await? {
            grouped.entry(sub_task.task_id).or_default().push(sub_task);
        }
        Ok(grouped)
    }

    /// Creates an open subtask under an existing task.
    pub async fn create(&self, input: NewSubTask) -> Result<SubTask, ServiceError> {
        if input.title.trim().is_empty() {
            return Err(ServiceError::invalid_argument("title cannot be empty"));
        }
        // Resolves the parent first so an unknown task id surfaces as NotFound.
        self.tasks.find_by_id(input.task_id).await?;

        let now = Utc::now();
        let created = self
            .repo
            .create(SubTask {
                id: 0,
                task_id: input.task_id,
                title: input.title,
                note: input.note,
                completed: 0,
                completed_at: None,
                due_date: input.due_date,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(
            "SubTask created with ID: {} under task {}",
            created.id, created.task_id
        );
        Ok(created)
    }

    pub async fn toggle_completion(
        &self,
        id: u64,
        completed: bool,
    ) -> Result<SubTask, ServiceError> {
        let mut sub_task = self.repo.find_by_id(id).await?;
        sub_task.mark_completed(completed, Utc::now());
        self.repo.update(sub_task).await
    }
}
