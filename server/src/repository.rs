// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Persistence contracts the services depend on.
//!
//! Implementations store whatever entity state they are handed; deciding which
//! fields change is the services' job. Storage-assigned values (ids, `created_at`,
//! `updated_at`) are reflected in the returned entities.
use async_trait::async_trait;
use common::model::{Category, SubTask, Task, TaskFilter, User};
use common::ServiceError;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Every task matching all constraints of `filter`, in no guaranteed order.
    async fn find_all(&self, filter: &TaskFilter) -> Result<Vec<Task>, ServiceError>;

    /// Fails with `NotFound` when the id does not resolve.
    async fn find_by_id(&self, id: u64) -> Result<Task, ServiceError>;

    /// Inserts `task`; its `id` and timestamps are ignored and assigned by storage.
    async fn create(&self, task: Task) -> Result<Task, ServiceError>;

    /// Overwrites the stored row with `task` and refreshes `updated_at`.
    async fn update(&self, task: Task) -> Result<Task, ServiceError>;

    /// Removes the task and its subtasks. Returns whether a task was removed.
    async fn delete(&self, id: u64) -> Result<bool, ServiceError>;
}

#[async_trait]
pub trait SubTaskRepository: Send + Sync {
    async fn list_by_task_id(&self, task_id: u64) -> Result<Vec<SubTask>, ServiceError>;

    /// Subtasks of every listed task in one query, ordered by id.
    async fn list_by_task_ids(&self, task_ids: &[u64]) -> Result<Vec<SubTask>, ServiceError>;
    async fn find_by_id(&self, id: u64) -> Result<SubTask, ServiceError>;
    async fn create(&self, sub_task: SubTask) -> Result<SubTask, ServiceError>;
    async fn update(&self, sub_task: SubTask) -> Result<SubTask, ServiceError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, ServiceError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn find_by_id(&self, id: u64) -> Result<User, ServiceError>;
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, ServiceError>;
}
