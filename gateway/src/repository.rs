// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! What the use cases need from the task server.
//!
//! Task operations carry the caller's user id, which the server uses as the
//! request identity. Requests are already validated when they get here.
use async_trait::async_trait;
use common::wire::{
    Category, GetTasksRequest, NewSubTask, NewTask, SubTask, Task, UpdateTask, User,
};
use common::ServiceError;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn list_tasks(
        &self,
        caller: u64,
        filter: GetTasksRequest,
    ) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, caller: u64, input: NewTask) -> Result<Task, ServiceError>;
    async fn update_task(&self, caller: u64, input: UpdateTask) -> Result<Task, ServiceError>;
    async fn delete_task(&self, caller: u64, id: u64) -> Result<bool, ServiceError>;
    async fn toggle_task(
        &self,
        caller: u64,
        id: u64,
        completed: bool,
    ) -> Result<Task, ServiceError>;
    async fn list_sub_tasks(&self, caller: u64, task_id: u64) -> Result<Vec<SubTask>, ServiceError>;
    async fn create_sub_task(
        &self,
        caller: u64,
        input: NewSubTask,
    ) -> Result<SubTask, ServiceError>;
    async fn toggle_sub_task(
        &self,
        caller: u64,
        id: u64,
        completed: bool,
    ) -> Result<SubTask, ServiceError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Returns the id of the user owning these credentials.
    async fn login(&self, email: &str, password: &str) -> Result<u64, ServiceError>;
    async fn get_user(&self, id: u64) -> Result<User, ServiceError>;
}
