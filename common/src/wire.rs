// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Messages exchanged between the gateway and the task server.
//!
//! Every RPC is an HTTP `POST` of a JSON request message to one of the
//! [`path`] constants, answered by a JSON response message or by an
//! [`ErrorBody`]. Optional fields are nullable and may be omitted.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::model;

/// Request metadata carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

pub mod path {
    pub const GET_TASKS: &str = "/rpc/TaskService/GetTasks";
    pub const CREATE_TASK: &str = "/rpc/TaskService/CreateTask";
    pub const UPDATE_TASK: &str = "/rpc/TaskService/UpdateTask";
    pub const DELETE_TASK: &str = "/rpc/TaskService/DeleteTask";
    pub const TOGGLE_TASK: &str = "/rpc/TaskService/ToggleTask";
    pub const CREATE_SUB_TASK: &str = "/rpc/TaskService/CreateSubTask";
    pub const TOGGLE_SUB_TASK: &str = "/rpc/TaskService/ToggleSubTask";
    pub const LIST_SUB_TASKS: &str = "/rpc/TaskService/ListSubTasks";
    pub const GET_CATEGORIES: &str = "/rpc/CategoryService/GetCategories";
    pub const LOGIN: &str = "/rpc/AuthService/Login";
    pub const GET_USER: &str = "/rpc/AuthService/GetUser";
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Empty {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub category_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubTask {
    pub id: u64,
    pub task_id: u64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubTaskList {
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTasksRequest {
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub due_date_start: Option<NaiveDate>,
    #[serde(default)]
    pub due_date_end: Option<NaiveDate>,
    #[serde(default)]
    pub incomplete_only: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub input: NewTask,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub input: UpdateTask,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteTaskResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleTaskRequest {
    pub id: u64,
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSubTask {
    pub task_id: u64,
    pub title: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateSubTaskRequest {
    pub input: NewSubTask,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleSubTaskRequest {
    pub id: u64,
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSubTasksRequest {
    pub task_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginResponse {
    pub user_id: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetUserRequest {
    pub id: u64,
}

// --- Domain <-> wire conversions ---

impl From<model::Task> for Task {
    fn from(task: model::Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            note: task.note,
            completed: task.completed,
            completed_at: task.completed_at,
            due_date: task.due_date,
            category_id: task.category_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
            sub_tasks: Vec::new(),
        }
    }
}

impl Task {
    pub fn with_sub_tasks(mut self, sub_tasks: Vec<model::SubTask>) -> Self {
        self.sub_tasks = sub_tasks.into_iter().map(SubTask::from).collect();
        self
    }
}

impl From<model::SubTask> for SubTask {
    fn from(sub: model::SubTask) -> Self {
        Self {
            id: sub.id,
            task_id: sub.task_id,
            title: sub.title,
            note: sub.note,
            completed: sub.completed,
            completed_at: sub.completed_at,
            due_date: sub.due_date,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

impl From<model::Category> for Category {
    fn from(category: model::Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

// The password hash stays on the server.
impl From<model::User> for User {
    fn from(user: model::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<NewTask> for model::NewTask {
    fn from(input: NewTask) -> Self {
        Self {
            title: input.title,
            note: input.note,
            category_id: input.category_id,
            due_date: input.due_date,
        }
    }
}

impl From<NewSubTask> for model::NewSubTask {
    fn from(input: NewSubTask) -> Self {
        Self {
            task_id: input.task_id,
            title: input.title,
            note: input.note,
            due_date: input.due_date,
        }
    }
}

impl From<UpdateTask> for model::UpdateTaskRequest {
    fn from(input: UpdateTask) -> Self {
        Self {
            id: input.id,
            title: input.title,
            note: input.note,
            completed: input.completed,
            completed_at: input.completed_at,
            category_id: input.category_id,
            due_date: input.due_date,
        }
    }
}

impl From<GetTasksRequest> for model::TaskFilter {
    fn from(request: GetTasksRequest) -> Self {
        Self {
            category_id: request.category_id,
            due_date_from: request.due_date_start,
            due_date_to: request.due_date_end,
            incomplete_only: request.incomplete_only,
            user_id: None,
        }
    }
}
