// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! HTTP client for the task server's RPC surface, implementing the repositories.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::wire::{self, path, USER_ID_HEADER};
use common::{ErrorCode, ServiceError};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::repository::{AuthRepository, CategoryRepository, TodoRepository};

#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    base_url: String,
}

impl RpcClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build the RPC HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Posts `request` to `path` and decodes the reply.
    /// Server-side internal errors and transport failures surface as `Upstream`.
    async fn call<Req, Resp>(
        &self,
        path: &str,
        caller: Option<u64>,
        request: &Req,
    ) -> Result<Resp, ServiceError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        debug!("RPC call {}", path);
        let mut builder = self.client.post(format!("{}{}", self.base_url, path));
        if let Some(user_id) = caller {
            builder = builder.header(USER_ID_HEADER, user_id.to_string());
        }

        let response = builder.json(request).send().await.map_err(|e| {
            error!("RPC {} failed: {}", path, e);
            if e.is_timeout() {
                ServiceError::upstream(format!("{path}: deadline exceeded"))
            } else {
                ServiceError::upstream(format!("{path}: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<Resp>().await.map_err(|e| {
                error!("RPC {} returned an undecodable body: {}", path, e);
                ServiceError::upstream(format!("{path}: invalid response: {e}"))
            });
        }

        let body = response.json::<wire::ErrorBody>().await.ok();
        Err(map_error(path, status, body))
    }
}

fn map_error(path: &str, status: StatusCode, body: Option<wire::ErrorBody>) -> ServiceError {
    let message = body
        .as_ref()
        .map(|b| b.message.clone())
        .unwrap_or_else(|| status.to_string());
    let code = body.map(|b| b.code);

    match (status, code) {
        (StatusCode::NOT_FOUND, Some(ErrorCode::NotFound)) => ServiceError::NotFound(message),
        (StatusCode::BAD_REQUEST, _) => ServiceError::InvalidArgument(message),
        (StatusCode::UNAUTHORIZED, _) => ServiceError::Unauthenticated(message),
        _ => {
            error!("RPC {} failed with status {}: {}", path, status, message);
            ServiceError::upstream(format!("{path}: {status}: {message}"))
        }
    }
}

// Message prefixes added by the server are stripped so errors are not reported twice.
fn strip_prefix(error: ServiceError) -> ServiceError {
    match error {
        ServiceError::InvalidArgument(m) => ServiceError::InvalidArgument(
            m.strip_prefix("invalid argument: ").map(str::to_string).unwrap_or(m),
        ),
        ServiceError::Unauthenticated(m) => ServiceError::Unauthenticated(
            m.strip_prefix("unauthenticated: ").map(str::to_string).unwrap_or(m),
        ),
        other => other,
    }
}

#[async_trait]
impl TodoRepository for RpcClient {
    async fn list_tasks(
        &self,
        caller: u64,
        filter: wire::GetTasksRequest,
    ) -> Result<Vec<wire::Task>, ServiceError> {
        let list: wire::TaskList = self
            .call(path::GET_TASKS, Some(caller), &filter)
            .await
            .map_err(strip_prefix)?;
        Ok(list.tasks)
    }

    async fn create_task(
        &self,
        caller: u64,
        input: wire::NewTask,
    ) -> Result<wire::Task, ServiceError> {
        self.call(path::CREATE_TASK, Some(caller), &wire::CreateTaskRequest { input })
            .await
            .map_err(strip_prefix)
    }

    async fn update_task(
        &self,
        caller: u64,
        input: wire::UpdateTask,
    ) -> Result<wire::Task, ServiceError> {
        self.call(path::UPDATE_TASK, Some(caller), &wire::UpdateTaskRequest { input })
            .await
            .map_err(strip_prefix)
    }

    async fn delete_task(&self, caller: u64, id: u64) -> Result<bool, ServiceError> {
        let response: wire::DeleteTaskResponse = self
            .call(path::DELETE_TASK, Some(caller), &wire::TaskId { id })
            .await
            .map_err(strip_prefix)?;
        Ok(response.success)
    }

    async fn toggle_task(
        &self,
        caller: u64,
        id: u64,
        completed: bool,
    ) -> Result<wire::Task, ServiceError> {
        self.call(
            path::TOGGLE_TASK,
            Some(caller),
            &wire::ToggleTaskRequest { id, completed },
        )
        .await
        .map_err(strip_prefix)
    }

    async fn list_sub_tasks(
        &self,
        caller: u64,
        task_id: u64,
    ) -> Result<Vec<wire::SubTask>, ServiceError> {
        let list: wire::SubTaskList = self
            .call(
                path::LIST_SUB_TASKS,
                Some(caller),
                &wire::ListSubTasksRequest { task_id },
            )
            .await
            .map_err(strip_prefix)?;
        Ok(list.sub_tasks)
    }

    async fn create_sub_task(
        &self,
        caller: u64,
        input: wire::NewSubTask,
    ) -> Result<wire::SubTask, ServiceError> {
        self.call(
            path::CREATE_SUB_TASK,
            Some(caller),
            &wire::CreateSubTaskRequest { input },
        )
        .await
        .map_err(strip_prefix)
    }

    async fn toggle_sub_task(
        &self,
        caller: u64,
        id: u64,
        completed: bool,
    ) -> Result<wire::SubTask, ServiceError> {
        self.call(
            path::TOGGLE_SUB_TASK,
            Some(caller),
            &wire::ToggleSubTaskRequest { id, completed },
        )
        .await
        .map_err(strip_prefix)
    }
}

#[async_trait]
impl CategoryRepository for RpcClient {
    async fn list_categories(&self) -> Result<Vec<wire::Category>, ServiceError> {
        let list: wire::CategoryList = self
            .call(path::GET_CATEGORIES, None, &wire::Empty {})
            .await
            .map_err(strip_prefix)?;
        Ok(list.categories)
    }
}

#[async_trait]
impl AuthRepository for RpcClient {
    async fn login(&self, email: &str, password: &str) -> Result<u64, ServiceError> {
        let request = wire::LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: wire::LoginResponse = self
            .call(path::LOGIN, None, &request)
            .await
            .map_err(strip_prefix)?;
        Ok(response.user_id)
    }

    async fn get_user(&self, id: u64) -> Result<wire::User, ServiceError> {
        self.call(path::GET_USER, None, &wire::GetUserRequest { id })
            .await
            .map_err(strip_prefix)
    }
}
