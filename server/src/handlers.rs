// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use crate::service::Services;
use axum::{
    extract::{FromRequest, FromRequestParts, Json, Request, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use common::wire::{self, USER_ID_HEADER};
use common::{ErrorCode, ServiceError};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Identity of the caller, taken from the `x-user-id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Option<u64>);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(Caller(None));
        };
        value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(|id| Caller(Some(id)))
            .ok_or_else(|| {
                ServiceError::invalid_argument(format!("malformed {USER_ID_HEADER} header")).into()
            })
    }
}

/// JSON request body whose rejection is an `InvalidArgument` error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::invalid_argument(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}

/// Handler for the health check.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// --- TaskService ---

/// Handler for `GetTasks`: lists tasks with their subtasks attached.
pub async fn get_tasks(
    State(services): State<Services>,
    Caller(caller): Caller,
    AppJson(request): AppJson<wire::GetTasksRequest>,
) -> Result<Json<wire::TaskList>, AppError> {
    debug!("Received GetTasks request: {:?}", request);

    let tasks = services.tasks.list_tasks(request.into(), caller).await?;

    let ids: Vec<u64> = tasks.iter().map(|task| task.id).collect();
    let mut sub_tasks = services.sub_tasks.list_grouped(&ids).await?;
    let list: Vec<wire::Task> = tasks
        .into_iter()
        .map(|task| {
            let children = sub_tasks.remove(&task.id).unwrap_or_default();
            wire::Task::from(task).with_sub_tasks(children)
        })
        .collect();

    info!("Successfully retrieved {} tasks.", list.len());
    Ok(Json(wire::TaskList { tasks: list }))
}

/// Handler for `CreateTask`.
pub async fn create_task(
    State(services): State<Services>,
    Caller(caller): Caller,
    AppJson(request): AppJson<wire::CreateTaskRequest>,
) -> Result<Json<wire::Task>, AppError> {
    debug!("Received CreateTask request for '{}'", request.input.title);
    let task = services
        .tasks
        .create_task(request.input.into(), caller)
        .await?;
    Ok(Json(task.into()))
}

/// Handler for `UpdateTask`: applies a partial update.
pub async fn update_task(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::UpdateTaskRequest>,
) -> Result<Json<wire::Task>, AppError> {
    debug!("Received UpdateTask request for task {}", request.input.id);
    let task = services.tasks.update_task(request.input.into()).await?;
    let sub_tasks = services.sub_tasks.list_by_task_id(task.id).await?;
    Ok(Json(wire::Task::from(task).with_sub_tasks(sub_tasks)))
}

/// Handler for `DeleteTask`.
pub async fn delete_task(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::TaskId>,
) -> Result<Json<wire::DeleteTaskResponse>, AppError> {
    debug!("Received DeleteTask request for task {}", request.id);
    let success = services.tasks.delete_task(request.id).await?;
    Ok(Json(wire::DeleteTaskResponse { success }))
}

/// Handler for `ToggleTask`.
pub async fn toggle_task(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::ToggleTaskRequest>,
) -> Result<Json<wire::Task>, AppError> {
    let task = services
        .tasks
        .toggle_completion(request.id, request.completed)
        .await?;
    info!(
        "Task with ID {} marked completed={}.",
        task.id, request.completed
    );
    let sub_tasks = services.sub_tasks.list_by_task_id(task.id).await?;
    Ok(Json(wire::Task::from(task).with_sub_tasks(sub_tasks)))
}

/// Handler for `CreateSubTask`.
pub async fn create_sub_task(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::CreateSubTaskRequest>,
) -> Result<Json<wire::SubTask>, AppError> {
    let sub_task = services.sub_tasks.create(request.input.into()).await?;
    Ok(Json(sub_task.into()))
}

/// Handler for `ToggleSubTask`.
pub async fn toggle_sub_task(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::ToggleSubTaskRequest>,
) -> Result<Json<wire::SubTask>, AppError> {
    let sub_task = services
        .sub_tasks
        .toggle_completion(request.id, request.completed)
        .await?;
    info!(
        "SubTask with ID {} marked completed={}.",
        sub_task.id, request.completed
    );
    Ok(Json(sub_task.into()))
}

/// Handler for `ListSubTasks`.
pub async fn list_sub_tasks(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::ListSubTasksRequest>,
) -> Result<Json<wire::SubTaskList>, AppError> {
    let sub_tasks = services.sub_tasks.list_by_task_id(request.task_id).await?;
    Ok(Json(wire::SubTaskList {
        sub_tasks: sub_tasks.into_iter().map(wire::SubTask::from).collect(),
    }))
}

// --- CategoryService ---

/// Handler for `GetCategories`.
pub async fn get_categories(
    State(services): State<Services>,
    AppJson(_): AppJson<wire::Empty>,
) -> Result<Json<wire::CategoryList>, AppError> {
    let categories = services.categories.list().await?;
    Ok(Json(wire::CategoryList {
        categories: categories.into_iter().map(wire::Category::from).collect(),
    }))
}

// --- AuthService ---

/// Handler for `Login`: checks credentials and returns the user id.
pub async fn login(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::LoginRequest>,
) -> Result<Json<wire::LoginResponse>, AppError> {
    let user_id = services
        .auth
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(wire::LoginResponse { user_id }))
}

/// Handler for `GetUser`.
pub async fn get_user(
    State(services): State<Services>,
    AppJson(request): AppJson<wire::GetUserRequest>,
) -> Result<Json<wire::User>, AppError> {
    let user = services.auth.get_user(request.id).await?;
    Ok(Json(user.into()))
}

// --- Error handling ---

/// An RPC failure: a status code plus the `{code, message}` body.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    body: wire::ErrorBody,
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorCode::Upstream => StatusCode::BAD_GATEWAY,
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        if matches!(err, ServiceError::Storage(_) | ServiceError::Upstream(_)) {
            // Full detail goes to the logs only.
            tracing::error!("Internal server error: {}", err);
        }
        let code = err.code();
        Self {
            status: status_for(code),
            body: wire::ErrorBody {
                code,
                message: err.public_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, code={}, message={}",
            self.status.as_u16(),
            self.body.code.as_str(),
            self.body.message
        );
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::UpdatePolicy;
    use crate::store::testing::setup_test_db;
    use axum::http::Request;

    async fn services() -> Services {
        Services::sqlite(setup_test_db().await, UpdatePolicy::default())
    }

    async fn caller_from(header: Option<&str>) -> Result<Caller, AppError> {
        let mut builder = Request::builder();
        if let Some(value) = header {
            builder = builder.header(USER_ID_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Caller::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_caller_extraction() {
        assert_eq!(caller_from(None).await.unwrap(), Caller(None));
        assert_eq!(caller_from(Some("42")).await.unwrap(), Caller(Some(42)));

        let err = caller_from(Some("forty-two")).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.code, ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_task_validation_empty_title() {
        let services = services().await;
        let request = wire::CreateTaskRequest {
            input: wire::NewTask {
                title: String::new(),
                note: "A valid note".to_string(),
                category_id: None,
                due_date: None,
            },
        };

        let err = create_task(State(services), Caller(None), AppJson(request))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.body.message, "invalid argument: title cannot be empty");
    }

    #[tokio::test]
    async fn test_toggle_unknown_subtask_is_not_found() {
        let services = services().await;
        let request = wire::ToggleSubTaskRequest {
            id: 77,
            completed: true,
        };

        let err = toggle_sub_task(State(services), AppJson(request))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.message, "subtask with id 77 not found");
    }

    #[test]
    fn test_storage_errors_hide_detail() {
        let err = AppError::from(ServiceError::storage("no such table: tasks"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.code, ErrorCode::Internal);
        assert!(!err.body.message.contains("tasks"));
    }
}
