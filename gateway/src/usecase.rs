// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Gateway use cases: identity checks and input validation in front of the RPC calls.
//!
//! Every check here runs before the repository is called, so a rejected
//! request never reaches the task server.
use std::sync::Arc;

use async_graphql::ID;
use common::dates::parse_date_string;
use common::wire;
use common::ServiceError;
use tracing::info;

use crate::model::{self, Category, SubTask, Task, User};
use crate::repository::{AuthRepository, CategoryRepository, TodoRepository};

fn require_user(caller: Option<u64>) -> Result<u64, ServiceError> {
    caller.ok_or_else(|| ServiceError::unauthenticated("login required"))
}

fn parse_id(id: &ID, field: &str) -> Result<u64, ServiceError> {
    id.trim().parse::<u64>().map_err(|_| {
        ServiceError::invalid_argument(format!("{field}: {:?} is not a valid id", id.as_str()))
    })
}

fn parse_optional_id(id: Option<&ID>, field: &str) -> Result<Option<u64>, ServiceError> {
    id.map(|id| parse_id(id, field)).transpose()
}

#[derive(Clone)]
pub struct TodoUsecase {
    repo: Arc<dyn TodoRepository>,
}

impl TodoUsecase {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_tasks(
        &self,
        caller: Option<u64>,
        filter: Option<model::TaskFilter>,
    ) -> Result<Vec<Task>, ServiceError> {
        let user_id = require_user(caller)?;
        let filter = filter.unwrap_or_default();
        let request = wire::GetTasksRequest {
            category_id: parse_optional_id(filter.category_id.as_ref(), "categoryId")?,
            due_date_start: parse_date_string(filter.due_date_start.as_deref())?,
            due_date_end: parse_date_string(filter.due_date_end.as_deref())?,
            incomplete_only: filter.incomplete_only,
        };

        let tasks = self.repo.list_tasks(user_id, request).await?;
        Ok(tasks.into_iter().map(Task::from).collect())
    }

    pub async fn create_task(
        &self,
        caller: Option<u64>,
        input: model::NewTask,
    ) -> Result<Task, ServiceError> {
        let user_id = require_user(caller)?;
        let request = wire::NewTask {
            title: input.title,
            note: input.note,
            category_id: parse_optional_id(input.category_id.as_ref(), "categoryId")?,
            due_date: parse_date_string(input.due_date.as_deref())?,
        };

        let task = self.repo.create_task(user_id, request).await?;
        info!("User {} created task {}", user_id, task.id);
        Ok(task.into())
    }

    // The caller is forwarded but the task server does not check ownership on writes yet.
    pub async fn update_task(
        &self,
        caller: Option<u64>,
        input: model::UpdateTask,
    ) -> Result<Task, ServiceError> {
        let user_id = require_user(caller)?;
        let request = wire::UpdateTask {
            id: parse_id(&input.id, "id")?,
            title: input.title,
            note: input.note,
            completed: input.completed,
            completed_at: None,
            category_id: parse_optional_id(input.category_id.as_ref(), "categoryId")?,
            due_date: parse_date_string(input.due_date.as_deref())?,
        };

        Ok(self.repo.update_task(user_id, request).await?.into())
    }

    pub async fn delete_task(&self, caller: Option<u64>, id: &ID) -> Result<bool, ServiceError> {
        let user_id = require_user(caller)?;
        let id = parse_id(id, "id")?;
        self.repo.delete_task(user_id, id).await
    }

    pub async fn toggle_task(
        &self,
        caller: Option<u64>,
        id: &ID,
        completed: bool,
    ) -> Result<Task, ServiceError> {
        let user_id = require_user(caller)?;
        let id = parse_id(id, "id")?;
        Ok(self.repo.toggle_task(user_id, id, completed).await?.into())
    }

    pub async fn list_sub_tasks(
        &self,
        caller: Option<u64>,
        task_id: &ID,
    ) -> Result<Vec<SubTask>, ServiceError> {
        let user_id = require_user(caller)?;
        let task_id = parse_id(task_id, "taskId")?;
        let sub_tasks = self.repo.list_sub_tasks(user_id, task_id).await?;
        Ok(sub_tasks.into_iter().map(SubTask::from).collect())
    }

    pub async fn create_sub_task(
        &self,
        caller: Option<u64>,
        input: model::NewSubTask,
    ) -> Result<SubTask, ServiceError> {
        let user_id = require_user(caller)?;
        let request = wire::NewSubTask {
            task_id: parse_id(&input.task_id, "taskId")?,
            title: input.title,
            note: input.note.unwrap_or_default(),
            due_date: parse_date_string(input.due_date.as_deref())?,
        };

        Ok(self.repo.create_sub_task(user_id, request).await?.into())
    }

    pub async fn toggle_sub_task(
        &self,
        caller: Option<u64>,
        id: &ID,
        completed: bool,
    ) -> Result<SubTask, ServiceError> {
        let user_id = require_user(caller)?;
        let id = parse_id(id, "id")?;
        Ok(self.repo.toggle_sub_task(user_id, id, completed).await?.into())
    }
}

#[derive(Clone)]
pub struct CategoryUsecase {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryUsecase {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }
}

#[derive(Clone)]
pub struct AuthUsecase {
    repo: Arc<dyn AuthRepository>,
}

impl AuthUsecase {
    pub fn new(repo: Arc<dyn AuthRepository>) -> Self {
        Self { repo }
    }

    /// Checks the credentials and returns the matching user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ServiceError::invalid_argument(
                "email and password are required",
            ));
        }
        let user_id = self.repo.login(email, password).await?;
        Ok(self.repo.get_user(user_id).await?.into())
    }

    pub async fn get_user(&self, id: u64) -> Result<User, ServiceError> {
        Ok(self.repo.get_user(id).await?.into())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use rstest::rstest;

    fn usecase() -> (TodoUsecase, Arc<FakeBackend>) {
        let backend = Arc::new(FakeBackend::default());
        (TodoUsecase::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_unauthenticated_calls_never_reach_the_backend() {
        let (usecase, backend) = usecase();

        let err = usecase.list_tasks(None, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
        let err = usecase.delete_task(None, &ID::from("1")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
        let err = usecase
            .toggle_sub_task(None, &ID::from("1"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));

        assert!(backend.calls().is_empty());
    }

    #[rstest]
    #[case("2024-02-30")]
    #[case("2024/03/01")]
    #[case("tomorrow")]
    #[tokio::test]
    async fn test_invalid_due_date_is_rejected_before_rpc(#[case] due_date: &str) {
        let (usecase, backend) = usecase();
        let input = model::NewTask {
            title: "Pay rent".to_string(),
            due_date: Some(due_date.to_string()),
            ..model::NewTask::default()
        };

        let err = usecase.create_task(Some(7), input).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_filter_is_translated() {
        let (usecase, backend) = usecase();
        let filter = model::TaskFilter {
            category_id: Some(ID::from("2")),
            due_date_start: Some(" ".to_string()),
            due_date_end: Some("2024-03-31".to_string()),
            incomplete_only: Some(true),
        };

        let tasks = usecase.list_tasks(Some(7), Some(filter)).await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(backend.calls(), vec!["list_tasks:7".to_string()]);
        let sent = backend.last_filter.lock().clone().unwrap();
        assert_eq!(sent.category_id, Some(2));
        assert_eq!(sent.due_date_start, None);
        assert_eq!(
            sent.due_date_end,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 31)
        );
        assert_eq!(sent.incomplete_only, Some(true));
    }

    #[tokio::test]
    async fn test_bad_id_is_invalid_argument() {
        let (usecase, backend) = usecase();
        let err = usecase
            .toggle_task(Some(7), &ID::from("abc"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_task_renders_due_date() {
        let (usecase, _) = usecase();
        let input = model::NewTask {
            title: "Pay rent".to_string(),
            due_date: Some("2024-03-01".to_string()),
            ..model::NewTask::default()
        };

        let task = usecase.create_task(Some(7), input).await.unwrap();

        assert_eq!(task.title, "Pay rent");
        assert_eq!(task.due_date.as_deref(), Some("2024-03-01"));
    }

    #[tokio::test]
    async fn test_login_resolves_user() {
        let backend = Arc::new(FakeBackend::default());
        let auth = AuthUsecase::new(backend.clone());

        let user = auth.login("ada@example.com", "s3cret").await.unwrap();
        assert_eq!(user.id, ID::from("7"));
        assert_eq!(backend.calls(), vec!["login".to_string(), "get_user".to_string()]);

        let err = auth.login("ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated(_)));
    }
}
