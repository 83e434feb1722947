// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Result, Schema, ID};
use axum::http::header::SET_COOKIE;
use common::ServiceError;
use tracing::error;

use crate::model::{Category, NewSubTask, NewTask, SubTask, Task, TaskFilter, UpdateTask, User};
use crate::session::SessionManager;
use crate::usecase::{AuthUsecase, CategoryUsecase, TodoUsecase};

pub type TaskSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Identity attached to each GraphQL request, resolved from the session cookie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Option<u64>,
    pub session_id: Option<String>,
}

pub fn build_schema(
    todos: TodoUsecase,
    categories: CategoryUsecase,
    auth: AuthUsecase,
    sessions: SessionManager,
) -> TaskSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(todos)
        .data(categories)
        .data(auth)
        .data(sessions)
        .finish()
}

pub fn graphiql(endpoint: &str) -> String {
    GraphiQLSource::build().endpoint(endpoint).finish()
}

/// Converts a service failure into a GraphQL error carrying `extensions.code`.
pub fn to_graphql_error(err: ServiceError) -> async_graphql::Error {
    if matches!(err, ServiceError::Storage(_) | ServiceError::Upstream(_)) {
        error!("Request failed: {}", err);
    }
    let code = err.code().as_str();
    async_graphql::Error::new(err.public_message()).extend_with(|_, e| e.set("code", code))
}

fn caller(ctx: &Context<'_>) -> Caller {
    ctx.data_opt::<Caller>().cloned().unwrap_or_default()
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn tasks(&self, ctx: &Context<'_>, filter: Option<TaskFilter>) -> Result<Vec<Task>> {
        ctx.data::<TodoUsecase>()?
            .list_tasks(caller(ctx).user_id, filter)
            .await
            .map_err(to_graphql_error)
    }

    async fn sub_tasks(&self, ctx: &Context<'_>, task_id: ID) -> Result<Vec<SubTask>> {
        ctx.data::<TodoUsecase>()?
            .list_sub_tasks(caller(ctx).user_id, &task_id)
            .await
            .map_err(to_graphql_error)
    }

    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        ctx.data::<CategoryUsecase>()?
            .list()
            .await
            .map_err(to_graphql_error)
    }

    /// The logged-in user, or null.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(user_id) = caller(ctx).user_id else {
            return Ok(None);
        };
        match ctx.data::<AuthUsecase>()?.get_user(user_id).await {
            Ok(user) => Ok(Some(user)),
            // The account behind a live session is gone.
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(err) => Err(to_graphql_error(err)),
        }
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_task(&self, ctx: &Context<'_>, input: NewTask) -> Result<Task> {
        ctx.data::<TodoUsecase>()?
            .create_task(caller(ctx).user_id, input)
            .await
            .map_err(to_graphql_error)
    }

    async fn update_task(&self, ctx: &Context<'_>, input: UpdateTask) -> Result<Task> {
        ctx.data::<TodoUsecase>()?
            .update_task(caller(ctx).user_id, input)
            .await
            .map_err(to_graphql_error)
    }

    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        ctx.data::<TodoUsecase>()?
            .delete_task(caller(ctx).user_id, &id)
            .await
            .map_err(to_graphql_error)
    }

    async fn toggle_task(&self, ctx: &Context<'_>, id: ID, completed: bool) -> Result<Task> {
        ctx.data::<TodoUsecase>()?
            .toggle_task(caller(ctx).user_id, &id, completed)
            .await
            .map_err(to_graphql_error)
    }

    async fn create_sub_task(&self, ctx: &Context<'_>, input: NewSubTask) -> Result<SubTask> {
        ctx.data::<TodoUsecase>()?
            .create_sub_task(caller(ctx).user_id, input)
            .await
            .map_err(to_graphql_error)
    }

    async fn toggle_sub_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        completed: bool,
    ) -> Result<SubTask> {
        ctx.data::<TodoUsecase>()?
            .toggle_sub_task(caller(ctx).user_id, &id, completed)
            .await
            .map_err(to_graphql_error)
    }

    /// Starts a session and sets the session cookie.
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<User> {
        let user = ctx
            .data::<AuthUsecase>()?
            .login(&email, &password)
            .await
            .map_err(to_graphql_error)?;
        let user_id = user.id.parse::<u64>().map_err(|_| {
            to_graphql_error(ServiceError::upstream("login returned a malformed user id"))
        })?;

        let sessions = ctx.data::<SessionManager>()?;
        let token = sessions.create_session(user_id);
        ctx.insert_http_header(SET_COOKIE, sessions.session_cookie(token).to_string());
        Ok(user)
    }

    /// Ends the current session, if any, and clears the cookie.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let sessions = ctx.data::<SessionManager>()?;
        if let Some(session_id) = caller(ctx).session_id {
            sessions.delete_session(&session_id);
        }
        ctx.insert_http_header(SET_COOKIE, sessions.removal_cookie().to_string());
        Ok(true)
    }
}
