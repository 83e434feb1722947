// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Business rules of the task service, independent of transport and storage.
mod auth;
mod category;
mod subtask;
mod task;

use std::sync::Arc;

use sqlx::SqlitePool;

pub use auth::{hash_password, verify_password, AuthService};
pub use category::CategoryService;
pub use subtask::SubTaskService;
pub use task::{apply_update, TaskService, UpdatePolicy};

use crate::store::{
    SqliteCategoryRepository, SqliteSubTaskRepository, SqliteTaskRepository,
    SqliteUserRepository,
};

/// Everything the RPC handlers need, shared as router state.
#[derive(Clone)]
pub struct Services {
    pub tasks: TaskService,
    pub sub_tasks: SubTaskService,
    pub categories: CategoryService,
    pub auth: AuthService,
}

impl Services {
    /// Wires every service to SQLite repositories sharing `pool`.
    pub fn sqlite(pool: SqlitePool, policy: UpdatePolicy) -> Self {
        let tasks = Arc::new(SqliteTaskRepository::new(pool.clone()));
        Self {
            tasks: TaskService::new(tasks.clone(), policy),
            sub_tasks: SubTaskService::new(
                Arc::new(SqliteSubTaskRepository::new(pool.clone())),
                tasks,
            ),
            categories: CategoryService::new(Arc::new(SqliteCategoryRepository::new(
                pool.clone(),
            ))),
            auth: AuthService::new(Arc::new(SqliteUserRepository::new(pool))),
        }
    }
}
