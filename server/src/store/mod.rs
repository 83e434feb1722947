// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! SQLite implementations of the repository traits.
mod category_store;
pub mod dto;
mod subtask_store;
mod task_store;
mod user_store;

pub use category_store::SqliteCategoryRepository;
pub use subtask_store::SqliteSubTaskRepository;
pub use task_store::SqliteTaskRepository;
pub use user_store::SqliteUserRepository;

use common::ServiceError;

/// Wraps a driver error into an opaque storage failure, keeping the detail for the logs.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> ServiceError {
    move |err| ServiceError::storage(format!("{context}: {err}"))
}
