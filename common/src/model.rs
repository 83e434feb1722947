// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, NaiveDate, Utc};

/// A todo task.
///
/// `completed` is kept as an integer flag (0 = open, anything else = done).
/// `completed_at` is set if and only if the task is completed; the toggle
/// operation maintains that, storage does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<DateTime<Utc>>,
    // Day precision only, no timezone.
    pub due_date: Option<NaiveDate>,
    // `None` means uncategorized.
    pub category_id: Option<u64>,
    // Owner recorded at creation time, when the caller was known.
    pub user_id: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A step belonging to exactly one parent task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTask {
    pub id: u64,
    pub task_id: u64,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only reference data used to group tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub email: String,
    // PHC-formatted hash, never sent over the wire.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a task. Everything else is assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub title: String,
    pub note: String,
    pub category_id: Option<u64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewSubTask {
    pub task_id: u64,
    pub title: String,
    pub note: String,
    pub due_date: Option<NaiveDate>,
}

/// A sparse update of a task. Only the fields that are `Some` are written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdateTaskRequest {
    pub id: u64,
    pub title: Option<String>,
    pub note: Option<String>,
    pub completed: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
    // `Some(0)` moves the task back to "uncategorized".
    pub category_id: Option<u64>,
    pub due_date: Option<NaiveDate>,
}

impl UpdateTaskRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// Independently optional constraints over the task list, combined with AND.
///
/// A field left to `None` does not constrain that dimension.
/// `incomplete_only == Some(false)` is the same as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFilter {
    pub category_id: Option<u64>,
    pub due_date_from: Option<NaiveDate>,
    pub due_date_to: Option<NaiveDate>,
    pub incomplete_only: Option<bool>,
    pub user_id: Option<u64>,
}

impl TaskFilter {
    pub fn is_unconstrained(&self) -> bool {
        self.category_id.is_none()
            && self.due_date_from.is_none()
            && self.due_date_to.is_none()
            && self.incomplete_only != Some(true)
            && self.user_id.is_none()
    }

    /// In-memory form of the predicate the store pushes into SQL.
    ///
    /// Date bounds are inclusive, and a task without a due date never
    /// satisfies a bound.
    pub fn matches(&self, task: &Task) -> bool {
        self.category_id
            .is_none_or(|id| task.category_id == Some(id))
            && self
                .due_date_from
                .is_none_or(|from| task.due_date.is_some_and(|due| due >= from))
            && self
                .due_date_to
                .is_none_or(|to| task.due_date.is_some_and(|due| due <= to))
            && (self.incomplete_only != Some(true) || task.completed == 0)
            && self.user_id.is_none_or(|id| task.user_id == Some(id))
    }
}

/// Entities carrying a completion flag with its companion timestamp.
pub trait Completion {
    fn set_completion(&mut self, completed: i32, completed_at: Option<DateTime<Utc>>);

    /// Sets the flag and keeps `completed_at` consistent with it.
    /// Completing an already completed entity moves `completed_at` to `now`.
    fn mark_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if completed {
            self.set_completion(1, Some(now));
        } else {
            self.set_completion(0, None);
        }
    }
}

impl Completion for Task {
    fn set_completion(&mut self, completed: i32, completed_at: Option<DateTime<Utc>>) {
        self.completed = completed;
        self.completed_at = completed_at;
    }
}

impl Completion for SubTask {
    fn set_completion(&mut self, completed: i32, completed_at: Option<DateTime<Utc>>) {
        self.completed = completed;
        self.completed_at = completed_at;
    }
}
