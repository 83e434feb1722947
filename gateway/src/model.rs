// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

//! Client-facing shapes of the GraphQL API.
//!
//! Dates are `YYYY-MM-DD` strings and timestamps `YYYY-MM-DD HH:MM:SS` in the
//! gateway's local time.
use async_graphql::{InputObject, SimpleObject, ID};
use common::dates::{format_date, format_timestamp};
use common::wire;

#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: ID,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<String>,
    pub due_date: Option<String>,
    pub category_id: Option<ID>,
    pub created_at: String,
    pub updated_at: String,
    pub sub_tasks: Vec<SubTask>,
}

#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct SubTask {
    pub id: ID,
    pub task_id: ID,
    pub title: String,
    pub note: String,
    pub completed: i32,
    pub completed_at: Option<String>,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: ID,
    pub name: String,
}

#[derive(SimpleObject, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: ID,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(InputObject, Debug, Clone, Default)]
#[graphql(name = "TaskFilterInput")]
pub struct TaskFilter {
    pub category_id: Option<ID>,
    pub due_date_start: Option<String>,
    pub due_date_end: Option<String>,
    pub incomplete_only: Option<bool>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    #[graphql(default)]
    pub note: String,
    pub category_id: Option<ID>,
    pub due_date: Option<String>,
}

/// Fields left out are not changed.
#[derive(InputObject, Debug, Clone, Default)]
pub struct UpdateTask {
    pub id: ID,
    pub title: Option<String>,
    pub note: Option<String>,
    pub completed: Option<i32>,
    /// `0` moves the task back to "uncategorized".
    pub category_id: Option<ID>,
    pub due_date: Option<String>,
}

#[derive(InputObject, Debug, Clone, Default)]
pub struct NewSubTask {
    pub task_id: ID,
    pub title: String,
    pub note: Option<String>,
    pub due_date: Option<String>,
}

pub(crate) fn id(value: u64) -> ID {
    ID::from(value.to_string())
}

impl From<wire::Task> for Task {
    fn from(task: wire::Task) -> Self {
        Self {
            id: id(task.id),
            title: task.title,
            note: task.note,
            completed: task.completed,
            completed_at: task.completed_at.map(format_timestamp),
            due_date: task.due_date.map(format_date),
            // 0 never names a category.
            category_id: task.category_id.filter(|c| *c != 0).map(id),
            created_at: format_timestamp(task.created_at),
            updated_at: format_timestamp(task.updated_at),
            sub_tasks: task.sub_tasks.into_iter().map(SubTask::from).collect(),
        }
    }
}

impl From<wire::SubTask> for SubTask {
    fn from(sub_task: wire::SubTask) -> Self {
        Self {
            id: id(sub_task.id),
            task_id: id(sub_task.task_id),
            title: sub_task.title,
            note: sub_task.note,
            completed: sub_task.completed,
            completed_at: sub_task.completed_at.map(format_timestamp),
            due_date: sub_task.due_date.map(format_date),
            created_at: format_timestamp(sub_task.created_at),
            updated_at: format_timestamp(sub_task.updated_at),
        }
    }
}

impl From<wire::Category> for Category {
    fn from(category: wire::Category) -> Self {
        Self {
            id: id(category.id),
            name: category.name,
        }
    }
}

impl From<wire::User> for User {
    fn from(user: wire::User) -> Self {
        Self {
            id: id(user.id),
            email: user.email,
            created_at: format_timestamp(user.created_at),
            updated_at: format_timestamp(user.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn test_task_conversion_formats_dates() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let task = wire::Task {
            id: 3,
            title: "Report".to_string(),
            note: String::new(),
            completed: 0,
            completed_at: None,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            category_id: Some(0),
            created_at: created,
            updated_at: created,
            sub_tasks: Vec::new(),
        };

        let converted = Task::from(task);

        assert_eq!(converted.id, ID::from("3"));
        assert_eq!(converted.due_date.as_deref(), Some("2024-03-09"));
        assert_eq!(converted.category_id, None);
        assert_eq!(converted.completed_at, None);
        assert_eq!(converted.created_at, format_timestamp(created));
        assert_eq!(converted.created_at.len(), "2024-03-01 12:00:00".len());
    }
}
