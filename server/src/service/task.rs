// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::model::{Completion, NewTask, Task, TaskFilter, UpdateTaskRequest};
use common::ServiceError;
use tracing::{debug, info};

use crate::repository::TaskRepository;

/// How the generic update path treats `completed_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    /// When `false` (the default), `completed` is copied as-is and `completed_at`
    /// only changes when the request carries it, so an update can leave a task
    /// completed without a completion time. When `true`, a change of `completed`
    /// without an explicit `completed_at` stamps or clears it like a toggle.
    pub derive_completed_at: bool,
}

/// Merges the fields present in `request` into `task`. Absent fields keep their value.
pub fn apply_update(
    mut task: Task,
    request: UpdateTaskRequest,
    policy: UpdatePolicy,
    now: DateTime<Utc>,
) -> Task {
    let was_completed = task.completed != 0;

    if let Some(title) = request.title {
        task.title = title;
    }
    if let Some(note) = request.note {
        task.note = note;
    }
    if let Some(category_id) = request.category_id {
        task.category_id = normalize_category(Some(category_id));
    }
    if let Some(due_date) = request.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(completed) = request.completed {
        task.completed = completed;
    }

    match (request.completed_at, request.completed) {
        (Some(completed_at), _) => task.completed_at = Some(completed_at),
        (None, Some(completed)) if policy.derive_completed_at => {
            if completed == 0 {
                task.completed_at = None;
            } else if !was_completed || task.completed_at.is_none() {
                task.completed_at = Some(now);
            }
        }
        _ => {}
    }

    task
}

fn normalize_category(category_id: Option<u64>) -> Option<u64> {
    category_id.filter(|id| *id != 0)
}

fn require_title(title: &str) -> Result<(), ServiceError> {
    if title.trim().is_empty() {
        return Err(ServiceError::invalid_argument("title cannot be empty"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    policy: UpdatePolicy,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>, policy: UpdatePolicy) -> Self {
        Self { repo, policy }
    }

    /// Lists tasks matching `filter`. A known caller only sees the tasks they own.
    pub async fn list_tasks(
        &self,
        mut filter: TaskFilter,
        caller: Option<u64>,
    ) -> Result<Vec<Task>, ServiceError> {
        if caller.is_some() {
            filter.user_id = caller;
        }
        let tasks = self.repo.find_all(&filter).await?;
        debug!("Found {} tasks for filter {:?}", tasks.len(), filter);
        Ok(tasks)
    }

    pub async fn create_task(
        &self,
        input: NewTask,
        owner: Option<u64>,
    ) -> Result<Task, ServiceError> {
        require_title(&input.title)?;

        let now = Utc::now();
        let task = Task {
            id: 0,
            title: input.title,
            note: input.note,
            completed: 0,
            completed_at: None,
            due_date: input.due_date,
            category_id: normalize_category(input.category_id),
            user_id: owner,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create(task).await?;
        info!("Task created with ID: {}", created.id);
        Ok(created)
    }

    // TODO: take the caller here and in delete_task/toggle_completion and reject
    // writes to tasks whose user_id belongs to someone else.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> Result<Task, ServiceError> {
        if let Some(title) = &request.title {
            require_title(title)?;
        }

        let existing = self.repo.find_by_id(request.id).await?;
        let merged = apply_update(existing, request, self.policy, Utc::now());
        let updated = self.repo.update(merged).await?;

        info!("Task with ID {} updated.", updated.id);
        Ok(updated)
    }

    /// Returns `false` when there was no task with that id.
    pub async fn delete_task(&self, id: u64) -> Result<bool, ServiceError> {
        let deleted = self.repo.delete(id).await?;
        if deleted {
            info!("Task with ID {} deleted.", id);
        } else {
            debug!("Task with ID {} not found for deletion.", id);
        }
        Ok(deleted)
    }

    pub async fn toggle_completion(&self, id: u64, completed: bool) -> Result<Task, ServiceError> {
        let mut task = self.repo.find_by_id(id).await?;
        task.mark_completed(completed, Utc::now());
        self.repo.update(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::setup_test_db;
    use crate::store::SqliteTaskRepository;
    use chrono::{Duration, NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn existing() -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        Task {
            id: 5,
            title: "old".to_string(),
            note: "n".to_string(),
            completed: 0,
            completed_at: None,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            category_id: Some(1),
            user_id: Some(3),
            created_at: created,
            updated_at: created,
        }
    }

    async fn service(policy: UpdatePolicy) -> TaskService {
        let repo = SqliteTaskRepository::new(setup_test_db().await);
        TaskService::new(Arc::new(repo), policy)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            ..NewTask::default()
        }
    }

    #[test]
    fn test_update_only_touches_present_fields() {
        let mut request = UpdateTaskRequest::new(5);
        request.title = Some("x".to_string());

        let merged = apply_update(existing(), request, UpdatePolicy::default(), Utc::now());

        assert_eq!(merged.title, "x");
        assert_eq!(merged.note, "n");
        assert_eq!(merged.due_date, existing().due_date);
        assert_eq!(merged.category_id, Some(1));
        assert_eq!(merged.completed, 0);
    }

    #[test]
    fn test_category_zero_clears_category() {
        let mut request = UpdateTaskRequest::new(5);
        request.category_id = Some(0);

        let merged = apply_update(existing(), request, UpdatePolicy::default(), Utc::now());
        assert_eq!(merged.category_id, None);
    }

    #[test]
    fn test_completed_is_copied_without_timestamp_by_default() {
        let mut request = UpdateTaskRequest::new(5);
        request.completed = Some(1);

        let merged = apply_update(existing(), request, UpdatePolicy::default(), Utc::now());
        assert_eq!(merged.completed, 1);
        assert_eq!(merged.completed_at, None);
    }

    #[test]
    fn test_derive_policy_stamps_and_clears_completed_at() {
        let policy = UpdatePolicy {
            derive_completed_at: true,
        };
        let now = Utc::now();

        let mut complete = UpdateTaskRequest::new(5);
        complete.completed = Some(1);
        let done = apply_update(existing(), complete, policy, now);
        assert_eq!(done.completed_at, Some(now));

        // Re-asserting the same state keeps the original completion time.
        let mut again = UpdateTaskRequest::new(5);
        again.completed = Some(1);
        let still_done = apply_update(done.clone(), again, policy, now + Duration::hours(1));
        assert_eq!(still_done.completed_at, Some(now));

        let mut reopen = UpdateTaskRequest::new(5);
        reopen.completed = Some(0);
        let reopened = apply_update(still_done, reopen, policy, now);
        assert_eq!(reopened.completed, 0);
        assert_eq!(reopened.completed_at, None);
    }

    #[test]
    fn test_explicit_completed_at_wins() {
        let policy = UpdatePolicy {
            derive_completed_at: true,
        };
        let when = Utc.with_ymd_and_hms(2023, 12, 24, 18, 0, 0).unwrap();
        let mut request = UpdateTaskRequest::new(5);
        request.completed = Some(1);
        request.completed_at = Some(when);

        let merged = apply_update(existing(), request, policy, Utc::now());
        assert_eq!(merged.completed_at, Some(when));
    }

    fn arb_request() -> impl Strategy<Value = UpdateTaskRequest> {
        (
            proptest::option::of("[a-z]{1,8}"),
            proptest::option::of("[a-z ]{0,12}"),
            proptest::option::of(0i32..2),
            proptest::option::of(1u64..10),
            proptest::option::of(0i64..365),
        )
            .prop_map(|(title, note, completed, category_id, due_offset)| UpdateTaskRequest {
                id: 5,
                title,
                note,
                completed,
                completed_at: None,
                category_id,
                due_date: due_offset
                    .map(|d| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(d)),
            })
    }

    proptest! {
        #[test]
        fn prop_patch_semantics(request in arb_request()) {
            let original = existing();
            let merged = apply_update(
                original.clone(),
                request.clone(),
                UpdatePolicy::default(),
                Utc::now(),
            );

            prop_assert_eq!(&merged.title, request.title.as_ref().unwrap_or(&original.title));
            prop_assert_eq!(&merged.note, request.note.as_ref().unwrap_or(&original.note));
            prop_assert_eq!(merged.completed, request.completed.unwrap_or(original.completed));
            prop_assert_eq!(merged.category_id, request.category_id.or(original.category_id));
            prop_assert_eq!(merged.due_date, request.due_date.or(original.due_date));
            prop_assert_eq!(merged.completed_at, original.completed_at);
            prop_assert_eq!(merged.id, original.id);
            prop_assert_eq!(merged.user_id, original.user_id);
            prop_assert_eq!(merged.created_at, original.created_at);
        }
    }

    #[tokio::test]
    async fn test_update_task_persists_patch() {
        let service = service(UpdatePolicy::default()).await;
        let created = service
            .create_task(
                NewTask {
                    title: "old".to_string(),
                    note: "n".to_string(),
                    ..NewTask::default()
                },
                None,
            )
            .await
            .unwrap();

        let mut request = UpdateTaskRequest::new(created.id);
        request.title = Some("x".to_string());
        let updated = service.update_task(request).await.unwrap();

        assert_eq!(updated.title, "x");
        assert_eq!(updated.note, "n");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let service = service(UpdatePolicy::default()).await;

        let mut request = UpdateTaskRequest::new(12);
        request.note = Some("nothing".to_string());

        let err = service.update_task(request).await.unwrap_err();
        assert_eq!(err, ServiceError::not_found("task", 12));
    }

    #[tokio::test]
    async fn test_empty_titles_are_rejected() {
        let service = service(UpdatePolicy::default()).await;

        let err = service.create_task(new_task("   "), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let created = service.create_task(new_task("ok"), None).await.unwrap();
        let mut request = UpdateTaskRequest::new(created.id);
        request.title = Some(String::new());
        let err = service.update_task(request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_toggle_completion_maintains_invariant() {
        let service = service(UpdatePolicy::default()).await;
        let created = service.create_task(new_task("toggle me"), None).await.unwrap();
        assert_eq!(created.completed, 0);

        let before = Utc::now();
        let done = service.toggle_completion(created.id, true).await.unwrap();
        assert_eq!(done.completed, 1);
        let completed_at = done.completed_at.expect("completed_at must be set");
        assert!(completed_at >= before && completed_at <= Utc::now());

        let reopened = service.toggle_completion(created.id, false).await.unwrap();
        assert_eq!(reopened.completed, 0);
        assert_eq!(reopened.completed_at, None);
    }

    #[tokio::test]
    async fn test_list_tasks_is_scoped_to_caller() {
        let service = service(UpdatePolicy::default()).await;
        service.create_task(new_task("mine"), Some(1)).await.unwrap();
        service.create_task(new_task("theirs"), Some(2)).await.unwrap();

        let mine = service.list_tasks(TaskFilter::default(), Some(1)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "mine");

        let all = service.list_tasks(TaskFilter::default(), None).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_task_was_removed() {
        let service = service(UpdatePolicy::default()).await;
        let created = service.create_task(new_task("short lived"), None).await.unwrap();

        assert!(service.delete_task(created.id).await.unwrap());
        assert!(!service.delete_task(created.id).await.unwrap());
    }
}
