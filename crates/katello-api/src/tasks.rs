//! Aggregation and polling of server-side asynchronous tasks.
//!
//! Long-running operations (product sync, discovery, repository-set toggles)
//! answer with one or more task handles. [`AsyncTask`] treats them as a unit:
//! it is running while any member is, failed when any member failed.

use std::time::Duration;

use serde_json::Value;

use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{TaskState, TaskStatus};

/// Terminal verdict of a finished task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Every member finished successfully.
    Ok,
    /// At least one member errored or timed out.
    Failed,
    /// At least one member was canceled and none failed.
    Canceled,
}

/// One or more server tasks tracked together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsyncTask {
    tasks: Vec<TaskStatus>,
}

impl AsyncTask {
    /// Track a group of tasks.
    #[must_use]
    pub const fn new(tasks: Vec<TaskStatus>) -> Self {
        Self { tasks }
    }

    /// Track a single task.
    #[must_use]
    pub fn single(task: TaskStatus) -> Self {
        Self::new(vec![task])
    }

    /// Whether any member is still waiting or running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| task.state.is_pending())
    }

    /// Whether any member errored or timed out.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.tasks
            .iter()
            .any(|task| matches!(task.state, TaskState::Error | TaskState::TimedOut))
    }

    /// Whether any member was canceled.
    #[must_use]
    pub fn canceled(&self) -> bool {
        self.tasks
            .iter()
            .any(|task| task.state == TaskState::Canceled)
    }

    /// Verdict for a task that is no longer running.
    #[must_use]
    pub fn outcome(&self) -> TaskOutcome {
        if self.failed() {
            TaskOutcome::Failed
        } else if self.canceled() {
            TaskOutcome::Canceled
        } else {
            TaskOutcome::Ok
        }
    }

    /// Items all members have to process.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.tasks
            .iter()
            .filter_map(|task| task.progress.as_ref())
            .map(|progress| progress.total_count)
            .sum()
    }

    /// Items all members still have to process.
    #[must_use]
    pub fn items_left(&self) -> u64 {
        self.tasks
            .iter()
            .filter_map(|task| task.progress.as_ref())
            .map(|progress| progress.items_left)
            .sum()
    }

    /// Items already processed.
    #[must_use]
    pub fn completed_count(&self) -> u64 {
        self.total_count().saturating_sub(self.items_left())
    }

    /// Whole-number completion percentage; zero while the total is unknown.
    #[must_use]
    pub fn percent_complete(&self) -> u64 {
        let total = self.total_count();
        if total == 0 {
            return 0;
        }
        self.completed_count() * 100 / total
    }

    /// Result payload of the first member that reported one.
    #[must_use]
    pub fn result(&self) -> Option<&Value> {
        self.tasks.iter().find_map(|task| task.result.as_ref())
    }

    /// Error messages reported by the members.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.tasks
            .iter()
            .filter_map(|task| task.progress.as_ref())
            .flat_map(|progress| progress.error_details.iter())
            .map(|detail| match detail {
                Value::String(message) => message.clone(),
                Value::Object(map) => map
                    .get("error")
                    .and_then(Value::as_str)
                    .map_or_else(|| detail.to_string(), str::to_string),
                other => other.to_string(),
            })
            .collect()
    }
}

impl KatelloClient {
    /// Current status of one task.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn task_status(&self, uuid: &str) -> ApiResult<TaskStatus> {
        self.get_json(&["api", "tasks", uuid], &[]).await
    }

    /// Poll every pending member until all of them reach a terminal state.
    ///
    /// `observer` sees each refreshed snapshot, which lets callers render progress.
    ///
    /// # Errors
    ///
    /// Returns the first error raised while refreshing a task.
    pub async fn wait_for_task<F>(
        &self,
        mut task: AsyncTask,
        interval: Duration,
        mut observer: F,
    ) -> ApiResult<AsyncTask>
    where
        F: FnMut(&AsyncTask),
    {
        while task.is_running() {
            tokio::time::sleep(interval).await;
            let mut refreshed = Vec::with_capacity(task.tasks.len());
            for member in &task.tasks {
                if member.state.is_pending() {
                    refreshed.push(self.task_status(&member.uuid).await?);
                } else {
                    refreshed.push(member.clone());
                }
            }
            task = AsyncTask::new(refreshed);
            tracing::debug!(
                percent = task.percent_complete(),
                running = task.is_running(),
                "task poll"
            );
            observer(&task);
        }
        Ok(task)
    }
}
