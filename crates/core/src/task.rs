//! Tracked background tasks.
//!
//! Detached work (webhook fan-out, proposal synthesis) must never block
//! or fail its trigger, but pure fire-and-forget makes failures
//! invisible. [`TaskTracker::spawn`] keeps the never-block contract
//! while exposing each task's terminal status through a `watch`
//! channel: pending, succeeded, or failed.
//!
//! Handles never cancel their task, and process shutdown may silently
//! drop in-flight tasks. That is the accepted best-effort tradeoff.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::watch;

use crate::error::CoreError;

/// How many finished-or-running tasks the tracker remembers.
const TRACKED_CAPACITY: usize = 128;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a tracked background task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Succeeded,
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// TaskHandle
// ---------------------------------------------------------------------------

/// Observer handle for one tracked task.
///
/// Dropping the handle does not cancel the task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    name: String,
    status: watch::Receiver<TaskStatus>,
}

impl TaskHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status snapshot.
    pub fn status(&self) -> TaskStatus {
        self.status.borrow().clone()
    }

    /// Wait until the task reaches a terminal status and return it.
    pub async fn finished(&self) -> TaskStatus {
        let mut rx = self.status.clone();
        let terminal = rx
            .wait_for(|s| *s != TaskStatus::Pending)
            .await
            .map(|status| status.clone());
        match terminal {
            Ok(status) => status,
            // Sender dropped; the last observed value is the answer.
            Err(_) => self.status.borrow().clone(),
        }
    }
}

/// Serializable snapshot of one task for the observability endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub name: String,
    pub status: TaskStatus,
}

// ---------------------------------------------------------------------------
// TaskTracker
// ---------------------------------------------------------------------------

/// Registry of detached background tasks.
///
/// Shared via `Arc<TaskTracker>`; `spawn` is callable from sync and
/// async contexts alike.
#[derive(Debug, Default)]
pub struct TaskTracker {
    recent: Mutex<VecDeque<TaskHandle>>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a detached task and track its status.
    ///
    /// The future's error is logged and recorded as `Failed`; it never
    /// propagates to the caller. The returned handle is also retained
    /// internally (bounded, oldest dropped first) for reporting.
    pub fn spawn<F>(&self, name: impl Into<String>, fut: F) -> TaskHandle
    where
        F: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        let name = name.into();
        let (tx, rx) = watch::channel(TaskStatus::Pending);

        let task_name = name.clone();
        tokio::spawn(async move {
            match fut.await {
                Ok(()) => {
                    tracing::debug!(task = %task_name, "Background task succeeded");
                    let _ = tx.send(TaskStatus::Succeeded);
                }
                Err(e) => {
                    tracing::error!(task = %task_name, error = %e, "Background task failed");
                    let _ = tx.send(TaskStatus::Failed {
                        message: e.to_string(),
                    });
                }
            }
        });

        let handle = TaskHandle { name, status: rx };

        let mut recent = self.recent.lock().expect("task tracker lock poisoned");
        if recent.len() == TRACKED_CAPACITY {
            recent.pop_front();
        }
        recent.push_back(handle.clone());

        handle
    }

    /// Snapshot of recently spawned tasks, oldest first.
    pub fn snapshot(&self) -> Vec<TaskReport> {
        let recent = self.recent.lock().expect("task tracker lock poisoned");
        recent
            .iter()
            .map(|h| TaskReport {
                name: h.name.clone(),
                status: h.status(),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
