//! Client-side task-list state.
//!
//! [`TaskListManager`] owns the authoritative local view of the task
//! collection: the cached task list, the current filter criteria, derived
//! counts, the loading flag, and the delete-confirmation stage. It is the
//! single writer of that state; presentation code reads snapshots and
//! emits [`TaskIntent`]s upward instead of mutating anything directly.
//!
//! The server is the source of truth for filtering and sorting: every
//! refresh replaces the whole local collection with the response, with no
//! incremental merge and no client-side re-filtering. Overlapping
//! refreshes are serialized by a generation counter -- each fetch is
//! tagged with a sequence number at issue time, and a response whose
//! sequence is no longer the latest is discarded, so the list can never
//! be overwritten by a stale response that happened to resolve last.

mod intent;
mod notify;

pub use intent::TaskIntent;
pub use notify::{Notification, NotificationCenter, NotificationKind};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::client::TaskClient;
use crate::error::ClientError;
use crate::types::{FieldError, Task, TaskFilter, TaskForm, TaskUpdate};

/// Why a form submission did not go through.
#[derive(Debug)]
pub enum SubmitError {
    /// Client-side validation failed; shown inline per field, never as a
    /// notification.
    Validation(Vec<FieldError>),
    /// The API rejected the call (already surfaced as a notification).
    Api(ClientError),
}

/// Counts derived from the full local collection.
///
/// Recomputed on every collection change. `pending` is defined as
/// `total - completed` rather than an independent predicate, so the three
/// values are internally consistent by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    /// All cached tasks.
    pub total: usize,
    /// Tasks not yet completed.
    pub pending: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl TaskCounts {
    fn tally(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            pending: total - completed,
            completed,
        }
    }
}

#[derive(Debug, Default)]
struct ListState {
    tasks: Vec<Task>,
    counts: TaskCounts,
    filter: TaskFilter,
    loading: bool,
    pending_delete: Option<i64>,
}

/// Owns the in-memory task collection and reconciles API results into it.
pub struct TaskListManager {
    client: Arc<TaskClient>,
    notifications: NotificationCenter,
    fetch_seq: AtomicU64,
    inner: RwLock<ListState>,
}

impl std::fmt::Debug for TaskListManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("TaskListManager")
            .field("tasks", &inner.tasks.len())
            .field("loading", &inner.loading)
            .finish_non_exhaustive()
    }
}

impl TaskListManager {
    /// Creates a manager over `client`, with the notification lifetime
    /// taken from the client's configuration.
    pub fn new(client: Arc<TaskClient>) -> Self {
        let notifications = NotificationCenter::new(client.config().notification_ttl());
        Self {
            client,
            notifications,
            fetch_seq: AtomicU64::new(0),
            inner: RwLock::new(ListState::default()),
        }
    }

    // ---- snapshots ----

    /// Snapshot of the cached collection, in server order.
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.read().tasks.clone()
    }

    /// Current derived counts.
    pub fn counts(&self) -> TaskCounts {
        self.inner.read().counts
    }

    /// Current filter criteria.
    pub fn filter(&self) -> TaskFilter {
        self.inner.read().filter.clone()
    }

    /// Whether a list fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// The task id staged for deletion, if the confirmation modal is up.
    pub fn pending_delete(&self) -> Option<i64> {
        self.inner.read().pending_delete
    }

    /// The notification center backing this manager.
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    // ---- list fetching ----

    /// Re-fetches the list with the current criteria and replaces the
    /// local collection. Failures surface as an error notification; the
    /// collection is left unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let filter = {
            let mut inner = self.inner.write();
            inner.loading = true;
            inner.filter.clone()
        };

        let result = self.client.list_tasks(&filter).await;
        self.apply_list_result(seq, result);
    }

    /// Reconciles a list response issued under sequence `seq`. A response
    /// superseded by a newer fetch is discarded wholesale; the newer fetch
    /// owns the loading flag.
    fn apply_list_result(&self, seq: u64, result: Result<Vec<Task>, ClientError>) {
        if seq != self.fetch_seq.load(Ordering::SeqCst) {
            debug!(seq, "discarding stale list response");
            return;
        }

        let mut inner = self.inner.write();
        inner.loading = false;
        match result {
            Ok(tasks) => {
                inner.counts = TaskCounts::tally(&tasks);
                inner.tasks = tasks;
            }
            Err(err) => {
                drop(inner);
                self.notifications.error(err.to_string());
            }
        }
    }

    /// Replaces the filter criteria and re-fetches.
    pub async fn set_filter(&self, filter: TaskFilter) {
        self.inner.write().filter = filter;
        self.refresh().await;
    }

    /// Resets the criteria to defaults and re-fetches.
    pub async fn reset_filters(&self) {
        self.inner.write().filter = TaskFilter::default();
        self.refresh().await;
    }

    // ---- mutations ----

    /// Validates and submits a new task. On success the created task is
    /// prepended to the collection (the server returns it in its final
    /// shape; its sorted position is not recomputed locally).
    ///
    /// # Errors
    ///
    /// [`SubmitError::Validation`] when the form fails client-side checks
    /// (no request is made); [`SubmitError::Api`] when the server rejects
    /// the create, after an error notification has been pushed.
    #[instrument(skip(self, form))]
    pub async fn create_task(&self, form: &TaskForm) -> Result<Task, SubmitError> {
        let create = form.validate().map_err(SubmitError::Validation)?;

        match self.client.create_task(&create).await {
            Ok(task) => {
                {
                    let mut inner = self.inner.write();
                    inner.tasks.insert(0, task.clone());
                    inner.counts = TaskCounts::tally(&inner.tasks);
                }
                self.notifications.success("Task created successfully");
                Ok(task)
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(SubmitError::Api(err))
            }
        }
    }

    /// Submits a full update for `id` and replaces the matching entry in
    /// place, preserving collection order.
    ///
    /// # Errors
    ///
    /// Same contract as [`create_task`](Self::create_task).
    pub async fn update_task(&self, id: i64, form: &TaskForm) -> Result<Task, SubmitError> {
        let update = form.validate_update().map_err(SubmitError::Validation)?;
        self.push_update(self.client.update_task(id, &update).await)
            .map(|task| {
                self.notifications.success("Task updated successfully");
                task
            })
    }

    /// Submits a partial update for `id`; only set fields are sent.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Api`] when the server rejects the patch.
    pub async fn patch_task(&self, id: i64, update: &TaskUpdate) -> Result<Task, SubmitError> {
        self.push_update(self.client.patch_task(id, update).await)
            .map(|task| {
                self.notifications.success("Task updated successfully");
                task
            })
    }

    /// Toggles completion through the dedicated endpoint and replaces the
    /// entry in place. The notification reflects the new state.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Api`] when the server rejects the toggle.
    #[instrument(skip(self))]
    pub async fn toggle_completion(&self, id: i64) -> Result<Task, SubmitError> {
        self.push_update(self.client.toggle_completion(id).await)
            .map(|task| {
                if task.completed {
                    self.notifications.success("Task marked as completed");
                } else {
                    self.notifications.success("Task marked as pending");
                }
                task
            })
    }

    /// Reconciles a single-task mutation result into the collection.
    ///
    /// When the returned id is no longer present locally (deleted
    /// elsewhere in the meantime), the collection is left unchanged and a
    /// conflict notification is surfaced so the user knows their edit
    /// landed on a task this view no longer shows.
    fn push_update(&self, result: Result<Task, ClientError>) -> Result<Task, SubmitError> {
        match result {
            Ok(task) => {
                let replaced = {
                    let mut inner = self.inner.write();
                    let slot = inner.tasks.iter_mut().find(|t| t.id == task.id);
                    match slot {
                        Some(slot) => {
                            *slot = task.clone();
                            inner.counts = TaskCounts::tally(&inner.tasks);
                            true
                        }
                        None => false,
                    }
                };
                if !replaced {
                    self.notifications
                        .error("Task is no longer in the list. Refresh to see the latest tasks.");
                }
                Ok(task)
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(SubmitError::Api(err))
            }
        }
    }

    // ---- delete confirmation ----

    /// Stages `id` for deletion. Nothing is sent until
    /// [`confirm_delete`](Self::confirm_delete); the UI shows the
    /// confirmation modal while a stage is set.
    pub fn request_delete(&self, id: i64) {
        self.inner.write().pending_delete = Some(id);
    }

    /// Clears the staged deletion without sending anything.
    pub fn cancel_delete(&self) {
        self.inner.write().pending_delete = None;
    }

    /// Dispatches the staged deletion. On success the entry is removed
    /// and the stage cleared; on failure the stage is kept so the user
    /// can retry from the still-open modal. Does nothing when no
    /// deletion is staged.
    #[instrument(skip(self))]
    pub async fn confirm_delete(&self) {
        let Some(id) = self.inner.read().pending_delete else {
            return;
        };

        match self.client.delete_task(id).await {
            Ok(()) => {
                {
                    let mut inner = self.inner.write();
                    inner.tasks.retain(|t| t.id != id);
                    inner.counts = TaskCounts::tally(&inner.tasks);
                    inner.pending_delete = None;
                }
                self.notifications.success("Task deleted successfully");
            }
            Err(err) => {
                debug!(id, error = %err, "delete failed");
                self.notifications.error("Failed to delete task");
            }
        }
    }
}
