//! User intents emitted by presentation components.
//!
//! Child components never mutate list state directly. They emit a
//! [`TaskIntent`] upward and the [`TaskListManager`] applies it, keeping
//! the single-writer discipline a structural property instead of a
//! convention.

use tracing::debug;

use super::{SubmitError, TaskListManager};
use crate::types::{TaskFilter, TaskForm, TaskUpdate};

/// An action requested by the UI.
#[derive(Debug)]
pub enum TaskIntent {
    /// Re-fetch the list with the current criteria.
    Refresh,
    /// Replace the filter criteria (triggers a re-fetch).
    SetFilter(TaskFilter),
    /// Reset the criteria to defaults (triggers a re-fetch).
    ResetFilters,
    /// Submit a new task from form input.
    Create(TaskForm),
    /// Submit a full edit of an existing task.
    Update {
        /// Target task id.
        id: i64,
        /// Edited form state.
        form: TaskForm,
    },
    /// Submit a partial edit of an existing task.
    Patch {
        /// Target task id.
        id: i64,
        /// The fields to change.
        changes: TaskUpdate,
    },
    /// Flip a task's completion state.
    ToggleCompletion {
        /// Target task id.
        id: i64,
    },
    /// Stage a task for deletion (opens the confirmation modal).
    RequestDelete {
        /// Target task id.
        id: i64,
    },
    /// Dispatch the staged deletion.
    ConfirmDelete,
    /// Drop the staged deletion.
    CancelDelete,
    /// Dismiss a notification early.
    DismissNotification {
        /// Id from [`Notification::id`](super::Notification::id).
        id: u64,
    },
}

impl TaskListManager {
    /// Applies a single intent.
    ///
    /// Form-validation failures come back so the caller can render them
    /// inline next to the form fields; every other outcome (success or
    /// API failure) is already reflected in state and notifications by
    /// the time this returns.
    pub async fn handle(&self, intent: TaskIntent) -> Result<(), Vec<crate::types::FieldError>> {
        debug!(?intent, "handling intent");
        match intent {
            TaskIntent::Refresh => self.refresh().await,
            TaskIntent::SetFilter(filter) => self.set_filter(filter).await,
            TaskIntent::ResetFilters => self.reset_filters().await,
            TaskIntent::Create(form) => {
                if let Err(SubmitError::Validation(errors)) = self.create_task(&form).await {
                    return Err(errors);
                }
            }
            TaskIntent::Update { id, form } => {
                if let Err(SubmitError::Validation(errors)) = self.update_task(id, &form).await {
                    return Err(errors);
                }
            }
            TaskIntent::Patch { id, changes } => {
                let _ = self.patch_task(id, &changes).await;
            }
            TaskIntent::ToggleCompletion { id } => {
                let _ = self.toggle_completion(id).await;
            }
            TaskIntent::RequestDelete { id } => self.request_delete(id),
            TaskIntent::ConfirmDelete => self.confirm_delete().await,
            TaskIntent::CancelDelete => self.cancel_delete(),
            TaskIntent::DismissNotification { id } => self.notifications().dismiss(id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::TaskClient;
    use crate::config::ClientConfig;
    use crate::session::MemorySessionStore;

    fn manager() -> TaskListManager {
        let config = ClientConfig::new("https://api.example.com").unwrap();
        let client =
            Arc::new(TaskClient::new(config, Arc::new(MemorySessionStore::new())).unwrap());
        TaskListManager::new(client)
    }

    #[tokio::test]
    async fn create_intent_returns_validation_errors_inline() {
        let manager = manager();
        let errors = manager
            .handle(TaskIntent::Create(TaskForm::default()))
            .await
            .unwrap_err();
        assert!(errors.iter().any(|e| e.field == "title"));
        // Validation failures never produce a notification.
        assert!(manager.notifications().active().is_empty());
    }

    #[tokio::test]
    async fn delete_intents_manage_staging_without_dispatch() {
        let manager = manager();
        manager
            .handle(TaskIntent::RequestDelete { id: 3 })
            .await
            .unwrap();
        assert_eq!(manager.pending_delete(), Some(3));

        manager.handle(TaskIntent::CancelDelete).await.unwrap();
        assert_eq!(manager.pending_delete(), None);
    }

    #[tokio::test]
    async fn dismiss_intent_removes_notification() {
        let manager = manager();
        let id = manager.notifications().success("hi");
        manager
            .handle(TaskIntent::DismissNotification { id })
            .await
            .unwrap();
        assert!(manager.notifications().active().is_empty());
    }
}
