//! Async Rust client for the Taskdeck task-tracking API.
//!
//! Taskdeck is a multi-user task tracker; this crate is the client side:
//! typed CRUD over the REST API, query/filter composition, client-side
//! input sanitization, per-operation rate limiting, session handling, and
//! a list state manager that keeps a local task collection consistent
//! with the latest server response.
//!
//! # Overview
//!
//! The pieces compose leaf to root:
//!
//! - [`sanitize`] - pure functions cleaning free-text fields before
//!   submission
//! - [`rate_limit`] - per-key sliding-window gate that delays (never
//!   rejects) over-quota calls
//! - [`client`] - authenticated HTTP calls with origin verification and
//!   status-to-error mapping
//! - [`session`] - token storage plus a cancellable background
//!   re-validation task
//! - [`state`] - the task-list manager: local collection, filter
//!   criteria, derived counts, notifications, and the intent enum the UI
//!   drives it with
//! - [`types`] - wire types shared with the API
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskdeck::session::MemorySessionStore;
//! use taskdeck::state::{TaskIntent, TaskListManager};
//! use taskdeck::types::TaskForm;
//! use taskdeck::{ClientConfig, TaskClient};
//!
//! # async fn example() -> Result<(), taskdeck::ClientError> {
//! let config = ClientConfig::from_env()?;
//! let client = Arc::new(TaskClient::new(config, Arc::new(MemorySessionStore::new()))?);
//! let manager = TaskListManager::new(Arc::clone(&client));
//!
//! manager.handle(TaskIntent::Refresh).await.ok();
//! println!("{} tasks", manager.counts().total);
//!
//! let form = TaskForm {
//!     title: "Write the release notes".to_string(),
//!     ..TaskForm::default()
//! };
//! if let Err(field_errors) = manager.handle(TaskIntent::Create(form)).await {
//!     for err in field_errors {
//!         eprintln!("{err}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod rate_limit;
pub mod sanitize;
pub mod session;
pub mod state;
pub mod types;

// Re-exports for ergonomic access
pub use client::TaskClient;
pub use config::ClientConfig;
pub use error::{ClientError, GENERIC_FAILURE_MESSAGE};
pub use rate_limit::RateLimiter;
pub use session::{MemorySessionStore, Session, SessionMonitor, SessionProvider};
pub use state::{
    Notification, NotificationCenter, NotificationKind, SubmitError, TaskCounts, TaskIntent,
    TaskListManager,
};
pub use types::{
    FieldError, Priority, RecurrenceRule, SortField, SortOrder, StatusFilter, Task, TaskCreate,
    TaskFilter, TaskForm, TaskUpdate,
};
