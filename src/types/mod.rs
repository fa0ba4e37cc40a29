//! Wire types shared between the client and the task API.
//!
//! Task records and request shapes live in [`task`], list-query criteria
//! in [`filter`], and authentication payloads in [`user`]. All of them
//! serialize with `snake_case` field names matching the REST contract.

mod filter;
mod task;
mod user;

pub use filter::{SortField, SortOrder, StatusFilter, TaskFilter};
pub use task::{FieldError, Priority, RecurrenceRule, Task, TaskCreate, TaskForm, TaskUpdate};
pub use user::{AuthToken, Credentials, Registration, UserProfile};
