//! Core task wire types and form validation.
//!
//! [`Task`] is the server-owned record as it appears on the wire; the
//! client holds cached copies and never fabricates one. [`TaskCreate`]
//! and [`TaskUpdate`] are the request shapes for POST and PUT/PATCH.
//! [`TaskForm`] is raw user input; [`TaskForm::validate`] sanitizes it
//! and enforces the field invariants, producing either a submittable
//! [`TaskCreate`] or per-field [`FieldError`]s for inline display.
//!
//! # Serialization
//!
//! Field names are `snake_case` exactly as the REST contract uses them.
//! Timestamps stay ISO-8601 `String`s on the wire types; the server is
//! the only party that assigns them. `TaskCreate` has no `user_id` field
//! at all -- ownership is set server-side from the authenticated session
//! and is never client-supplied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sanitize::{
    is_valid_date, sanitize_description, sanitize_tags, sanitize_title, MAX_TAGS,
};

/// Task priority.
///
/// # Examples
///
/// ```
/// use taskdeck::types::Priority;
///
/// assert_eq!(serde_json::to_value(Priority::High).unwrap(), "high");
/// assert_eq!(Priority::Medium.to_string(), "medium");
/// assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Highest urgency.
    High,
    /// Default urgency.
    Medium,
    /// Lowest urgency.
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// Recurrence cadence, required whenever a task is marked recurring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// Repeats every day.
    Daily,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// A task record as returned by the server.
///
/// The client treats this as a cached copy: `id`, `user_id`,
/// `created_at`, and `updated_at` are server-assigned and never edited
/// locally.
///
/// # Examples
///
/// ```
/// use taskdeck::types::Task;
///
/// let json = r#"{
///     "id": 7,
///     "title": "Write report",
///     "completed": false,
///     "tags": ["work"],
///     "is_recurring": false,
///     "created_at": "2024-05-01T09:00:00",
///     "updated_at": "2024-05-01T09:00:00",
///     "user_id": "user-1"
/// }"#;
///
/// let task: Task = serde_json::from_str(json).unwrap();
/// assert_eq!(task.id, 7);
/// assert!(task.description.is_none());
/// assert_eq!(task.tags, vec!["work"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned unique identifier.
    pub id: i64,

    /// Task title, non-empty and sanitized before it ever left a client.
    pub title: String,

    /// Optional longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Completion state.
    pub completed: bool,

    /// Optional priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Ordered tag list, at most 10 entries.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Optional ISO-8601 due timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Whether the task repeats. When `true`, `recurrence_rule` is set.
    #[serde(default)]
    pub is_recurring: bool,

    /// Cadence for recurring tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,

    /// Server-assigned creation timestamp (ISO-8601).
    pub created_at: String,

    /// Server-assigned last-update timestamp (ISO-8601).
    pub updated_at: String,

    /// Owner identifier, set by the server from the session.
    pub user_id: String,
}

/// Request body for creating a task (POST `/tasks`).
///
/// Deliberately has no `user_id` field: the server derives ownership
/// from the session token, and the client must not supply it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCreate {
    /// Sanitized, non-empty title.
    pub title: String,

    /// Sanitized description, omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Initial completion state.
    #[serde(default)]
    pub completed: bool,

    /// Optional priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Sanitized tag list.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Optional validated ISO-8601 due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Whether the task repeats.
    #[serde(default)]
    pub is_recurring: bool,

    /// Cadence, present iff `is_recurring`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,
}

/// Request body for full (PUT) or partial (PATCH) task updates.
///
/// Every field is optional; unset fields are omitted from the JSON body
/// so a PATCH touches only what the caller set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// New completion state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,

    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// New due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// New recurring flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_recurring: Option<bool>,

    /// New cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<RecurrenceRule>,
}

/// A single field-level validation failure, for inline display next to
/// the offending form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// The form field that failed (`"title"`, `"due_date"`, ...).
    pub field: &'static str,
    /// User-facing message.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw user input for the task form, before sanitization or validation.
///
/// # Examples
///
/// ```
/// use taskdeck::types::TaskForm;
///
/// let form = TaskForm {
///     title: "  Ship the <script>x</script>release  ".to_string(),
///     tags: vec!["v2!".to_string(), "".to_string()],
///     ..TaskForm::default()
/// };
///
/// let create = form.validate().unwrap();
/// assert_eq!(create.title, "Ship the release");
/// assert_eq!(create.tags, vec!["v2"]);
///
/// let bad = TaskForm {
///     is_recurring: true,
///     ..TaskForm::default()
/// };
/// let errors = bad.validate().unwrap_err();
/// assert!(errors.iter().any(|e| e.field == "title"));
/// assert!(errors.iter().any(|e| e.field == "recurrence_rule"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    /// Raw title text.
    pub title: String,
    /// Raw description text.
    pub description: String,
    /// Selected priority, if any.
    pub priority: Option<Priority>,
    /// Raw tag entries.
    pub tags: Vec<String>,
    /// Raw due-date text (empty means unset).
    pub due_date: String,
    /// Whether the recurring toggle is on.
    pub is_recurring: bool,
    /// Selected cadence, if any.
    pub recurrence_rule: Option<RecurrenceRule>,
    /// Completion checkbox (edit flows only; creation defaults false).
    pub completed: bool,
}

impl TaskForm {
    /// Sanitizes and validates the form into a [`TaskCreate`].
    ///
    /// Rules enforced:
    /// - title must be non-empty after sanitization;
    /// - at most [`MAX_TAGS`] tags may be supplied;
    /// - the due date, when present, must be a valid ISO-8601 value;
    /// - a recurring task must carry a recurrence rule.
    ///
    /// # Errors
    ///
    /// Returns every failed rule as a [`FieldError`], so the UI can mark
    /// all offending fields in one pass.
    pub fn validate(&self) -> Result<TaskCreate, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = sanitize_title(&self.title);
        if title.is_empty() {
            errors.push(FieldError {
                field: "title",
                message: "Title is required".to_string(),
            });
        }

        if self.tags.len() > MAX_TAGS {
            errors.push(FieldError {
                field: "tags",
                message: format!("At most {MAX_TAGS} tags are allowed"),
            });
        }

        let due_date = self.due_date.trim();
        if !is_valid_date(due_date) {
            errors.push(FieldError {
                field: "due_date",
                message: "Invalid due date".to_string(),
            });
        }

        if self.is_recurring && self.recurrence_rule.is_none() {
            errors.push(FieldError {
                field: "recurrence_rule",
                message: "Recurrence rule is required for recurring tasks".to_string(),
            });
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = sanitize_description(&self.description);
        Ok(TaskCreate {
            title,
            description: (!description.is_empty()).then_some(description),
            completed: self.completed,
            priority: self.priority,
            tags: sanitize_tags(&self.tags),
            due_date: (!due_date.is_empty()).then(|| due_date.to_string()),
            is_recurring: self.is_recurring,
            recurrence_rule: self.recurrence_rule,
        })
    }

    /// Sanitizes and validates the form into a full [`TaskUpdate`] for a
    /// PUT, carrying every field. Same rules as [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns every failed rule as a [`FieldError`].
    pub fn validate_update(&self) -> Result<TaskUpdate, Vec<FieldError>> {
        let create = self.validate()?;
        Ok(TaskUpdate {
            title: Some(create.title),
            description: create.description,
            completed: Some(create.completed),
            priority: create.priority,
            tags: Some(create.tags),
            due_date: create.due_date,
            is_recurring: Some(create.is_recurring),
            recurrence_rule: create.recurrence_rule,
        })
    }
}
