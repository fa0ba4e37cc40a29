//! Filter, sort, and pagination criteria for the task list endpoint.
//!
//! A [`TaskFilter`] is client-local and ephemeral: created with defaults,
//! mutated by the filter UI, sent verbatim as query parameters, and reset
//! to defaults on explicit user action. Unset fields are omitted from the
//! query string entirely; the server applies its own defaults.

use serde::{Deserialize, Serialize};

use super::Priority;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Both pending and completed tasks (the default; omitted on the wire).
    #[default]
    All,
    /// Only tasks with `completed == false`.
    Pending,
    /// Only tasks with `completed == true`.
    Completed,
}

impl StatusFilter {
    fn as_param(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Pending => Some("pending"),
            Self::Completed => Some("completed"),
        }
    }
}

/// Field the server sorts the list by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Creation timestamp.
    CreatedAt,
    /// Due date.
    DueDate,
    /// Priority.
    Priority,
    /// Title, lexicographic.
    Title,
}

impl SortField {
    fn as_param(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Criteria for listing tasks.
///
/// The server is the source of truth for filtering and sorting; the client
/// never re-filters locally. [`Default`] is the unfiltered view.
///
/// # Examples
///
/// ```
/// use taskdeck::types::{SortField, SortOrder, StatusFilter, TaskFilter};
///
/// let filter = TaskFilter {
///     status: StatusFilter::Completed,
///     sort: Some(SortField::DueDate),
///     order: Some(SortOrder::Asc),
///     ..TaskFilter::default()
/// };
///
/// assert_eq!(
///     filter.query_pairs(),
///     vec![
///         ("status".to_string(), "completed".to_string()),
///         ("sort".to_string(), "due_date".to_string()),
///         ("order".to_string(), "asc".to_string()),
///     ]
/// );
///
/// // The default filter sends no parameters at all.
/// assert!(TaskFilter::default().query_pairs().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    /// Completion status; [`StatusFilter::All`] is omitted on the wire.
    pub status: StatusFilter,
    /// Priority to match exactly.
    pub priority: Option<Priority>,
    /// Single tag to match.
    pub tag: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Upper bound on due date (ISO-8601).
    pub due_before: Option<String>,
    /// Lower bound on due date (ISO-8601).
    pub due_after: Option<String>,
    /// Sort field; server default when unset.
    pub sort: Option<SortField>,
    /// Sort direction; server default when unset.
    pub order: Option<SortOrder>,
    /// Pagination offset.
    pub skip: Option<u32>,
    /// Pagination page size.
    pub limit: Option<u32>,
}

impl TaskFilter {
    /// Renders the criteria as query pairs, in a fixed order, omitting
    /// unset fields and empty strings.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: String| {
            if !value.is_empty() {
                pairs.push((key.to_string(), value));
            }
        };

        if let Some(status) = self.status.as_param() {
            push("status", status.to_string());
        }
        if let Some(priority) = self.priority {
            push("priority", priority.to_string());
        }
        if let Some(tag) = &self.tag {
            push("tag", tag.clone());
        }
        if let Some(search) = &self.search {
            push("search", search.clone());
        }
        if let Some(due_before) = &self.due_before {
            push("due_before", due_before.clone());
        }
        if let Some(due_after) = &self.due_after {
            push("due_after", due_after.clone());
        }
        if let Some(sort) = self.sort {
            push("sort", sort.as_param().to_string());
        }
        if let Some(order) = self.order {
            push("order", order.as_param().to_string());
        }
        if let Some(skip) = self.skip {
            push("skip", skip.to_string());
        }
        if let Some(limit) = self.limit {
            push("limit", limit.to_string());
        }

        pairs
    }
}
