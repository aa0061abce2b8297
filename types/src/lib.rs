//! Core domain types for Taskdesk.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

mod ids;
mod pagination;
mod sanitize;
mod schema;
mod sort;
mod text;

pub use ids::TaskId;
pub use pagination::Pagination;
pub use sanitize::sanitize_terminal_text;
pub use schema::{Field, FieldErrors, Rule, Schema};
pub use sort::{SortColumn, SortDirection, SortState};
pub use text::DraftInput;

use serde::{Deserialize, Serialize};

/// Rows per page when the configuration does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Quiescence interval applied to the search box, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

// ============================================================================
// Task records
// ============================================================================

/// A task record as exchanged with the task API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub full_name: String,
    pub title: String,
    pub description: String,
}

impl Task {
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            full_name: draft.full_name,
            title: draft.title,
            description: draft.description,
        }
    }

    #[must_use]
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            full_name: self.full_name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// Form payload: a task without its identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub full_name: String,
    pub title: String,
    pub description: String,
}

impl TaskDraft {
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Title => &self.title,
            Field::Description => &self.description,
        }
    }
}

/// One page of a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    /// Number of records matching the query across all pages.
    pub total: u64,
}

// ============================================================================
// Query keys
// ============================================================================

/// The parameters that uniquely identify a list query result.
///
/// `search` is the debounced search term, never the raw text in the search box.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub search: String,
    pub page: u32,
    pub page_size: u32,
}

impl QueryKey {
    #[must_use]
    pub fn new(search: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            search: search.into(),
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// The search term as the task API should see it, if any.
    #[must_use]
    pub fn search_filter(&self) -> Option<&str> {
        let trimmed = self.search.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "tasks[search={:?}, page={}, size={}]",
            self.search, self.page, self.page_size
        )
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}
