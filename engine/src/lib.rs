//! Core engine for Taskdesk: state store and synchronization logic.
//!
//! This crate contains the [`App`] state store without terminal
//! dependencies:
//!
//! - **List synchronization**: key-addressed fetch cache with
//!   last-request-wins ordering ([`list`])
//! - **Search debounce**: quiescence timer on the search box ([`debounce`])
//! - **Forms**: schema-validated create/edit form ([`form`]) and the login
//!   form ([`login`])
//! - **Routing**: `/login` and the guarded `/` ([`router`])
//! - **Feedback**: toasts and blocking alerts ([`notifications`])
//!
//! The TUI layer (`taskdesk_tui`) reads state from `App` and forwards input
//! back to it. No rendering logic lives in this crate.

mod app;
pub mod debounce;
pub mod form;
pub mod list;
pub mod login;
pub mod notifications;
pub mod router;
#[cfg(any(test, feature = "test-harness"))]
pub mod testing;

pub use app::{App, DeleteConfirm, Focus, ListOptions, Modal};
pub use debounce::Debouncer;
pub use form::{FormMode, Submission, TaskForm};
pub use list::{FetchOutcome, FetchTicket, ListView, QueryCache, RequestId, TaskList};
pub use login::{LoginField, LoginForm};
pub use notifications::{Alert, Toast, ToastQueue};
pub use router::{Route, guard};

pub use taskdesk_client::{ApiClient, SessionContext};
pub use taskdesk_types::{
    Field, NotificationKind, Pagination, SortColumn, SortDirection, Task, TaskDraft, TaskId,
    TaskPage,
};
