//! User-facing feedback: transient toasts and blocking alerts.
//!
//! Toasts expire on their own and never take focus. An [`Alert`] blocks all
//! other input until it is dismissed.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use taskdesk_types::NotificationKind;

pub const TASK_ADDED: &str = "Task added successfully!";
pub const TASK_UPDATED: &str = "Task updated";
pub const TASK_DELETED: &str = "Task deleted";
pub const CREATE_FAILED: &str = "Failed to add task";
pub const UPDATE_FAILED: &str = "Update failed";
pub const DELETE_FAILED: &str = "Delete failed";
pub const LOAD_FAILED: &str = "Failed to load tasks";

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(4);
pub const TASK_ADDED_DURATION: Duration = Duration::from_secs(8);

/// Oldest toasts are dropped past this many.
const MAX_VISIBLE_TOASTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: NotificationKind,
    pub message: String,
    expires_at: Instant,
}

impl Toast {
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Duration,
        now: Instant,
    ) {
        let message = message.into();
        tracing::debug!(?kind, %message, "Toast");
        self.toasts.push_back(Toast {
            kind,
            message,
            expires_at: now + duration,
        });
        while self.toasts.len() > MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.push(
            NotificationKind::Success,
            message,
            DEFAULT_TOAST_DURATION,
            now,
        );
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.push(NotificationKind::Error, message, DEFAULT_TOAST_DURATION, now);
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|toast| !toast.is_expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    /// Whether a toast with exactly this message is showing.
    #[must_use]
    pub fn contains(&self, message: &str) -> bool {
        self.toasts.iter().any(|toast| toast.message == message)
    }
}

/// Modal message that must be acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    MissingFields,
    LoginSuccess,
    LoginFailed,
}

impl Alert {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "Please fill in all fields",
            Self::LoginSuccess => "Login Success",
            Self::LoginFailed => "Login Failed",
        }
    }
}
