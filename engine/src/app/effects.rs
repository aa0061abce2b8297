//! Spawned network operations and how their results land.

use std::future::Future;
use std::time::Instant;

use tracing::{debug, warn};

use taskdesk_client::{ApiError, LoginResponse};
use taskdesk_types::{NotificationKind, Task, TaskId, TaskPage};

use super::{App, Modal};
use crate::list::{FetchOutcome, FetchTicket};
use crate::notifications::{
    Alert, CREATE_FAILED, DELETE_FAILED, LOAD_FAILED, TASK_ADDED, TASK_ADDED_DURATION,
    TASK_DELETED, TASK_UPDATED, UPDATE_FAILED,
};
use crate::router::Route;

/// A finished request, delivered back to the UI loop.
#[derive(Debug)]
pub(crate) enum Completion {
    TasksLoaded {
        ticket: FetchTicket,
        result: Result<TaskPage, ApiError>,
    },
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated {
        id: TaskId,
        result: Result<Task, ApiError>,
    },
    TaskDeleted {
        id: TaskId,
        result: Result<(), ApiError>,
    },
    LoggedIn(Result<LoginResponse, ApiError>),
}

impl App {
    fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            // The receiver lives as long as the App; a send error only
            // happens during shutdown.
            let _ = tx.send(request.await);
        });
    }

    /// Fetch the current key if the cache cannot serve it.
    pub(crate) fn sync_list(&mut self) {
        let key = self.tasks.key();
        let Some(ticket) = self.tasks.cache_mut().request(&key) else {
            return;
        };
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.list_tasks(&ticket.key).await;
            Completion::TasksLoaded { ticket, result }
        });
    }

    pub(crate) fn spawn_create(&mut self, task: Task) {
        let client = self.client.clone();
        self.spawn(async move { Completion::TaskCreated(client.create_task(&task).await) });
    }

    pub(crate) fn spawn_update(&mut self, id: TaskId, task: Task) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.update_task(&id, &task).await;
            Completion::TaskUpdated { id, result }
        });
    }

    pub(crate) fn spawn_delete(&mut self, id: TaskId) {
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.delete_task(&id).await;
            Completion::TaskDeleted { id, result }
        });
    }

    pub(crate) fn spawn_login(&mut self) {
        let client = self.client.clone();
        let credentials = self.login.credentials();
        self.login.set_submitting(true);
        self.spawn(async move { Completion::LoggedIn(client.login(&credentials).await) });
    }

    pub(super) fn apply_completion(&mut self, completion: Completion, now: Instant) {
        match completion {
            Completion::TasksLoaded { ticket, result } => {
                let result = result.map_err(|e| {
                    warn!(key = %ticket.key, "Task list fetch failed: {e}");
                    e.to_string()
                });
                let outcome = self.tasks.cache_mut().resolve(&ticket, result);
                // Only the key on screen reports its failure.
                if outcome == FetchOutcome::Failed && ticket.key == self.tasks.key() {
                    self.toasts.error(LOAD_FAILED, now);
                }
            }
            Completion::TaskCreated(result) => match result {
                Ok(task) => {
                    debug!(id = %task.id, "Task created");
                    self.form.finish(true);
                    self.invalidate_tasks();
                    self.toasts.push(
                        NotificationKind::Success,
                        TASK_ADDED,
                        TASK_ADDED_DURATION,
                        now,
                    );
                }
                Err(e) => {
                    warn!("Creating task failed: {e}");
                    self.form.finish(false);
                    self.toasts.error(CREATE_FAILED, now);
                }
            },
            Completion::TaskUpdated { id, result } => match result {
                Ok(_) => {
                    debug!(%id, "Task updated");
                    if matches!(self.modal, Some(Modal::Edit(_))) {
                        self.modal = None;
                    }
                    self.invalidate_tasks();
                    self.toasts.success(TASK_UPDATED, now);
                }
                Err(e) => {
                    warn!(%id, "Updating task failed: {e}");
                    if let Some(Modal::Edit(form)) = &mut self.modal {
                        form.finish(false);
                    }
                    self.toasts.error(UPDATE_FAILED, now);
                }
            },
            Completion::TaskDeleted { id, result } => match result {
                Ok(()) => {
                    debug!(%id, "Task deleted");
                    if matches!(self.modal, Some(Modal::Delete(_))) {
                        self.modal = None;
                    }
                    self.invalidate_tasks();
                    self.toasts.success(TASK_DELETED, now);
                }
                Err(e) => {
                    warn!(%id, "Deleting task failed: {e}");
                    if let Some(Modal::Delete(confirm)) = &mut self.modal {
                        confirm.in_flight = false;
                    }
                    self.toasts.error(DELETE_FAILED, now);
                }
            },
            Completion::LoggedIn(result) => {
                self.login.set_submitting(false);
                match result {
                    Ok(response) => {
                        if let Err(e) = self.session.set_token(&response.access_token) {
                            warn!("Session token not persisted: {e}");
                        }
                        self.login.reset();
                        self.alert = Some(Alert::LoginSuccess);
                        self.navigate(Route::Home);
                    }
                    Err(e) => {
                        warn!("Login failed: {e}");
                        self.login.clear_password();
                        self.alert = Some(Alert::LoginFailed);
                    }
                }
            }
        }
    }
}
