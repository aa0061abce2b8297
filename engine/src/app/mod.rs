//! The application state store.
//!
//! [`App`] owns every piece of client state. The TUI forwards input as
//! method calls, calls [`App::tick`] once per frame and renders from the
//! read-only accessors. Network calls run on spawned tokio tasks; their
//! results come back as [`Completion`]s over an unbounded channel and are
//! applied inside `tick`, so all state changes happen on the UI loop.

mod actions;
mod effects;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use taskdesk_client::{ApiClient, ApiError, SessionContext};
use taskdesk_config::Settings;
use taskdesk_types::{DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE, Task};

use crate::form::TaskForm;
use crate::list::TaskList;
use crate::login::LoginForm;
use crate::notifications::{Alert, ToastQueue};
use crate::router::{Route, guard};

pub(crate) use effects::Completion;

/// Which part of the Task Manager page receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The create form; the field is tracked by the form itself.
    #[default]
    Form,
    Search,
    Table,
}

/// Confirmation dialog for a delete.
#[derive(Debug, Clone)]
pub struct DeleteConfirm {
    pub task: Task,
    pub in_flight: bool,
}

#[derive(Debug, Clone)]
pub enum Modal {
    Edit(TaskForm),
    Delete(DeleteConfirm),
}

/// Knobs that shape the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub page_size: u32,
    pub debounce: Duration,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl From<&Settings> for ListOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            page_size: settings.page_size,
            debounce: settings.debounce,
        }
    }
}

pub struct App {
    client: ApiClient,
    session: SessionContext,
    options: ListOptions,
    route: Route,
    login: LoginForm,
    tasks: TaskList,
    form: TaskForm,
    focus: Focus,
    modal: Option<Modal>,
    toasts: ToastQueue,
    alert: Option<Alert>,
    /// The current key needs a fetch on the next tick.
    list_dirty: bool,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    ascii_only: bool,
    should_quit: bool,
}

impl App {
    /// Build the client from `settings` and start at `/`, which the guard
    /// turns into `/login` when no token is stored.
    pub fn new(settings: &Settings, session: SessionContext) -> Result<Self, ApiError> {
        let client = ApiClient::from_settings(settings)?;
        let mut app = Self::with_client(client, session, ListOptions::from(settings));
        app.ascii_only = settings.ascii_only;
        Ok(app)
    }

    /// `client` is decorated with `session` so every request carries its token.
    #[must_use]
    pub fn with_client(client: ApiClient, session: SessionContext, options: ListOptions) -> Self {
        let client = client.with_decorator(Arc::new(session.clone()));
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            client,
            session,
            options,
            route: Route::Login,
            login: LoginForm::new(),
            tasks: TaskList::new(options.page_size, options.debounce),
            form: TaskForm::create(),
            focus: Focus::default(),
            modal: None,
            toasts: ToastQueue::new(),
            alert: None,
            list_dirty: false,
            completion_tx,
            completion_rx,
            in_flight: 0,
            ascii_only: false,
            should_quit: false,
        };
        app.navigate(Route::Home);
        app
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// One UI-loop step: apply finished requests, settle the search box,
    /// start any fetch the current key needs, expire toasts.
    pub fn tick_at(&mut self, now: Instant) {
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.apply_completion(completion, now);
        }

        if self.route == Route::Home {
            if self.tasks.poll_debounce(now) {
                self.list_dirty = true;
            }
            if self.list_dirty {
                self.list_dirty = false;
                self.sync_list();
            }
        }

        self.toasts.prune(now);
    }

    /// Go to `route`, subject to the guard.
    pub fn navigate(&mut self, route: Route) {
        let target = guard(route, self.session.is_authenticated());
        if target != route {
            tracing::info!(requested = %route, redirected = %target, "Route guarded");
        }
        self.route = target;
        if target == Route::Home {
            self.list_dirty = true;
        }
    }

    pub fn open_path(&mut self, path: &str) {
        self.navigate(Route::parse(path));
    }

    pub(crate) fn invalidate_tasks(&mut self) {
        self.tasks.cache_mut().invalidate_all();
        self.list_dirty = true;
    }

    // ------------------------------------------------------------------
    // Read-only state for rendering
    // ------------------------------------------------------------------

    #[must_use]
    pub fn route(&self) -> Route {
        self.route
    }

    #[must_use]
    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    #[must_use]
    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    #[must_use]
    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    #[must_use]
    pub fn alert(&self) -> Option<Alert> {
        self.alert
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn options(&self) -> ListOptions {
        self.options
    }

    #[must_use]
    pub fn ascii_only(&self) -> bool {
        self.ascii_only
    }

    /// Requests are outstanding or a fetch is about to be issued.
    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        self.in_flight > 0 || self.list_dirty
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }
}
