//! User actions. Each maps one key or command onto a state change.

use std::time::Instant;

use tracing::{info, warn};

use taskdesk_types::{Field, SortColumn};

use super::{App, DeleteConfirm, Focus, Modal};
use crate::form::{Submission, TaskForm};
use crate::notifications::Alert;
use crate::router::Route;

fn wall_clock_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

impl App {
    /// While an alert is up, nothing else reacts to input.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.alert.is_some()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    // ------------------------------------------------------------------
    // Text entry, routed to whatever owns the cursor
    // ------------------------------------------------------------------

    pub fn insert_char(&mut self, c: char) {
        self.insert_char_at(c, Instant::now());
    }

    pub fn insert_char_at(&mut self, c: char, now: Instant) {
        if self.is_blocked() {
            return;
        }
        match self.route {
            Route::Login => self.login.enter_char(c),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.enter_char(c),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form => self.form.enter_char(c),
                    Focus::Search => {
                        self.tasks.search_char(c, now);
                    }
                    Focus::Table => {}
                },
            },
        }
    }

    pub fn backspace(&mut self) {
        self.backspace_at(Instant::now());
    }

    pub fn backspace_at(&mut self, now: Instant) {
        if self.is_blocked() {
            return;
        }
        match self.route {
            Route::Login => self.login.delete_char(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.delete_char(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form => self.form.delete_char(),
                    Focus::Search => self.tasks.search_backspace(now),
                    Focus::Table => {}
                },
            },
        }
    }

    pub fn delete_forward(&mut self) {
        if self.is_blocked() {
            return;
        }
        let now = Instant::now();
        match self.route {
            Route::Login => self.login.delete_char_forward(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.delete_char_forward(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form => self.form.delete_char_forward(),
                    Focus::Search => self.tasks.search_delete(now),
                    Focus::Table => {}
                },
            },
        }
    }

    pub fn clear_search(&mut self) {
        if !self.is_blocked() {
            self.tasks.search_clear(Instant::now());
        }
    }

    pub fn cursor_left(&mut self) {
        match self.route {
            Route::Login => self.login.move_cursor_left(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.move_cursor_left(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form => self.form.move_cursor_left(),
                    Focus::Search => self.tasks.search_cursor_left(),
                    Focus::Table => {}
                },
            },
        }
    }

    pub fn cursor_right(&mut self) {
        match self.route {
            Route::Login => self.login.move_cursor_right(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.move_cursor_right(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form => self.form.move_cursor_right(),
                    Focus::Search => self.tasks.search_cursor_right(),
                    Focus::Table => {}
                },
            },
        }
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Tab order on the Task Manager page: form fields, search, table.
    pub fn focus_next(&mut self) {
        if self.is_blocked() {
            return;
        }
        match self.route {
            Route::Login => self.login.toggle_focus(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.focus_next(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form if self.form.focus() == Field::Description => {
                        self.form.blur(Field::Description);
                        self.focus = Focus::Search;
                    }
                    Focus::Form => self.form.focus_next(),
                    Focus::Search => self.focus = Focus::Table,
                    Focus::Table => {
                        self.form.enter(Field::FullName);
                        self.focus = Focus::Form;
                    }
                },
            },
        }
    }

    pub fn focus_previous(&mut self) {
        if self.is_blocked() {
            return;
        }
        match self.route {
            Route::Login => self.login.toggle_focus(),
            Route::Home => match &mut self.modal {
                Some(Modal::Edit(form)) => form.focus_previous(),
                Some(Modal::Delete(_)) => {}
                None => match self.focus {
                    Focus::Form if self.form.focus() == Field::FullName => {
                        self.form.blur(Field::FullName);
                        self.focus = Focus::Table;
                    }
                    Focus::Form => self.form.focus_previous(),
                    Focus::Search => {
                        self.form.enter(Field::Description);
                        self.focus = Focus::Form;
                    }
                    Focus::Table => self.focus = Focus::Search,
                },
            },
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if self.is_blocked() || self.modal.is_some() || focus == self.focus {
            return;
        }
        if self.focus == Focus::Form {
            self.form.blur(self.form.focus());
        }
        self.focus = focus;
    }

    // ------------------------------------------------------------------
    // Login and session
    // ------------------------------------------------------------------

    pub fn submit_login(&mut self) {
        if self.is_blocked() || self.route != Route::Login || self.login.is_submitting() {
            return;
        }
        if !self.login.credentials().is_complete() {
            self.alert = Some(Alert::MissingFields);
            return;
        }
        self.spawn_login();
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            warn!("Failed to remove persisted session: {e}");
        }
        info!("Logged out");
        self.modal = None;
        self.form = TaskForm::create();
        self.focus = Focus::default();
        self.tasks.reset();
        self.navigate(Route::Login);
    }

    // ------------------------------------------------------------------
    // Create / edit / delete
    // ------------------------------------------------------------------

    /// Submit the create form. Validation failures stay local.
    pub fn submit_form(&mut self) {
        if self.is_blocked() || self.route != Route::Home || self.modal.is_some() {
            return;
        }
        match self.form.submit(wall_clock_millis()) {
            Submission::Create(task) => self.spawn_create(task),
            Submission::Update(id, task) => self.spawn_update(id, task),
            Submission::Busy | Submission::Invalid => {}
        }
    }

    pub fn open_edit_selected(&mut self) {
        if self.is_blocked() || self.modal.is_some() {
            return;
        }
        if let Some(task) = self.tasks.selected_task() {
            self.modal = Some(Modal::Edit(TaskForm::edit(task)));
        }
    }

    pub fn submit_edit(&mut self) {
        if self.is_blocked() {
            return;
        }
        let Some(Modal::Edit(form)) = &mut self.modal else {
            return;
        };
        match form.submit(wall_clock_millis()) {
            Submission::Update(id, task) => self.spawn_update(id, task),
            Submission::Create(task) => self.spawn_create(task),
            Submission::Busy | Submission::Invalid => {}
        }
    }

    pub fn open_delete_selected(&mut self) {
        if self.is_blocked() || self.modal.is_some() {
            return;
        }
        if let Some(task) = self.tasks.selected_task() {
            self.modal = Some(Modal::Delete(DeleteConfirm {
                task: task.clone(),
                in_flight: false,
            }));
        }
    }

    pub fn confirm_delete(&mut self) {
        if self.is_blocked() {
            return;
        }
        let Some(Modal::Delete(confirm)) = &mut self.modal else {
            return;
        };
        if confirm.in_flight {
            return;
        }
        confirm.in_flight = true;
        let id = confirm.task.id.clone();
        self.spawn_delete(id);
    }

    /// Cancel. A modal with a request in flight stays open until it resolves.
    pub fn close_modal(&mut self) {
        let busy = match &self.modal {
            Some(Modal::Edit(form)) => form.is_submitting(),
            Some(Modal::Delete(confirm)) => confirm.in_flight,
            None => false,
        };
        if !busy {
            self.modal = None;
        }
    }

    // ------------------------------------------------------------------
    // Table navigation
    // ------------------------------------------------------------------

    pub fn next_page(&mut self) {
        if !self.is_blocked() && self.tasks.next_page() {
            self.list_dirty = true;
        }
    }

    pub fn previous_page(&mut self) {
        if !self.is_blocked() && self.tasks.previous_page() {
            self.list_dirty = true;
        }
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        if !self.is_blocked() {
            self.tasks.toggle_sort(column);
        }
    }

    pub fn select_next_row(&mut self) {
        self.tasks.select_next();
    }

    pub fn select_previous_row(&mut self) {
        self.tasks.select_previous();
    }
}
