//! Input handling for the Taskdesk TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;

use taskdesk_engine::{App, Focus, Modal, Route, SortColumn};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the UI loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a backpressured send unblocks.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending terminal events into `app`. Returns true once the user
/// asked to quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => {
                tracing::error!("Terminal input failed: {msg}");
                return Err(anyhow!("input error: {msg}"));
            }
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };
        processed += 1;

        if apply_event(app, ev) {
            return Ok(true);
        }
    }
    Ok(app.should_quit())
}

pub(crate) fn apply_event(app: &mut App, event: Event) -> bool {
    match event {
        Event::Key(key) => {
            if matches!(key.kind, KeyEventKind::Release) {
                return app.should_quit();
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
                app.request_quit();
                return true;
            }

            if app.is_blocked() {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    app.dismiss_alert();
                }
                return app.should_quit();
            }

            match app.route() {
                Route::Login => handle_login(app, key),
                Route::Home => match app.modal() {
                    Some(Modal::Edit(_)) => handle_edit_modal(app, key),
                    Some(Modal::Delete(_)) => handle_delete_modal(app, key),
                    None => match app.focus() {
                        Focus::Form => handle_form(app, key),
                        Focus::Search => handle_search(app, key),
                        Focus::Table => handle_table(app, key),
                    },
                },
            }
        }
        Event::Paste(text) => {
            for c in text.chars().filter(|c| !c.is_control()) {
                app.insert_char(c);
            }
        }
        _ => {}
    }
    app.should_quit()
}

/// Editing keys shared by every text field. Returns false if `key` was not
/// an editing key.
fn handle_text_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        _ => return false,
    }
    true
}

fn handle_login(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.focus_next(),
        KeyCode::Enter => app.submit_login(),
        _ => {
            handle_text_key(app, key);
        }
    }
}

fn handle_form(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => app.set_focus(Focus::Table),
        _ => {
            handle_text_key(app, key);
        }
    }
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Enter | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Esc => {
            if app.tasks().search().is_empty() {
                app.set_focus(Focus::Table);
            } else {
                app.clear_search();
            }
        }
        _ => {
            handle_text_key(app, key);
        }
    }
}

fn handle_table(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_previous(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next_row(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous_row(),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => app.previous_page(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit_selected(),
        KeyCode::Char('d') | KeyCode::Delete => app.open_delete_selected(),
        KeyCode::Char('1') => app.toggle_sort(SortColumn::FullName),
        KeyCode::Char('2') => app.toggle_sort(SortColumn::Title),
        KeyCode::Char('/') => app.set_focus(Focus::Search),
        KeyCode::Char('n') => app.set_focus(Focus::Form),
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('q') => app.request_quit(),
        _ => {}
    }
}

fn handle_edit_modal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Enter => app.submit_edit(),
        KeyCode::Esc => app.close_modal(),
        _ => {
            handle_text_key(app, key);
        }
    }
}

fn handle_delete_modal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('y') => app.confirm_delete(),
        KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
        _ => {}
    }
}
