//! The Task Manager page: create form, search box, task table, pager.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
};

use taskdesk_engine::{App, Focus, ListView, SortColumn, SortDirection, TaskForm};
use taskdesk_types::{Field, sanitize_terminal_text};

use crate::theme::{Glyphs, Palette, styles};
use crate::{TextField, draw_text_field, key_hints};

const FORM_WIDTH: u16 = 38;

pub(crate) fn draw_home(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Task Manager", styles::title(palette)),
            Span::styled(
                format!("  {}  signed in", glyphs.separator),
                styles::key_hint(palette),
            ),
        ])),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    let overlay_open = app.modal().is_some() || app.alert().is_some();

    let form_caret = draw_form_block(
        frame,
        body[0],
        app.form(),
        FormChrome {
            title: " Add Task ",
            submit: "[ Submit ]",
            busy: "Submitting...",
            focused: !overlay_open && app.focus() == Focus::Form,
        },
        palette,
    );
    let search_caret = draw_task_list(frame, app, body[1], palette, glyphs, overlay_open);

    frame.render_widget(Paragraph::new(footer_hints(app, palette)), chunks[2]);

    if let Some(position) = form_caret.or(search_caret) {
        frame.set_cursor_position(position);
    }
}

/// Labels for a task form block; the edit modal reuses the layout.
pub(crate) struct FormChrome {
    pub title: &'static str,
    pub submit: &'static str,
    pub busy: &'static str,
    pub focused: bool,
}

/// Height of a form block: three inputs plus the button row and borders.
pub(crate) const FORM_BLOCK_HEIGHT: u16 = 3 * 3 + 1 + 2;

pub(crate) fn draw_form_block(
    frame: &mut Frame,
    area: Rect,
    form: &TaskForm,
    chrome: FormChrome,
    palette: &Palette,
) -> Option<Position> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, chrome.focused))
        .style(Style::default().bg(palette.bg_panel))
        .title(Span::styled(chrome.title, styles::title(palette)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let mut caret = None;
    for (field, row) in Field::ALL.into_iter().zip(rows.iter()) {
        let text_field = TextField {
            label: field.label(),
            input: form.input(field),
            placeholder: placeholder(field),
            focused: chrome.focused && form.focus() == field,
            mask: None,
            error: form.errors().get(field),
        };
        if let Some(position) = draw_text_field(frame, *row, &text_field, palette) {
            caret = Some(position);
        }
    }

    let button = if form.is_submitting() {
        Span::styled(chrome.busy, styles::button(palette, false))
    } else {
        Span::styled(chrome.submit, styles::button(palette, chrome.focused))
    };
    frame.render_widget(
        Paragraph::new(Line::from(button)).alignment(Alignment::Right),
        rows[3],
    );

    caret
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::FullName => "Jane Doe",
        Field::Title => "What needs doing",
        Field::Description => "Details",
    }
}

fn draw_task_list(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
    overlay_open: bool,
) -> Option<Position> {
    let tasks = app.tasks();
    let list_focused = !overlay_open && matches!(app.focus(), Focus::Search | Focus::Table);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, list_focused))
        .style(Style::default().bg(palette.bg_panel))
        .title(Span::styled(" Task List ", styles::title(palette)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Pager
        ])
        .split(inner);

    let search = TextField {
        label: "Search",
        input: tasks.search(),
        placeholder: "Search by title...",
        focused: !overlay_open && app.focus() == Focus::Search,
        mask: None,
        error: None,
    };
    let caret = draw_text_field(frame, rows[0], &search, palette);

    let table_focused = !overlay_open && app.focus() == Focus::Table;
    match tasks.view() {
        ListView::Loading => draw_status(frame, rows[1], "Loading...", palette.text_muted),
        ListView::Error => draw_status(frame, rows[1], "Something went wrong.", palette.error),
        ListView::Ready { refreshing, .. } => {
            let visible = tasks.rows();
            if visible.is_empty() {
                draw_status(frame, rows[1], "No tasks found.", palette.text_muted);
            } else {
                let header = Row::new(vec![
                    Cell::from(header_label(
                        "Full Name",
                        tasks.sort().direction_of(SortColumn::FullName),
                        glyphs,
                    )),
                    Cell::from(header_label(
                        "Title",
                        tasks.sort().direction_of(SortColumn::Title),
                        glyphs,
                    )),
                    Cell::from("Description"),
                ])
                .style(styles::label(palette).add_modifier(Modifier::BOLD));

                let body: Vec<Row> = visible
                    .iter()
                    .map(|task| {
                        Row::new(vec![
                            Cell::from(sanitize_terminal_text(&task.full_name).into_owned()),
                            Cell::from(sanitize_terminal_text(&task.title).into_owned()),
                            Cell::from(sanitize_terminal_text(&task.description).into_owned()),
                        ])
                        .style(Style::default().fg(palette.text_primary))
                    })
                    .collect();

                let table = Table::new(
                    body,
                    [
                        Constraint::Percentage(25),
                        Constraint::Percentage(30),
                        Constraint::Percentage(45),
                    ],
                )
                .header(header)
                .row_highlight_style(if table_focused {
                    Style::default()
                        .bg(palette.bg_highlight)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                })
                .highlight_symbol(format!("{} ", glyphs.selected));

                let mut state = TableState::default().with_selected(Some(tasks.selected_index()));
                frame.render_stateful_widget(table, rows[1], &mut state);
            }

            if let Some(pagination) = tasks.pagination() {
                let mut spans = vec![
                    Span::styled("[Previous]", styles::button(palette, pagination.can_previous())),
                    Span::styled(format!(" {} ", pagination.label()), styles::label(palette)),
                    Span::styled("[Next]", styles::button(palette, pagination.can_next())),
                ];
                if refreshing {
                    spans.push(Span::styled("  refreshing...", styles::key_hint(palette)));
                }
                frame.render_widget(
                    Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
                    rows[2],
                );
            }
        }
    }

    caret
}

fn draw_status(frame: &mut Frame, area: Rect, text: &'static str, color: ratatui::style::Color) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
            .alignment(Alignment::Center),
        area,
    );
}

fn header_label(name: &str, direction: Option<SortDirection>, glyphs: &Glyphs) -> String {
    let marker = match direction {
        Some(SortDirection::Ascending) => glyphs.sort_asc,
        Some(SortDirection::Descending) => glyphs.sort_desc,
        None => glyphs.sort_none,
    };
    format!("{name} {marker}")
}

fn footer_hints(app: &App, palette: &Palette) -> Line<'static> {
    if app.modal().is_some() {
        return Line::default();
    }
    match app.focus() {
        Focus::Form => key_hints(
            &[
                ("Tab", "next field"),
                ("Enter", "submit"),
                ("Esc", "task list"),
                ("Ctrl+C", "quit"),
            ],
            palette,
        ),
        Focus::Search => key_hints(
            &[("Enter", "results"), ("Esc", "clear"), ("Tab", "next")],
            palette,
        ),
        Focus::Table => key_hints(
            &[
                ("j/k", "select"),
                ("h/l", "page"),
                ("e", "edit"),
                ("d", "delete"),
                ("1/2", "sort"),
                ("/", "search"),
                ("n", "new"),
                ("L", "logout"),
                ("q", "quit"),
            ],
            palette,
        ),
    }
}
