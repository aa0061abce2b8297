//! Modals, toasts and the blocking alert.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use taskdesk_engine::{App, DeleteConfirm, Modal, NotificationKind};
use taskdesk_types::sanitize_terminal_text;

use crate::home::{FORM_BLOCK_HEIGHT, FormChrome, draw_form_block};
use crate::theme::{Glyphs, Palette, styles};
use crate::{centered_rect, key_hints};

const MODAL_WIDTH: u16 = 70;
const TOAST_MAX_WIDTH: u16 = 48;

pub(crate) fn draw_modal(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    match app.modal() {
        Some(Modal::Edit(form)) => {
            let area = centered_rect(frame.area(), MODAL_WIDTH, FORM_BLOCK_HEIGHT + 1);
            frame.render_widget(Clear, area);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(FORM_BLOCK_HEIGHT), Constraint::Length(1)])
                .split(area);

            let caret = draw_form_block(
                frame,
                chunks[0],
                form,
                FormChrome {
                    title: " Edit Task ",
                    submit: "[ Save ]",
                    busy: "Saving...",
                    focused: app.alert().is_none(),
                },
                palette,
            );
            frame.render_widget(
                Paragraph::new(key_hints(
                    &[("Tab", "next field"), ("Enter", "save"), ("Esc", "cancel")],
                    palette,
                ))
                .style(Style::default().bg(palette.bg_dark)),
                chunks[1],
            );
            if let Some(position) = caret {
                frame.set_cursor_position(position);
            }
        }
        Some(Modal::Delete(confirm)) => draw_delete_confirm(frame, confirm, palette, glyphs),
        None => {}
    }
}

fn draw_delete_confirm(
    frame: &mut Frame,
    confirm: &DeleteConfirm,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let title = sanitize_terminal_text(&confirm.task.title);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Are you sure you want to delete the task: ",
                Style::default().fg(palette.text_primary),
            ),
            Span::styled(
                title.into_owned(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("?", Style::default().fg(palette.text_primary)),
        ]),
        Line::from(""),
        if confirm.in_flight {
            Line::from(Span::styled("Deleting...", styles::key_hint(palette)))
        } else {
            Line::from(vec![
                Span::styled("[ Cancel (Esc) ]", styles::button(palette, true)),
                Span::raw(format!("  {}  ", glyphs.separator)),
                Span::styled("[ Yes, Delete (Enter) ]", styles::destructive(palette)),
            ])
        },
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.error))
        .style(Style::default().bg(palette.bg_popup))
        .title(Span::styled(" Delete Task ", styles::title(palette)))
        .padding(Padding::uniform(1));

    let area = centered_rect(frame.area(), MODAL_WIDTH, 9);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Stack active toasts in the top-right corner, newest last.
pub(crate) fn draw_toasts(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let area = frame.area();
    let mut y = area.y.saturating_add(1);

    for toast in app.toasts().iter() {
        let (marker, color) = match toast.kind {
            NotificationKind::Success => (glyphs.success, palette.success),
            NotificationKind::Error => (glyphs.error, palette.error),
        };
        let message = sanitize_terminal_text(&toast.message);
        let text_width = marker.width() + 1 + message.width();
        let width = u16::try_from(text_width)
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(TOAST_MAX_WIDTH)
            .min(area.width);
        if y.saturating_add(3) > area.bottom() {
            break;
        }

        let rect = Rect {
            x: area.right().saturating_sub(width.saturating_add(1)),
            y,
            width,
            height: 3,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(palette.bg_popup))
            .padding(Padding::horizontal(1));

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{marker} "), Style::default().fg(color)),
                Span::styled(message.into_owned(), Style::default().fg(palette.text_primary)),
            ]))
            .block(block),
            rect,
        );
        y = y.saturating_add(3);
    }
}

pub(crate) fn draw_alert(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(alert) = app.alert() else {
        return;
    };
    let message = alert.message();
    let width = u16::try_from(message.width())
        .unwrap_or(u16::MAX)
        .max(16)
        .saturating_add(6);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_popup))
        .padding(Padding::horizontal(2));

    let lines = vec![
        Line::from(Span::styled(message, styles::title(palette))),
        Line::from(""),
        Line::from(Span::styled("OK (Enter)", styles::button(palette, true))),
    ];

    let area = centered_rect(frame.area(), width, 5);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
