//! TUI rendering for Taskdesk using ratatui.

mod home;
mod input;
mod login;
mod overlay;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, styles};

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use taskdesk_engine::{App, Route};
use taskdesk_types::DraftInput;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = Palette::standard();
    let glyphs = glyphs(app.ascii_only());

    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    match app.route() {
        Route::Login => login::draw_login(frame, app, &palette, &glyphs),
        Route::Home => {
            home::draw_home(frame, app, &palette, &glyphs);
            overlay::draw_modal(frame, app, &palette, &glyphs);
        }
    }

    overlay::draw_toasts(frame, app, &palette, &glyphs);
    overlay::draw_alert(frame, app, &palette);
}

/// How a single-line text input should be drawn.
pub(crate) struct TextField<'a> {
    pub label: &'a str,
    pub input: &'a DraftInput,
    pub placeholder: &'a str,
    pub focused: bool,
    pub mask: Option<char>,
    pub error: Option<&'a str>,
}

/// Draw a bordered input box. Returns where the caret belongs when focused.
pub(crate) fn draw_text_field(
    frame: &mut Frame,
    area: Rect,
    field: &TextField<'_>,
    palette: &Palette,
) -> Option<Position> {
    let border_style = if field.error.is_some() {
        styles::field_error(palette)
    } else {
        styles::border(palette, field.focused)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title(Span::styled(format!(" {} ", field.label), styles::label(palette)));
    if let Some(error) = field.error {
        block = block.title_bottom(Span::styled(
            format!(" {error} "),
            styles::field_error(palette),
        ));
    }

    let inner = block.inner(area);
    let width = usize::from(inner.width.saturating_sub(1)).max(1);

    let (shown, caret_offset) = if field.input.is_empty() {
        (None, 0)
    } else {
        let (text, before_width) = match field.mask {
            Some(mask) => {
                let masked: String = std::iter::repeat_n(mask, field.input.grapheme_count())
                    .collect();
                (masked, field.input.cursor())
            }
            None => (
                field.input.text().to_string(),
                field.input.before_cursor().width(),
            ),
        };
        let scroll = before_width.saturating_sub(width);
        (Some(skip_columns(&text, scroll)), before_width - scroll)
    };

    let line = match shown {
        Some(text) => Line::from(Span::styled(
            text,
            Style::default().fg(palette.text_primary),
        )),
        None => Line::from(Span::styled(
            field.placeholder.to_string(),
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        )),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);

    if !field.focused || inner.width == 0 || inner.height == 0 {
        return None;
    }
    let offset = u16::try_from(caret_offset).unwrap_or(u16::MAX);
    Some(Position::new(
        inner.x.saturating_add(offset).min(inner.right().saturating_sub(1)),
        inner.y,
    ))
}

/// Drop leading characters until `columns` display columns are skipped.
fn skip_columns(text: &str, columns: usize) -> String {
    let mut skipped = 0;
    let mut chars = text.chars();
    while skipped < columns {
        let Some(c) = chars.next() else { break };
        skipped += c.width().unwrap_or(0);
    }
    chars.collect()
}

/// Center a `width` x `height` box in `area`, shrinking it to fit.
pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width,
        height,
    }
}

/// Render `hints` as `key action` pairs.
pub(crate) fn key_hints(hints: &[(&'static str, &'static str)], palette: &Palette) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (i, (key, action)) in hints.iter().enumerate() {
        let action = if i + 1 == hints.len() {
            format!(" {action}")
        } else {
            format!(" {action}  ")
        };
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(action, styles::key_hint(palette)));
    }
    Line::from(spans)
}
