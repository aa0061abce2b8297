//! The `/login` screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph},
};

use taskdesk_engine::{App, LoginField};

use crate::theme::{Glyphs, Palette, styles};
use crate::{TextField, centered_rect, draw_text_field, key_hints};

const LOGIN_WIDTH: u16 = 52;
const LOGIN_HEIGHT: u16 = 14;

pub(crate) fn draw_login(frame: &mut Frame, app: &App, palette: &Palette, glyphs: &Glyphs) {
    let login = app.login();
    let area = centered_rect(frame.area(), LOGIN_WIDTH, LOGIN_HEIGHT);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(styles::border(palette, true))
        .style(Style::default().bg(palette.bg_panel))
        .title(Span::styled(" Login ", styles::title(palette)))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Heading
            Constraint::Length(3), // Email
            Constraint::Length(3), // Password
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Button
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Sign in to Task Manager",
            styles::label(palette),
        ))),
        chunks[0],
    );

    let no_alert = app.alert().is_none();
    let email = TextField {
        label: LoginField::Email.label(),
        input: login.input(LoginField::Email),
        placeholder: "you@example.com",
        focused: no_alert && login.focus() == LoginField::Email,
        mask: None,
        error: None,
    };
    let password = TextField {
        label: LoginField::Password.label(),
        input: login.input(LoginField::Password),
        placeholder: "********",
        focused: no_alert && login.focus() == LoginField::Password,
        mask: Some(glyphs.mask),
        error: None,
    };

    let caret = [
        draw_text_field(frame, chunks[1], &email, palette),
        draw_text_field(frame, chunks[2], &password, palette),
    ];

    let button = if login.is_submitting() {
        Span::styled("Signing in...", styles::button(palette, false))
    } else {
        Span::styled("[ Login ]", styles::button(palette, true))
    };
    frame.render_widget(Paragraph::new(Line::from(button)), chunks[4]);

    frame.render_widget(
        Paragraph::new(key_hints(
            &[("Tab", "switch field"), ("Enter", "login"), ("Ctrl+C", "quit")],
            palette,
        )),
        chunks[6],
    );

    if let Some(position) = caret.into_iter().flatten().next() {
        frame.set_cursor_position(position);
    }
}
