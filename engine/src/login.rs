//! Login screen state.

use taskdesk_client::Credentials;
use taskdesk_types::DraftInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

impl LoginField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
        }
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Email,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    email: DraftInput,
    password: DraftInput,
    focus: LoginField,
    submitting: bool,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn input(&self, field: LoginField) -> &DraftInput {
        match field {
            LoginField::Email => &self.email,
            LoginField::Password => &self.password,
        }
    }

    fn focused_mut(&mut self) -> &mut DraftInput {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    #[must_use]
    pub fn focus(&self) -> LoginField {
        self.focus
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn enter_char(&mut self, c: char) {
        self.focused_mut().enter_char(c);
    }

    pub fn delete_char(&mut self) {
        self.focused_mut().delete_char();
    }

    pub fn delete_char_forward(&mut self) {
        self.focused_mut().delete_char_forward();
    }

    pub fn move_cursor_left(&mut self) {
        self.focused_mut().move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.focused_mut().move_cursor_right();
    }

    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.email.text(), self.password.text())
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Forget the password; the email is kept for the next attempt.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
