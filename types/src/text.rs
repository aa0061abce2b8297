//! Single-line text buffer with grapheme-aware cursor movement.

use unicode_segmentation::UnicodeSegmentation;

/// Editable text for form fields, the search box and the login screen.
///
/// The cursor is a grapheme index, never a byte offset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::default();
        input.set_text(text);
        input
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.move_cursor_left();
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }
        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.grapheme_count();
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Text before the cursor, for placing the terminal caret.
    #[must_use]
    pub fn before_cursor(&self) -> &str {
        &self.text[..self.byte_index()]
    }

    fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.grapheme_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_appends_at_cursor() {
        let mut input = DraftInput::default();
        for c in "abc".chars() {
            input.enter_char(c);
        }
        input.move_cursor_left();
        input.enter_char('X');
        assert_eq!(input.text(), "abXc");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut input = DraftInput::with_text("ne\u{301}");
        assert_eq!(input.grapheme_count(), 2);
        input.delete_char();
        assert_eq!(input.text(), "n");
    }

    #[test]
    fn delete_forward_at_end_is_noop() {
        let mut input = DraftInput::with_text("ab");
        input.delete_char_forward();
        assert_eq!(input.text(), "ab");
        input.move_cursor_home();
        input.delete_char_forward();
        assert_eq!(input.text(), "b");
    }

    #[test]
    fn before_cursor_tracks_position() {
        let mut input = DraftInput::with_text("hello");
        input.move_cursor_left();
        input.move_cursor_left();
        assert_eq!(input.before_cursor(), "hel");
    }
}
