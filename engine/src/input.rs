//! Draft input state for the entry line.

use unicode_segmentation::UnicodeSegmentation;

/// Single-line text editing with Unicode grapheme cluster support.
///
/// The cursor is a grapheme index, not a byte index, so arrow keys and
/// backspace behave correctly on multi-byte text.
#[derive(Debug, Default, Clone)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor; the frontend uses its display width to
    /// position the terminal cursor.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.text[..self.byte_index()]
    }

    /// Take the draft text, clearing the input.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
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

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.cursor.saturating_add(1).min(self.grapheme_count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(byte_index, _)| byte_index)
    }

    fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }
}
