use std::cmp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditOperation {
    InsertChar { col: usize, ch: char },
    DeleteChar { col: usize, ch: char },
}

/// Single-line text buffer holding the uncommitted tag text.
/// Cursor positions are char indices, not byte offsets.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    text: String,
    cursor_col: usize,
    scroll_col: usize,
    undo_stack: Vec<EditOperation>,
    max_history: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor_col: 0,
            scroll_col: 0,
            undo_stack: Vec::new(),
            max_history: 100,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, col: usize) -> usize {
        self.text.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn add_to_undo(&mut self, op: EditOperation) {
        self.undo_stack.push(op);
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let col = cmp::min(self.cursor_col, self.char_len());
        let idx = self.byte_index(col);
        self.text.insert(idx, ch);
        self.cursor_col = col + 1;
        self.add_to_undo(EditOperation::InsertChar { col, ch });
    }

    /// Delete the character before the cursor. Returns false if nothing was deleted.
    pub fn delete_char(&mut self) -> bool {
        let col = cmp::min(self.cursor_col, self.char_len());
        if col == 0 {
            return false;
        }
        let idx = self.byte_index(col - 1);
        let ch = self.text.remove(idx);
        self.cursor_col = col - 1;
        self.add_to_undo(EditOperation::DeleteChar { col: col - 1, ch });
        true
    }

    /// Delete the character under the cursor. Returns false if nothing was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let col = cmp::min(self.cursor_col, self.char_len());
        if col >= self.char_len() {
            return false;
        }
        let idx = self.byte_index(col);
        let ch = self.text.remove(idx);
        self.add_to_undo(EditOperation::DeleteChar { col, ch });
        true
    }

    /// Empty the buffer after a commit. Not undoable.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor_col = 0;
        self.scroll_col = 0;
        self.undo_stack.clear();
    }

    pub fn undo(&mut self) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        match op {
            EditOperation::InsertChar { col, ch } => {
                let idx = self.byte_index(col);
                if self.text[idx..].starts_with(ch) {
                    self.text.remove(idx);
                    self.cursor_col = col;
                }
            }
            EditOperation::DeleteChar { col, ch } => {
                if col <= self.char_len() {
                    let idx = self.byte_index(col);
                    self.text.insert(idx, ch);
                    self.cursor_col = col + 1;
                }
            }
        }
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.char_len() {
            self.cursor_col += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.char_len();
    }

    pub fn move_cursor_word_left(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = cmp::min(self.cursor_col, chars.len());

        // Skip whitespace to the left
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        // Then one run of word characters, or one run of punctuation
        if pos > 0 && is_word_char(chars[pos - 1]) {
            while pos > 0 && is_word_char(chars[pos - 1]) {
                pos -= 1;
            }
        } else {
            while pos > 0 && is_punctuation(chars[pos - 1]) {
                pos -= 1;
            }
        }

        self.cursor_col = pos;
    }

    pub fn move_cursor_word_right(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = cmp::min(self.cursor_col, chars.len());

        if pos < chars.len() && is_word_char(chars[pos]) {
            while pos < chars.len() && is_word_char(chars[pos]) {
                pos += 1;
            }
        } else {
            while pos < chars.len() && is_punctuation(chars[pos]) {
                pos += 1;
            }
        }

        // Skip whitespace to the right
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }

        self.cursor_col = pos;
    }

    /// Keep the cursor inside a viewport of `width` columns
    pub fn update_horizontal_scroll(&mut self, width: usize) {
        if width == 0 {
            return;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + width {
            self.scroll_col = self.cursor_col + 1 - width;
        }
    }

    /// Text visible in a `width`-column viewport and the cursor offset inside it
    pub fn visible(&self, width: usize) -> (String, usize) {
        let visible: String = self.text.chars().skip(self.scroll_col).take(width).collect();
        (visible, self.cursor_col.saturating_sub(self.scroll_col))
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

fn is_punctuation(ch: char) -> bool {
    !is_word_char(ch) && !ch.is_whitespace()
}
