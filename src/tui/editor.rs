use std::iter::once;

/// Single-line text input with a character cursor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Editor {
    cursor_position: usize,
    s: String,
}

impl Editor {
    pub fn new(s: impl Into<String>) -> Self {
        let s = s.into();
        Self {
            cursor_position: s.chars().count(),
            s,
        }
    }

    fn len(&self) -> usize {
        self.s.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let before = self.s.chars().take(self.cursor_position);
        let after = self.s.chars().skip(self.cursor_position);
        self.s = before.chain(once(c)).chain(after).collect();
        self.cursor_position += 1;
    }

    pub fn delete_left(&mut self) {
        if self.cursor_position > 0 {
            let before = self.s.chars().take(self.cursor_position - 1);
            let after = self.s.chars().skip(self.cursor_position);
            self.s = before.chain(after).collect();
            self.cursor_position -= 1;
        }
    }

    pub fn delete_right(&mut self) {
        if self.cursor_position < self.len() {
            let before = self.s.chars().take(self.cursor_position);
            let after = self.s.chars().skip(self.cursor_position + 1);
            self.s = before.chain(after).collect();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor_position < self.len() {
            self.cursor_position += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_position = self.len();
    }

    pub fn value(&self) -> &str {
        &self.s
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }
}
