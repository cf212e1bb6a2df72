use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// A single line text field, the cursor counts chars
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new<S: Into<String>>(value: S) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value<S: Into<String>>(&mut self, value: S) {
        *self = Self::new(value);
    }

    /// Terminal columns between the start of the text and the cursor
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.byte_index()].width() as u16
    }

    /// Applies an editing key, returns true when the text changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let index = self.byte_index();
                self.value.insert(index, c);
                self.cursor += 1;
                true
            }
            KeyCode::Char('u') => {
                // ctrl+u clears up to the cursor
                let index = self.byte_index();
                self.value.replace_range(..index, "");
                self.cursor = 0;
                index > 0
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let index = self.byte_index();
                self.value.remove(index);
                true
            }
            KeyCode::Delete if self.cursor < self.value.chars().count() => {
                let index = self.byte_index();
                self.value.remove(index);
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.value.chars().count());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map_or(self.value.len(), |(i, _)| i)
    }
}
