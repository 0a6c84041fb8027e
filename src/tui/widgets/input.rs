//! Text input widget
//!
//! A single-line text field with cursor support and optional masking.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};
use zeroize::Zeroize;

/// A simple text input widget
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    /// Current text content
    content: String,
    /// Cursor position, in characters
    cursor: usize,
    /// Whether the input is focused
    pub focused: bool,
    /// Render every character as `*`
    pub masked: bool,
    /// Placeholder text
    pub placeholder: String,
    /// Label
    pub label: String,
}

impl TextInput {
    /// Create a new text input
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the placeholder
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Hide the content behind `*`
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Set content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.cursor = self.content.chars().count();
        self
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Wipe the content
    pub fn clear(&mut self) {
        self.content.zeroize();
        self.cursor = 0;
    }

    /// Get the current content
    pub fn value(&self) -> &str {
        &self.content
    }

    /// Text as it should appear on screen
    pub fn display_text(&self) -> String {
        if self.masked {
            "*".repeat(self.char_len())
        } else {
            self.content.clone()
        }
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label_width = if self.label.is_empty() {
            0
        } else {
            self.label.len() + 2
        };

        let input_start = area.x + label_width as u16;

        if !self.label.is_empty() {
            let label_line = Line::from(vec![
                Span::styled(self.label.as_str(), Style::default().fg(Color::Cyan)),
                Span::raw(": "),
            ]);
            buf.set_line(area.x, area.y, &label_line, label_width as u16);
        }

        let (text, style) = if self.content.is_empty() && !self.focused {
            (self.placeholder.clone(), Style::default().fg(Color::DarkGray))
        } else if self.focused {
            (self.display_text(), Style::default().fg(Color::White))
        } else {
            (self.display_text(), Style::default().fg(Color::Yellow))
        };

        buf.set_string(input_start, area.y, &text, style);

        if self.focused {
            let cursor_x = input_start + self.cursor as u16;
            if cursor_x < area.x + area.width {
                let cursor_char = if self.cursor < self.char_len() {
                    self.display_text().chars().nth(self.cursor).unwrap_or('_')
                } else {
                    '_'
                };
                buf.set_string(
                    cursor_x,
                    area.y,
                    cursor_char.to_string(),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing() {
        let mut input = TextInput::new();
        for c in "A12".chars() {
            input.insert(c);
        }
        input.move_left();
        input.insert('x');
        assert_eq!(input.value(), "A1x2");

        input.backspace();
        input.move_start();
        input.delete();
        assert_eq!(input.value(), "12");
    }

    #[test]
    fn test_masked_display() {
        let input = TextInput::new().masked().content("secret");
        assert_eq!(input.display_text(), "******");
        assert_eq!(input.value(), "secret");
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut input = TextInput::new().content("pw");
        input.clear();
        assert_eq!(input.value(), "");
        input.insert('a');
        assert_eq!(input.value(), "a");
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut input = TextInput::new().content("凱基");
        input.move_left();
        input.insert('x');
        assert_eq!(input.value(), "凱x基");
    }
}
