//! Input state and key handling for the TUI.
//!
//! This module owns all text input state (buffer, cursor) and handles
//! character-level key events. Submitted lines are handed to the view,
//! which turns them into commands.

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// Result of feeding one key to the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Buffer or cursor changed.
    Render,
    /// Enter pressed on a non-empty line.
    Submit(String),
    /// Quit requested.
    Quit,
    /// Nothing to do.
    None,
}

/// Input state for the TUI.
///
/// The cursor counts characters, not bytes, so editing never splits a
/// multi-byte character.
#[derive(Debug, Default)]
pub struct InputState {
    /// Text buffer for user input.
    buffer: String,
    /// Cursor position, in characters.
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    pub fn handle_key(&mut self, key: KeyInput) -> InputAction {
        match key {
            KeyInput::Char(c) => {
                let at = self.byte_offset(self.cursor);
                self.buffer.insert(at, c);
                self.cursor = self.cursor.saturating_add(1);
                InputAction::Render
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputAction::Render
            },
            KeyInput::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_offset(self.cursor);
                    self.buffer.remove(at);
                }
                InputAction::Render
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputAction::Render
            },
            KeyInput::Right => {
                if self.cursor < self.len() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                InputAction::Render
            },
            KeyInput::Home => {
                self.cursor = 0;
                InputAction::Render
            },
            KeyInput::End => {
                self.cursor = self.len();
                InputAction::Render
            },
            KeyInput::Enter => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                if text.is_empty() { InputAction::None } else { InputAction::Submit(text) }
            },
            KeyInput::Esc => InputAction::Quit,
        }
    }

    fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(input: &mut InputState, text: &str) {
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c));
        }
    }

    #[test]
    fn typing_and_submit() {
        let mut input = InputState::new();
        type_str(&mut input, "hi there");

        assert_eq!(input.handle_key(KeyInput::Enter), InputAction::Submit("hi there".into()));
        assert_eq!(input.buffer(), "");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_on_empty_line_does_nothing() {
        let mut input = InputState::new();
        assert_eq!(input.handle_key(KeyInput::Enter), InputAction::None);
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = InputState::new();
        type_str(&mut input, "helo");
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Char('l'));
        assert_eq!(input.buffer(), "hello");

        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Delete);
        assert_eq!(input.buffer(), "ello");

        input.handle_key(KeyInput::End);
        input.handle_key(KeyInput::Backspace);
        assert_eq!(input.buffer(), "ell");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn multibyte_characters_are_edited_whole() {
        let mut input = InputState::new();
        type_str(&mut input, "zoë!");
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Backspace);

        assert_eq!(input.buffer(), "zo!");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut input = InputState::new();
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Backspace);
        type_str(&mut input, "ab");
        input.handle_key(KeyInput::Right);
        input.handle_key(KeyInput::Delete);

        assert_eq!(input.cursor(), 2);
        assert_eq!(input.buffer(), "ab");
    }

    #[test]
    fn esc_quits() {
        assert_eq!(InputState::new().handle_key(KeyInput::Esc), InputAction::Quit);
    }
}
