//! Single-line text fields and form value helpers
//!
//! Text editing happens in the view reducers rather than in an input widget,
//! so every keystroke is a plain state transition that unit tests can drive.

use iocraft::prelude::{KeyCode, KeyModifiers};

/// A text field with a cursor (counted in chars, not bytes)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

/// One editing operation on a [`TextField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Remove everything before the cursor
    ClearToStart,
}

impl TextField {
    /// Create a field with the cursor at the end
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Trimmed value, or `None` when blank
    pub fn optional(&self) -> Option<String> {
        non_blank(&self.value)
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    /// Apply an edit. Returns true if the value changed.
    pub fn apply(&mut self, edit: TextEdit) -> bool {
        let len = self.value.chars().count();
        match edit {
            TextEdit::Insert(c) => {
                let at = self.byte_index(self.cursor);
                self.value.insert(at, c);
                self.cursor += 1;
                true
            }
            TextEdit::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_index(self.cursor - 1);
                self.value.remove(at);
                self.cursor -= 1;
                true
            }
            TextEdit::Delete => {
                if self.cursor >= len {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.remove(at);
                true
            }
            TextEdit::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            TextEdit::Right => {
                self.cursor = (self.cursor + 1).min(len);
                false
            }
            TextEdit::Home => {
                self.cursor = 0;
                false
            }
            TextEdit::End => {
                self.cursor = len;
                false
            }
            TextEdit::ClearToStart => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.value.replace_range(..at, "");
                self.cursor = 0;
                true
            }
        }
    }

    /// Text split around the cursor, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }
}

/// Map a key to a text edit. Control and alt chords other than the ones
/// listed are not text input.
pub fn text_edit_for_key(code: KeyCode, modifiers: KeyModifiers) -> Option<TextEdit> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('a') => Some(TextEdit::Home),
            KeyCode::Char('e') => Some(TextEdit::End),
            KeyCode::Char('u') => Some(TextEdit::ClearToStart),
            _ => None,
        };
    }
    if modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match code {
        KeyCode::Char(c) => Some(TextEdit::Insert(c)),
        KeyCode::Backspace => Some(TextEdit::Backspace),
        KeyCode::Delete => Some(TextEdit::Delete),
        KeyCode::Left => Some(TextEdit::Left),
        KeyCode::Right => Some(TextEdit::Right),
        KeyCode::Home => Some(TextEdit::Home),
        KeyCode::End => Some(TextEdit::End),
        _ => None,
    }
}

/// Trimmed text, or `None` when blank
pub fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Split free-text tags on commas, trimming each and dropping empty ones.
/// An empty result is `None` so that it is sent as absent.
///
/// ```
/// use ticketdesk::tui::form::parse_tags;
///
/// assert_eq!(
///     parse_tags("bug, ui,  backend"),
///     Some(vec!["bug".to_string(), "ui".to_string(), "backend".to_string()])
/// );
/// assert_eq!(parse_tags("   "), None);
/// ```
pub fn parse_tags(text: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    (!tags.is_empty()).then_some(tags)
}
