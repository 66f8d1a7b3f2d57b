//! Text run - a contiguous span of text with consistent formatting

use crate::{FormatHandle, TextRun};
use serde::{Deserialize, Serialize};

/// A text run - contiguous text with consistent formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    /// The text content of this run
    pub text: String,
    /// Formatting identity, never altered by text edits
    format: FormatHandle,
}

impl Run {
    /// Create a new run with default formatting
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: FormatHandle::default(),
        }
    }

    /// Create a new run bound to a formatting handle
    pub fn with_format(text: impl Into<String>, format: FormatHandle) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Formatting handle of this run
    pub fn format(&self) -> FormatHandle {
        self.format
    }

    /// Get the length of the text in this run (in UTF-8 bytes)
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Number of characters (Unicode scalar values) in this run
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if this run is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl TextRun for Run {
    fn text(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_keeps_format() {
        let mut run = Run::with_format("[nom]", FormatHandle::new(7));
        run.set_text("Alice".to_string());
        assert_eq!(run.text, "Alice");
        assert_eq!(run.format(), FormatHandle::new(7));
    }

    #[test]
    fn test_char_count_vs_len() {
        let run = Run::new("été");
        assert_eq!(run.char_count(), 3);
        assert_eq!(run.len(), 5);
    }
}
