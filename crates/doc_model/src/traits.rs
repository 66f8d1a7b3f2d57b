//! Capability traits the fill engine operates through
//!
//! Concrete storage (an in-memory paragraph, a DOCX text node, a shared
//! string in a workbook) implements these so substitution code never
//! depends on a particular file format.

use std::borrow::Cow;

/// A run: a fragment of paragraph text with mutable content.
pub trait TextRun {
    /// Current text of the run
    fn text(&self) -> &str;

    /// Replace the text of the run, leaving its formatting alone
    fn set_text(&mut self, text: String);
}

/// An ordered sequence of runs whose concatenation is the paragraph text.
pub trait RunContainer {
    type Run: TextRun;

    /// Runs in document order
    fn runs(&self) -> &[Self::Run];

    /// Mutable runs in document order. Implementations must not allow
    /// insertion or removal through this view.
    fn runs_mut(&mut self) -> &mut [Self::Run];

    /// Concatenated text of every run
    fn full_text(&self) -> String {
        self.runs().iter().map(|r| r.text()).collect()
    }
}

/// A single text-valued container with no internal fragmentation.
pub trait TextCell {
    /// String form of the value, or `None` when the cell is empty or its
    /// value has no text representation.
    fn text_value(&self) -> Option<Cow<'_, str>>;

    /// Overwrite the value with text
    fn set_text_value(&mut self, value: String);
}
