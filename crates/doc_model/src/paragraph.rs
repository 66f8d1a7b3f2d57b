//! Paragraph - an ordered sequence of runs

use crate::{FormatHandle, Run, RunContainer};
use serde::{Deserialize, Serialize};

/// A paragraph containing text runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    runs: Vec<Run>,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a paragraph from existing runs
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self { runs }
    }

    /// Create a paragraph with one run per text fragment, handles numbered from zero
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let runs = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Run::with_format(text, FormatHandle::from(i)))
            .collect();
        Self { runs }
    }

    /// Append a run
    pub fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    /// Runs in order
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Concatenated text of the paragraph
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when the paragraph has no visible text
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(Run::is_empty)
    }

    /// Text of each run, in order
    pub fn run_texts(&self) -> Vec<&str> {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

impl RunContainer for Paragraph {
    type Run = Run;

    fn runs(&self) -> &[Run] {
        &self.runs
    }

    fn runs_mut(&mut self) -> &mut [Run] {
        &mut self.runs
    }
}
