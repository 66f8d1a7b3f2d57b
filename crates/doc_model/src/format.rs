//! Opaque formatting identity carried by runs and cells

use serde::{Deserialize, Serialize};

/// Opaque handle to whatever formatting a run or cell carries.
///
/// The owner of the storage decides what the number means (for office
/// packages it indexes the underlying text node). Code that mutates text
/// must copy handles through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormatHandle(u64);

impl FormatHandle {
    /// Create a handle from a raw identifier
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier
    pub const fn id(&self) -> u64 {
        self.0
    }

    /// Raw identifier as an index into the owner's storage
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for FormatHandle {
    fn from(index: usize) -> Self {
        Self(index as u64)
    }
}

impl std::fmt::Display for FormatHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fmt#{}", self.0)
    }
}
