//! Template tree discovery

use crate::error::{BatchError, Result};
use std::path::{Path, PathBuf};
use store::DocumentFormat;
use walkdir::WalkDir;

/// Prefix of office lock and temporary files
const LOCK_FILE_PREFIX: char = '~';

/// Contents of a template directory, as paths relative to its root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateTree {
    pub root: PathBuf,
    /// Documents to fill, with their format
    pub documents: Vec<(PathBuf, DocumentFormat)>,
    /// Other files, copied as they are
    pub other_files: Vec<PathBuf>,
    /// Every directory, parents before children
    pub directories: Vec<PathBuf>,
}

impl TemplateTree {
    pub fn count_of(&self, format: DocumentFormat) -> usize {
        self.documents.iter().filter(|(_, f)| *f == format).count()
    }
}

/// Walk `root` and classify its entries. Lock files (`~$...`) are left out.
pub fn discover_templates(root: impl AsRef<Path>) -> Result<TemplateTree> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(BatchError::TemplateDirNotFound(root.to_path_buf()));
    }

    let mut tree = TemplateTree {
        root: root.to_path_buf(),
        ..Default::default()
    };

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_lock_file(e.file_name().to_str()));

    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| BatchError::InvalidPath(entry.path().to_path_buf()))?
            .to_path_buf();

        if entry.file_type().is_dir() {
            tree.directories.push(relative);
        } else if let Some(format) = DocumentFormat::from_path(&relative) {
            tree.documents.push((relative, format));
        } else {
            tree.other_files.push(relative);
        }
    }

    tracing::debug!(
        "Found {} documents and {} other files under {}",
        tree.documents.len(),
        tree.other_files.len(),
        root.display()
    );
    Ok(tree)
}

fn is_lock_file(name: Option<&str>) -> bool {
    name.is_some_and(|n| n.starts_with(LOCK_FILE_PREFIX))
}
