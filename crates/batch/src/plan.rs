//! Job planning: where each template is written

use crate::discover::TemplateTree;
use std::path::{Path, PathBuf};
use store::DocumentFormat;

/// One document to fill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// 1-based position in the plan
    pub number: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub format: DocumentFormat,
}

/// Output file name from a pattern with `{stem}`, `{record}` and `{ext}`
pub fn output_file_name(pattern: &str, stem: &str, extension: &str, record: &str) -> String {
    pattern
        .replace("{stem}", stem)
        .replace("{record}", record)
        .replace("{ext}", extension)
}

/// Output folder name: `<record>_<HH_MM_SS>`
pub fn output_folder_name(record: &str, time: &chrono::NaiveTime) -> String {
    format!("{}_{}", record, time.format("%H_%M_%S"))
}

/// One job per template document, destinations mirroring the template tree
pub fn plan_jobs(tree: &TemplateTree, output_dir: &Path, pattern: &str, record: &str) -> Vec<Job> {
    tree.documents
        .iter()
        .enumerate()
        .map(|(i, (relative, format))| {
            let stem = relative
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let extension = relative
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or(format.extension());
            let file_name = output_file_name(pattern, stem, extension, record);
            let destination = match relative.parent() {
                Some(parent) => output_dir.join(parent).join(file_name),
                None => output_dir.join(file_name),
            };
            Job {
                number: i + 1,
                source: tree.root.join(relative),
                destination,
                format: *format,
            }
        })
        .collect()
}
