//! Batch - fill a tree of office templates from one data record
//!
//! Templates (`.docx`, `.xlsx`) are discovered under a directory, filled
//! with the record's placeholder values plus date and place tokens, and
//! written to an output folder mirroring the template tree. Documents are
//! processed concurrently; a document that cannot be filled is reported
//! without stopping the others.
//!
//! The crate also renames template trees to ASCII names
//! ([`sanitize_tree`]) and zips output folders.

mod archive;
mod date_place;
mod discover;
mod error;
mod job;
mod plan;
mod runner;
mod sanitize;

pub use archive::{archive_path_for, zip_directory};
pub use date_place::{date_place_mapping, today};
pub use discover::{discover_templates, TemplateTree};
pub use error::{BatchError, Result};
pub use job::{run_job, JobContext, JobOutcome};
pub use plan::{output_file_name, output_folder_name, plan_jobs, Job};
pub use runner::{
    prepare_batch, run_batch, run_batch_with_progress, BatchProgress, BatchReport, BatchRequest, PreparedBatch,
};
pub use sanitize::{sanitize_file_name, sanitize_folder_name, sanitize_tree};
