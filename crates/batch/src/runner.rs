//! Batch orchestration
//!
//! A batch fills every template of a directory from one data record:
//!
//! 1. load the data source and resolve the record's token mapping
//! 2. create `<output_root>/<record>_<HH_MM_SS>` and mirror the template
//!    tree into it, copying files that are not documents
//! 3. run one job per document, concurrently or in order
//! 4. optionally zip the output folder
//!
//! Anything going wrong in steps 1 and 2 aborts the batch before a job
//! starts. A job failure is recorded in the report and the other jobs go on.

use crate::archive::{archive_path_for, zip_directory};
use crate::date_place::{date_place_mapping, today};
use crate::discover::{discover_templates, TemplateTree};
use crate::error::{BatchError, Result};
use crate::job::{run_job, JobContext, JobOutcome};
use crate::plan::{output_folder_name, plan_jobs, Job};
use crate::sanitize::sanitize_folder_name;
use futures::stream::{self, StreamExt};
use mail_merge::{record_value, PlaceholderMap};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use store::{BatchSettings, DocumentFormat, LogoImage};

/// What to fill, and with which settings
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// CSV, TSV or XLSX data file
    pub data_file: PathBuf,
    pub template_dir: PathBuf,
    /// Data row to fill documents with
    pub record_index: usize,
    /// Logo for DOCX headers
    pub logo: Option<PathBuf>,
    pub settings: BatchSettings,
}

impl BatchRequest {
    pub fn new(data_file: impl Into<PathBuf>, template_dir: impl Into<PathBuf>, record_index: usize) -> Self {
        Self {
            data_file: data_file.into(),
            template_dir: template_dir.into(),
            record_index,
            logo: None,
            settings: BatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: BatchSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// Progress after a finished job
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

impl BatchProgress {
    pub fn at(completed: usize, total: usize) -> Self {
        let percent = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            100.0
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Summary of a finished batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub archive: Option<PathBuf>,
    pub record_id: String,
    /// Job outcomes in completion order
    pub outcomes: Vec<JobOutcome>,
    /// Non-document files copied into the output folder
    pub copied_files: usize,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }

    /// Documents per second
    pub fn throughput(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            self.outcomes.len() as f64 / seconds
        } else {
            0.0
        }
    }
}

/// A batch ready to run: output folder created, jobs planned
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub output_dir: PathBuf,
    pub record_id: String,
    pub jobs: Vec<Job>,
    pub copied_files: usize,
    context: JobContext,
}

impl PreparedBatch {
    pub fn context(&self) -> &JobContext {
        &self.context
    }
}

/// Run the fatal steps of a batch: data, mapping, template tree, output folder
pub fn prepare_batch(request: &BatchRequest) -> Result<PreparedBatch> {
    let settings = &request.settings;

    let tree = discover_templates(&request.template_dir)?;
    let data_source = mail_merge::load_from_file(&request.data_file)?;
    let placeholders = PlaceholderMap::from_data_source(&data_source, settings.placeholder_row)?;
    let mapping = placeholders.resolve(&data_source, request.record_index)?;
    let date_place = date_place_mapping(settings, today())?;

    let record_id = record_id(&data_source, request.record_index, &settings.record_id_column);
    let folder = output_folder_name(&record_id, &chrono::Local::now().time());
    let output_dir = settings.output_root.join(folder);
    std::fs::create_dir_all(&output_dir).map_err(|source| BatchError::OutputDir {
        path: output_dir.clone(),
        source,
    })?;

    let copied_files = mirror_tree(&tree, &output_dir)?;
    let jobs = plan_jobs(&tree, &output_dir, &settings.file_name_pattern, &record_id);

    let logo = match &request.logo {
        Some(path) => Some(
            LogoImage::from_file(path)?.with_size_inches(settings.logo_width_inches, settings.logo_height_inches),
        ),
        None => None,
    };

    tracing::info!(
        "Record {} ({}): {} placeholders, {} documents ({} docx, {} xlsx), output {}",
        request.record_index,
        record_id,
        mapping.len(),
        jobs.len(),
        tree.count_of(DocumentFormat::Docx),
        tree.count_of(DocumentFormat::Xlsx),
        output_dir.display()
    );

    Ok(PreparedBatch {
        output_dir,
        record_id,
        jobs,
        copied_files,
        context: JobContext {
            mapping,
            date_place,
            include_tables: settings.include_tables,
            cell_mode: settings.cell_mode,
            logo,
        },
    })
}

/// Run a batch without progress reporting
pub async fn run_batch(request: &BatchRequest) -> Result<BatchReport> {
    run_batch_with_progress(request, |_, _| {}).await
}

/// Run a batch, calling `on_progress` after each finished job
pub async fn run_batch_with_progress<F>(request: &BatchRequest, on_progress: F) -> Result<BatchReport>
where
    F: FnMut(BatchProgress, &JobOutcome),
{
    let start = Instant::now();
    let settings = &request.settings;
    let prepared = prepare_batch(request)?;

    let outcomes = if settings.parallel && prepared.jobs.len() > 1 {
        run_concurrent(&prepared, settings.effective_workers(), on_progress).await
    } else {
        run_sequential(&prepared, on_progress)
    };

    let archive = if settings.archive {
        let zip_path = archive_path_for(&prepared.output_dir);
        zip_directory(&prepared.output_dir, &zip_path)?;
        Some(zip_path)
    } else {
        None
    };

    let report = BatchReport {
        output_dir: prepared.output_dir,
        archive,
        record_id: prepared.record_id,
        outcomes,
        copied_files: prepared.copied_files,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        "Filled {}/{} documents in {:.2}s ({:.2} documents/s)",
        report.succeeded(),
        report.outcomes.len(),
        report.elapsed.as_secs_f64(),
        report.throughput()
    );
    Ok(report)
}

/// Jobs on the blocking pool, at most `workers` at a time
async fn run_concurrent<F>(prepared: &PreparedBatch, workers: usize, mut on_progress: F) -> Vec<JobOutcome>
where
    F: FnMut(BatchProgress, &JobOutcome),
{
    let total = prepared.jobs.len();
    let context = Arc::new(prepared.context.clone());
    let mut completed = 0;

    stream::iter(prepared.jobs.iter().cloned().map(|job| {
        let context = Arc::clone(&context);
        async move {
            let fallback = job.clone();
            match tokio::task::spawn_blocking(move || run_job(&job, &context)).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("Job for {} did not finish: {}", fallback.source.display(), e);
                    JobOutcome::failure(&fallback, format!("Job aborted: {}", e))
                }
            }
        }
    }))
    .buffer_unordered(workers)
    .inspect(|outcome| {
        completed += 1;
        on_progress(BatchProgress::at(completed, total), outcome);
    })
    .collect()
    .await
}

/// Jobs one after the other on the calling thread
fn run_sequential<F>(prepared: &PreparedBatch, mut on_progress: F) -> Vec<JobOutcome>
where
    F: FnMut(BatchProgress, &JobOutcome),
{
    let total = prepared.jobs.len();
    prepared
        .jobs
        .iter()
        .enumerate()
        .map(|(i, job)| {
            let outcome = run_job(job, &prepared.context);
            on_progress(BatchProgress::at(i + 1, total), &outcome);
            outcome
        })
        .collect()
}

/// Sanitized value of the id column, or `ligne_<n>` when it is missing or empty
fn record_id(data_source: &mail_merge::DataSource, record_index: usize, column: &str) -> String {
    let id = match record_value(data_source, record_index, column) {
        Ok(value) => sanitize_folder_name(value.trim()),
        Err(e) => {
            tracing::warn!("No record id from column '{}': {}", column, e);
            String::new()
        }
    };
    if id.is_empty() || id == "_" {
        format!("ligne_{}", record_index)
    } else {
        id
    }
}

/// Create the template directories under `output_dir` and copy the files
/// that are not filled. Returns the number of files copied.
fn mirror_tree(tree: &TemplateTree, output_dir: &Path) -> Result<usize> {
    for dir in &tree.directories {
        std::fs::create_dir_all(output_dir.join(dir))?;
    }
    for file in &tree.other_files {
        std::fs::copy(tree.root.join(file), output_dir.join(file))?;
    }
    Ok(tree.other_files.len())
}
