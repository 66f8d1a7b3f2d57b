//! Filling one document

use crate::plan::Job;
use doc_model::Scope;
use fill_engine::{CellMode, CellReplacer, RunAwareReplacer, TokenMapping, TokenUsage};
use serde::Serialize;
use std::path::{Path, PathBuf};
use store::{DocumentFormat, DocxDocument, LogoImage, PackageResult, XlsxWorkbook};

/// Everything a job needs besides its paths. Shared by all jobs of a batch.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// Record mapping
    pub mapping: TokenMapping,
    /// Date and place mapping, applied after `mapping`
    pub date_place: TokenMapping,
    pub include_tables: bool,
    pub cell_mode: CellMode,
    /// Replaces the first header image of DOCX files
    pub logo: Option<LogoImage>,
}

/// Result of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub number: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub success: bool,
    pub message: String,
}

impl JobOutcome {
    pub fn success(job: &Job) -> Self {
        Self {
            number: job.number,
            source: job.source.clone(),
            destination: job.destination.clone(),
            success: true,
            message: job.destination.display().to_string(),
        }
    }

    pub fn failure(job: &Job, message: impl Into<String>) -> Self {
        Self {
            number: job.number,
            source: job.source.clone(),
            destination: job.destination.clone(),
            success: false,
            message: message.into(),
        }
    }
}

/// Open, fill and save one document. Never fails: errors become a failed
/// outcome naming the template.
pub fn run_job(job: &Job, ctx: &JobContext) -> JobOutcome {
    let result = match job.format {
        DocumentFormat::Docx => fill_docx(&job.source, &job.destination, ctx),
        DocumentFormat::Xlsx => fill_xlsx(&job.source, &job.destination, ctx),
    };

    match result {
        Ok(usage) => {
            let unmatched = usage.unmatched(&ctx.mapping);
            if !unmatched.is_empty() {
                tracing::debug!("{}: placeholders not found: {}", job.source.display(), unmatched.join(", "));
            }
            tracing::debug!(
                "{}: {} substitutions in {} text units",
                job.source.display(),
                usage.total_hits(),
                usage.units_changed()
            );
            JobOutcome::success(job)
        }
        Err(e) => {
            let name = job
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| job.source.display().to_string());
            let message = format!("Error processing {}: {}", name, e);
            tracing::warn!("{}", message);
            JobOutcome::failure(job, message)
        }
    }
}

fn fill_docx(source: &Path, destination: &Path, ctx: &JobContext) -> PackageResult<TokenUsage> {
    let mut doc = DocxDocument::open(source)?;
    let replacer = RunAwareReplacer::new();
    let mut usage = TokenUsage::new();
    let mut date_place_usage = TokenUsage::new();

    for scope in Scope::ALL {
        for paragraph in doc.document_mut().paragraphs_mut(scope, ctx.include_tables) {
            replacer.replace_with_usage(&mut *paragraph, &ctx.mapping, &mut usage);
            replacer.replace_with_usage(paragraph, &ctx.date_place, &mut date_place_usage);
        }
    }

    if let Some(logo) = &ctx.logo {
        if !doc.replace_first_header_image(logo)? {
            tracing::debug!("{}: no header image to replace", source.display());
        }
    }

    create_parent(destination)?;
    doc.save(destination)?;
    Ok(usage)
}

fn fill_xlsx(source: &Path, destination: &Path, ctx: &JobContext) -> PackageResult<TokenUsage> {
    let mut book = XlsxWorkbook::open(source)?;
    let replacer = CellReplacer::new().with_mode(ctx.cell_mode);
    let mut usage = TokenUsage::new();
    let mut date_place_usage = TokenUsage::new();

    for cell in book.workbook_mut().cells_mut() {
        replacer.replace_with_usage(&mut *cell, &ctx.mapping, &mut usage);
        replacer.replace_with_usage(cell, &ctx.date_place, &mut date_place_usage);
    }

    create_parent(destination)?;
    book.save(destination)?;
    Ok(usage)
}

fn create_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}
