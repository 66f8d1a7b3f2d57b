//! Subcommand handlers

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use batch::{BatchProgress, BatchReport, BatchRequest, JobOutcome};
use fill_engine::CellMode;
use mail_merge::{DataSource, PlaceholderMap};
use pdf_fields::FieldExtractor;
use store::{BatchSettings, SettingsManager, SETTINGS_FILE_NAME};

use crate::cli::{ColumnsArgs, ExtractArgs, FillArgs, InitArgs, SanitizeArgs};

/// Load `docfill.json` from an explicit path, or from the working directory
/// when present
pub fn load_settings(path: Option<&Path>) -> Result<BatchSettings> {
    let mut manager = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Settings file not found: {}", path.display());
            }
            SettingsManager::with_file(path)
        }
        None => SettingsManager::new(PathBuf::from(".")),
    };
    let settings_path = manager.settings_path().to_path_buf();
    let settings = manager
        .load_sync()
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    Ok(settings.clone())
}

/// Command-line flags take precedence over the settings file
pub fn apply_overrides(mut settings: BatchSettings, args: &FillArgs) -> BatchSettings {
    if let Some(root) = &args.output_root {
        settings.output_root = root.clone();
    }
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }
    if let Some(place) = &args.place {
        settings.place = place.clone();
    }
    if args.sequential {
        settings.parallel = false;
    }
    if args.no_tables {
        settings.include_tables = false;
    }
    if args.no_archive {
        settings.archive = false;
    }
    if args.single_pass_cells {
        settings.cell_mode = CellMode::SinglePass;
    }
    settings
}

pub async fn fill(args: FillArgs) -> Result<()> {
    let settings = apply_overrides(load_settings(args.settings.as_deref())?, &args);

    let mut request = BatchRequest::new(&args.data, &args.templates, args.row).with_settings(settings);
    if let Some(logo) = &args.logo {
        request = request.with_logo(logo);
    }

    let report = batch::run_batch_with_progress(&request, |progress: BatchProgress, outcome: &JobOutcome| {
        let status = if outcome.success { "ok" } else { "FAILED" };
        println!(
            "[{}/{}] {} {}",
            progress.completed,
            progress.total,
            status,
            outcome.source.display()
        );
    })
    .await
    .context("Batch aborted")?;

    print_report(&report);
    check_failures(&report, args.strict)
}

/// Failed documents are reported as warnings unless `strict` is set
fn check_failures(report: &BatchReport, strict: bool) -> Result<()> {
    if report.is_success() {
        return Ok(());
    }
    let failed = report.failures().count();
    if strict {
        bail!("{} document(s) could not be filled", failed);
    }
    tracing::warn!("{} document(s) could not be filled", failed);
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!();
    println!("Record:       {}", report.record_id);
    println!("Output:       {}", report.output_dir.display());
    if let Some(archive) = &report.archive {
        println!("Archive:      {}", archive.display());
    }
    println!(
        "Documents:    {} filled, {} failed, {} other files copied",
        report.succeeded(),
        report.failures().count(),
        report.copied_files
    );
    println!(
        "Elapsed:      {:.2}s ({:.1} documents/s)",
        report.elapsed.as_secs_f64(),
        report.throughput()
    );
    for failure in report.failures() {
        println!("  {}: {}", failure.source.display(), failure.message);
    }
}

pub fn extract(args: ExtractArgs) -> Result<()> {
    let extractor = match &args.fields {
        Some(path) => FieldExtractor::new(
            pdf_fields::load_fields(path).with_context(|| format!("Failed to load {}", path.display()))?,
        ),
        None => FieldExtractor::default(),
    };

    let fields = extractor
        .extract_file(&args.pdf)
        .with_context(|| format!("Failed to extract {}", args.pdf.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        for field in &fields {
            println!("{}: {}", field.field, field.value.as_str());
        }
    }

    if let Some(csv) = &args.csv {
        pdf_fields::save_csv(&fields, csv).with_context(|| format!("Failed to write {}", csv.display()))?;
        tracing::info!("Saved {} fields to {}", fields.len(), csv.display());
    }
    Ok(())
}

pub fn sanitize(args: SanitizeArgs) -> Result<()> {
    let renames = batch::sanitize_tree(&args.root)
        .with_context(|| format!("Failed to sanitize {}", args.root.display()))?;
    for (from, to) in &renames {
        println!("{} -> {}", from.display(), to.display());
    }
    println!("{} entries renamed", renames.len());
    Ok(())
}

pub fn columns(args: ColumnsArgs) -> Result<()> {
    let source = mail_merge::load_from_file(&args.data)
        .with_context(|| format!("Failed to load {}", args.data.display()))?;
    let placeholders = PlaceholderMap::from_data_source(&source, args.placeholder_row)?;

    println!("Placeholders (row {}):", placeholders.placeholder_row());
    for entry in placeholders.entries() {
        println!("  {:<24} {}", entry.token, entry.column);
    }

    println!();
    println!("Last {} rows:", args.tail);
    for line in tail_lines(&source, args.tail) {
        println!("{}", line);
    }
    Ok(())
}

/// Tab-separated rows prefixed by their index, leaving out the first column
fn tail_lines(source: &DataSource, limit: usize) -> Vec<String> {
    let columns: Vec<&str> = source.column_names().into_iter().skip(1).collect();
    let mut lines = vec![format!("#\t{}", columns.join("\t"))];
    for (index, record) in source.tail(limit) {
        let values: Vec<String> = columns
            .iter()
            .map(|column| record.get(*column).map(|v| v.to_string_value()).unwrap_or_default())
            .collect();
        lines.push(format!("{}\t{}", index, values.join("\t")));
    }
    lines
}

pub fn init(args: InitArgs) -> Result<()> {
    let mut manager = SettingsManager::new(args.dir.clone());
    if manager.settings_path().exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            manager.settings_path().display()
        );
    }
    manager
        .reset_sync()
        .with_context(|| format!("Failed to write {}", SETTINGS_FILE_NAME))?;
    println!("Wrote {}", manager.settings_path().display());
    Ok(())
}
