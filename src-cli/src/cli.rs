//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fill office templates from a row of tabular data
#[derive(Debug, Parser)]
#[command(name = "docfill")]
#[command(version, about)]
pub struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fill every template of a directory with one data row
    Fill(FillArgs),
    /// Scrape labeled fields out of a PDF
    Extract(ExtractArgs),
    /// Rename template files and folders to ASCII names
    Sanitize(SanitizeArgs),
    /// Show the placeholder of each column and the last data rows
    Columns(ColumnsArgs),
    /// Write a settings file with the default values
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct FillArgs {
    /// Data file (.csv, .tsv or .xlsx)
    pub data: PathBuf,

    /// Template directory
    pub templates: PathBuf,

    /// Index of the data row to use
    #[arg(short, long)]
    pub row: usize,

    /// Settings file (JSON)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Folder receiving the output folder
    #[arg(short, long)]
    pub output_root: Option<PathBuf>,

    /// Logo replacing the first header image of Word documents
    #[arg(long)]
    pub logo: Option<PathBuf>,

    /// Concurrent documents
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Process documents one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Leave paragraphs inside Word tables alone
    #[arg(long)]
    pub no_tables: bool,

    /// Do not write a zip archive of the output folder
    #[arg(long)]
    pub no_archive: bool,

    /// Value of the place tokens
    #[arg(long)]
    pub place: Option<String>,

    /// Match all tokens against the original cell value once
    #[arg(long)]
    pub single_pass_cells: bool,

    /// Exit with an error when any document could not be filled
    /// (by default failed documents are listed and the exit code is 0)
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// PDF file
    pub pdf: PathBuf,

    /// Field list (JSON array of {"keyword", "field"}); built-in list otherwise
    #[arg(short, long)]
    pub fields: Option<PathBuf>,

    /// Write the results to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SanitizeArgs {
    /// Template directory
    pub root: PathBuf,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Data file (.csv, .tsv or .xlsx)
    pub data: PathBuf,

    /// Row holding the placeholders
    #[arg(long, default_value_t = 0)]
    pub placeholder_row: usize,

    /// Number of trailing rows to show
    #[arg(long, default_value_t = 7)]
    pub tail: usize,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory receiving docfill.json
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Overwrite an existing settings file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fill() {
        let cli = Cli::try_parse_from([
            "docfill", "fill", "clients.xlsx", "templates", "--row", "3", "-w", "8", "--no-archive", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Fill(args) = cli.command else {
            panic!("expected fill");
        };
        assert_eq!(args.row, 3);
        assert_eq!(args.workers, Some(8));
        assert!(args.no_archive);
        assert!(!args.sequential);
        assert!(!args.strict);
    }

    #[test]
    fn test_fill_requires_row() {
        assert!(Cli::try_parse_from(["docfill", "fill", "clients.csv", "templates"]).is_err());
    }

    #[test]
    fn test_columns_defaults() {
        let cli = Cli::try_parse_from(["docfill", "columns", "clients.csv"]).unwrap();
        let Command::Columns(args) = cli.command else {
            panic!("expected columns");
        };
        assert_eq!(args.placeholder_row, 0);
        assert_eq!(args.tail, 7);
    }
}
