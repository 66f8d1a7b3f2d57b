//! Zip archive of an output folder

use crate::error::{BatchError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// `<dir>.zip`, next to `dir`
pub fn archive_path_for(dir: &Path) -> PathBuf {
    let mut name = dir.as_os_str().to_os_string();
    name.push(".zip");
    PathBuf::from(name)
}

/// Compress every file under `dir` into `zip_path`, entries named by their
/// path relative to `dir`. Returns the number of files written.
pub fn zip_directory(dir: &Path, zip_path: &Path) -> Result<usize> {
    let file = std::fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    let mut count = 0;

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|_| BatchError::InvalidPath(entry.path().to_path_buf()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        zip.write_all(&std::fs::read(entry.path())?)?;
        count += 1;
    }

    zip.finish()?;
    tracing::debug!("Archived {} files into {}", count, zip_path.display());
    Ok(count)
}
