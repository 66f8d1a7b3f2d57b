//! Office Open XML packages
//!
//! DOCX and XLSX files are ZIP archives of XML parts. [`OfficePackage`]
//! keeps the original archive bytes, serves parts on demand and records
//! replaced or added parts. Saving streams untouched entries across with
//! `raw_copy_file`, so their compressed bytes are never re-encoded.

pub mod content_types;
mod error;
pub mod relationships;
pub mod xml;

pub use error::{PackageError, PackageResult};

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// An opened office package
#[derive(Debug, Clone)]
pub struct OfficePackage {
    source: Vec<u8>,
    names: Vec<String>,
    replaced: BTreeMap<String, Vec<u8>>,
}

impl OfficePackage {
    /// Read a package from disk
    pub fn open(path: impl AsRef<Path>) -> PackageResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(bytes)
    }

    /// Read a package from memory
    pub fn from_bytes(source: Vec<u8>) -> PackageResult<Self> {
        let archive = ZipArchive::new(Cursor::new(source.as_slice()))?;
        let names = archive.file_names().map(str::to_string).collect();
        Ok(Self {
            source,
            names,
            replaced: BTreeMap::new(),
        })
    }

    /// Part names in archive order, added parts last
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Current bytes of a part
    pub fn read_part(&self, name: &str) -> PackageResult<Vec<u8>> {
        if let Some(data) = self.replaced.get(name) {
            return Ok(data.clone());
        }
        let mut archive = self.archive()?;
        let mut file = archive.by_name(name).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                PackageError::MissingPart(name.to_string())
            } else {
                PackageError::from(e)
            }
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Current content of a part as UTF-8 text
    pub fn read_part_string(&self, name: &str) -> PackageResult<String> {
        Ok(String::from_utf8(self.read_part(name)?)?)
    }

    /// Replace a part, or add it when the name is new
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        if !self.has_part(&name) {
            self.names.push(name.clone());
        }
        self.replaced.insert(name, data);
    }

    /// True when a part was replaced or added since opening
    pub fn is_modified(&self) -> bool {
        !self.replaced.is_empty()
    }

    /// Write the package to any seekable writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> PackageResult<()> {
        let mut archive = self.archive()?;
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for name in &self.names {
            match self.replaced.get(name) {
                Some(data) => {
                    zip.start_file(name.as_str(), options)?;
                    zip.write_all(data)?;
                }
                None => {
                    let file = archive.by_name(name)?;
                    zip.raw_copy_file(file)?;
                }
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Serialize the package to bytes
    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the package to `path` in a single final write
    pub fn save(&self, path: impl AsRef<Path>) -> PackageResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }

    fn archive(&self) -> PackageResult<ZipArchive<Cursor<&[u8]>>> {
        Ok(ZipArchive::new(Cursor::new(self.source.as_slice()))?)
    }
}

/// Build a package in memory from (name, content) pairs. Used by tests and
/// by callers producing fixtures.
pub fn build_package<'a>(parts: impl IntoIterator<Item = (&'a str, &'a [u8])>) -> PackageResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut cursor);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in parts {
            zip.start_file(name, options)?;
            zip.write_all(data)?;
        }
        zip.finish()?;
    }
    Ok(cursor.into_inner())
}
