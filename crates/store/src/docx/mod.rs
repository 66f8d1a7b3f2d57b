//! DOCX Text Access
//!
//! Opens a Word package, exposes the text of its body, headers and footers
//! as a [`doc_model::Document`], and writes edited run text back into the
//! original XML.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML files:
//! - `[Content_Types].xml` - Content type definitions
//! - `word/document.xml` - Main document content
//! - `word/header*.xml` / `word/footer*.xml` - Header and footer content
//! - `word/_rels/*.rels` - Relationships of each part
//! - `word/media/` - Embedded images
//!
//! Only text parts are parsed. Every other entry is copied through
//! untouched on save.

mod header_image;
mod text_parts;

pub use header_image::{LogoImage, EMU_PER_INCH};

use crate::package::xml::XmlPart;
use crate::package::{OfficePackage, PackageError, PackageResult};
use doc_model::{Document, HeaderFooter, HeaderFooterKind};
use std::collections::BTreeMap;
use std::path::Path;
use text_parts::{read_blocks, render_part, TextSlot};

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// A DOCX package opened for text substitution
#[derive(Debug, Clone)]
pub struct DocxDocument {
    package: OfficePackage,
    parts: Vec<XmlPart>,
    slots: Vec<TextSlot>,
    document: Document,
}

impl DocxDocument {
    /// Open a DOCX file
    pub fn open(path: impl AsRef<Path>) -> PackageResult<Self> {
        Self::from_package(OfficePackage::open(path)?)
    }

    /// Open DOCX bytes
    pub fn from_bytes(bytes: Vec<u8>) -> PackageResult<Self> {
        Self::from_package(OfficePackage::from_bytes(bytes)?)
    }

    fn from_package(package: OfficePackage) -> PackageResult<Self> {
        if !package.has_part(DOCUMENT_PART) {
            return Err(PackageError::MissingPart(DOCUMENT_PART.to_string()));
        }

        let mut headers: Vec<String> = Vec::new();
        let mut footers: Vec<String> = Vec::new();
        for name in package.part_names() {
            match header_footer_kind(name) {
                Some(HeaderFooterKind::Header) => headers.push(name.to_string()),
                Some(HeaderFooterKind::Footer) => footers.push(name.to_string()),
                None => {}
            }
        }
        headers.sort_by_key(|n| part_number(n));
        footers.sort_by_key(|n| part_number(n));

        let mut parts = Vec::new();
        let mut slots = Vec::new();
        let mut document = Document::new();

        let body = XmlPart::parse(DOCUMENT_PART, &package.read_part_string(DOCUMENT_PART)?)?;
        document.body = read_blocks(parts.len(), &body, &mut slots)?;
        parts.push(body);

        for (kind, names) in [(HeaderFooterKind::Header, headers), (HeaderFooterKind::Footer, footers)] {
            for name in names {
                let part = XmlPart::parse(name.as_str(), &package.read_part_string(&name)?)?;
                let mut content = HeaderFooter::new(kind, name.as_str());
                content.blocks = read_blocks(parts.len(), &part, &mut slots)?;
                document.add_header_footer(content);
                parts.push(part);
            }
        }

        tracing::debug!(
            "Opened DOCX with {} text parts and {} text runs",
            parts.len(),
            slots.len()
        );

        Ok(Self {
            package,
            parts,
            slots,
            document,
        })
    }

    /// Text model of the document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable text model. Only run text may be changed; runs added to or
    /// removed from paragraphs are ignored on save.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Names of the parsed text parts, body first
    pub fn text_part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Write edited text back into the package parts
    fn sync(&mut self) -> PackageResult<()> {
        let mut edits: Vec<BTreeMap<usize, (usize, String)>> = vec![BTreeMap::new(); self.parts.len()];
        for run in self.document.runs() {
            let Some(slot) = self.slots.get(run.format().index()) else {
                continue;
            };
            if run.text != slot.original {
                edits[slot.part].insert(slot.start, (slot.end, run.text.clone()));
            }
        }

        for (part, part_edits) in self.parts.iter().zip(&edits) {
            if part_edits.is_empty() && !part.dirty {
                continue;
            }
            let bytes = render_part(part, part_edits)?;
            self.package.set_part(part.name.clone(), bytes);
        }
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(&mut self) -> PackageResult<Vec<u8>> {
        self.sync()?;
        self.package.to_bytes()
    }

    /// Save the document to `path`
    pub fn save(&mut self, path: impl AsRef<Path>) -> PackageResult<()> {
        self.sync()?;
        self.package.save(path)
    }
}

fn header_footer_kind(name: &str) -> Option<HeaderFooterKind> {
    let file = name.strip_prefix("word/")?;
    if file.contains('/') || !file.ends_with(".xml") {
        return None;
    }
    if file.starts_with("header") {
        Some(HeaderFooterKind::Header)
    } else if file.starts_with("footer") {
        Some(HeaderFooterKind::Footer)
    } else {
        None
    }
}

/// Numeric suffix of `word/header12.xml`, for natural ordering
fn part_number(name: &str) -> (u32, String) {
    let stem = name.trim_end_matches(".xml");
    let digits: String = stem
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    (digits.parse().unwrap_or(0), name.to_string())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::package::build_package;

    pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/></Types>"#;

    pub const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Bonjour [no</w:t></w:r><w:r><w:rPr><w:color w:val="FF0000"/></w:rPr><w:t>m], bienvenue</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>[ville]</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:sectPr><w:headerReference w:type="default" r:id="rId7"/></w:sectPr></w:body></w:document>"#;

    pub const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/></Relationships>"#;

    pub const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:p><w:r><w:drawing><wp:inline><wp:extent cx="2000000" cy="500000"/><a:graphic><a:graphicData><pic:pic><pic:blipFill><a:blip r:embed="rId1"/></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="2000000" cy="500000"/></a:xfrm></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r><w:r><w:t>[nom_organisme]</w:t></w:r></w:p></w:hdr>"#;

    pub const HEADER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/></Relationships>"#;

    pub const FOOTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>Fait à [Fait_a], le [date]</w:t></w:r></w:p></w:ftr>"#;

    /// A small DOCX with body, table, header image and footer
    pub fn sample_docx() -> Vec<u8> {
        build_package([
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("word/document.xml", DOCUMENT.as_bytes()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
            ("word/header1.xml", HEADER.as_bytes()),
            ("word/_rels/header1.xml.rels", HEADER_RELS.as_bytes()),
            ("word/footer1.xml", FOOTER.as_bytes()),
            ("word/media/image1.png", b"old-image".as_slice()),
        ])
        .unwrap()
    }
}
