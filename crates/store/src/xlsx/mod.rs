//! XLSX Text Access
//!
//! Opens a SpreadsheetML package and exposes its text-bearing cells as a
//! [`doc_model::Workbook`]:
//! - every item of `xl/sharedStrings.xml`, once, whatever the number of
//!   cells referencing it
//! - every inline string (`<c t="inlineStr">`) of every worksheet
//!
//! Numbers, booleans, formulas and their cached results stay in the XML
//! untouched. Rich-text items keep their first run's properties: the new
//! text goes into the first `<t>` and the other `<t>` elements are emptied.

mod strings;

use crate::package::relationships::{rels_path_for, resolve_target, Relationships};
use crate::package::xml::{get_attribute, XmlPart};
use crate::package::{OfficePackage, PackageResult};
use doc_model::{Sheet, TextCell, Workbook};
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::path::Path;
use strings::{read_string_items, render_part, StringSlot, ITEM_INLINE, ITEM_SHARED};

/// Shared string table part
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
/// Workbook part listing the sheets
pub const WORKBOOK_PART: &str = "xl/workbook.xml";

const WORKSHEETS_DIR: &str = "xl/worksheets/";

/// An XLSX package opened for text substitution
#[derive(Debug, Clone)]
pub struct XlsxWorkbook {
    package: OfficePackage,
    parts: Vec<XmlPart>,
    slots: Vec<StringSlot>,
    workbook: Workbook,
}

impl XlsxWorkbook {
    /// Open an XLSX file
    pub fn open(path: impl AsRef<Path>) -> PackageResult<Self> {
        Self::from_package(OfficePackage::open(path)?)
    }

    /// Open XLSX bytes
    pub fn from_bytes(bytes: Vec<u8>) -> PackageResult<Self> {
        Self::from_package(OfficePackage::from_bytes(bytes)?)
    }

    fn from_package(package: OfficePackage) -> PackageResult<Self> {
        let mut parts = Vec::new();
        let mut slots = Vec::new();
        let mut workbook = Workbook::new();

        if package.has_part(SHARED_STRINGS_PART) {
            let part = XmlPart::parse(SHARED_STRINGS_PART, &package.read_part_string(SHARED_STRINGS_PART)?)?;
            workbook.shared_strings = read_string_items(parts.len(), &part, ITEM_SHARED, &mut slots)?;
            parts.push(part);
        }

        for (name, part_name) in worksheet_parts(&package)? {
            let part = XmlPart::parse(part_name.as_str(), &package.read_part_string(&part_name)?)?;
            let mut sheet = Sheet::new(name);
            sheet.cells = read_string_items(parts.len(), &part, ITEM_INLINE, &mut slots)?;
            workbook.sheets.push(sheet);
            parts.push(part);
        }

        tracing::debug!(
            "Opened XLSX with {} sheets and {} text cells",
            workbook.sheets.len(),
            workbook.cell_count()
        );

        Ok(Self {
            package,
            parts,
            slots,
            workbook,
        })
    }

    /// Text cells of the workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Mutable text cells. Cells added or removed are ignored on save.
    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    fn sync(&mut self) -> PackageResult<()> {
        let mut edits: Vec<BTreeMap<usize, String>> = vec![BTreeMap::new(); self.parts.len()];
        let cells = self
            .workbook
            .shared_strings
            .iter()
            .chain(self.workbook.sheets.iter().flat_map(|s| s.cells.iter()));

        for cell in cells.filter(|c| c.is_dirty()) {
            let Some(slot) = self.slots.get(cell.handle().index()) else {
                continue;
            };
            let text = cell.text_value().map(|t| t.into_owned()).unwrap_or_default();
            if text != slot.original {
                edits[slot.part].insert(cell.handle().index(), text);
            }
        }

        for (part, part_edits) in self.parts.iter().zip(&edits) {
            if part_edits.is_empty() {
                continue;
            }
            let bytes = render_part(part, &self.slots, part_edits)?;
            self.package.set_part(part.name.clone(), bytes);
        }
        Ok(())
    }

    /// Serialize the workbook to bytes
    pub fn to_bytes(&mut self) -> PackageResult<Vec<u8>> {
        self.sync()?;
        self.package.to_bytes()
    }

    /// Save the workbook to `path`
    pub fn save(&mut self, path: impl AsRef<Path>) -> PackageResult<()> {
        self.sync()?;
        self.package.save(path)
    }
}

/// (sheet name, part name) of every worksheet, in workbook order.
///
/// Worksheets the workbook part does not list are appended under their
/// file stem.
fn worksheet_parts(package: &OfficePackage) -> PackageResult<Vec<(String, String)>> {
    let mut sheets = Vec::new();

    let rels_name = rels_path_for(WORKBOOK_PART);
    if package.has_part(WORKBOOK_PART) && package.has_part(&rels_name) {
        let workbook = XmlPart::parse(WORKBOOK_PART, &package.read_part_string(WORKBOOK_PART)?)?;
        let rels = Relationships::parse(rels_name.as_str(), &package.read_part_string(&rels_name)?)?;

        for event in &workbook.events {
            let (Event::Empty(e) | Event::Start(e)) = event else {
                continue;
            };
            if e.name().as_ref() != b"sheet" {
                continue;
            }
            let (Some(name), Some(rel_id)) = (get_attribute(e, b"name"), get_attribute(e, b"r:id")) else {
                continue;
            };
            match rels.get(&rel_id) {
                Some(rel) => {
                    let part_name = resolve_target(WORKBOOK_PART, &rel.target);
                    if package.has_part(&part_name) {
                        sheets.push((name, part_name));
                    }
                }
                None => tracing::warn!("Sheet '{}' has no relationship {}", name, rel_id),
            }
        }
    }

    let mut unlisted: Vec<String> = package
        .part_names()
        .filter(|n| {
            n.strip_prefix(WORKSHEETS_DIR)
                .is_some_and(|f| !f.contains('/') && f.ends_with(".xml"))
        })
        .filter(|n| !sheets.iter().any(|(_, p)| p == n))
        .map(str::to_string)
        .collect();
    unlisted.sort();
    for part_name in unlisted {
        let stem = part_name
            .trim_start_matches(WORKSHEETS_DIR)
            .trim_end_matches(".xml")
            .to_string();
        sheets.push((stem, part_name));
    }

    Ok(sheets)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::package::build_package;

    pub const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

    pub const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Convention" sheetId="1" r:id="rId1"/><sheet name="Budget" sheetId="2" r:id="rId2"/></sheets></workbook>"#;

    pub const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet2.xml"/></Relationships>"#;

    pub const SHARED_STRINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3"><si><t>[nom_organisme]</t></si><si><r><rPr><b/></rPr><t>Montant pour [</t></r><r><t>ville]</t></r><rPh><t>ignored</t></rPh></si><si><t>Total</t></si></sst>"#;

    pub const SHEET1: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>1234</v></c><c r="C1" t="inlineStr"><is><t>Fait à [Fait_a]</t></is></c></row></sheetData></worksheet>"#;

    pub const SHEET2: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>1</v></c><c r="B1" t="s"><v>2</v></c><c r="C1"><f>SUM(1,2)</f><v>3</v></c></row></sheetData></worksheet>"#;

    pub fn sample_xlsx() -> Vec<u8> {
        build_package([
            ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
            ("xl/workbook.xml", WORKBOOK.as_bytes()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
            ("xl/sharedStrings.xml", SHARED_STRINGS.as_bytes()),
            ("xl/worksheets/sheet1.xml", SHEET1.as_bytes()),
            ("xl/worksheets/sheet2.xml", SHEET2.as_bytes()),
        ])
        .unwrap()
    }
}
