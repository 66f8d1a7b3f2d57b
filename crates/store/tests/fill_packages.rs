//! Filling real packages through the fill engine

use doc_model::Scope;
use fill_engine::{CellReplacer, RunAwareReplacer, TokenMapping};
use store::package::build_package;
use store::{DocxDocument, OfficePackage, XlsxWorkbook};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t xml:space="preserve">Bonjour [no</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>m], bienvenue</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>[ville]</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:body></w:document>"#;

const FOOTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:r><w:t>[nom] - [ville]</w:t></w:r></w:p></w:ftr>"#;

const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

fn mapping() -> TokenMapping {
    TokenMapping::from_pairs([("[nom]", "Alice"), ("[ville]", "Arles")]).unwrap()
}

fn fill_docx(doc: &mut DocxDocument, include_tables: bool) {
    let mapping = mapping();
    let replacer = RunAwareReplacer::new();
    for scope in Scope::ALL {
        for paragraph in doc.document_mut().paragraphs_mut(scope, include_tables) {
            replacer.replace(paragraph, &mapping);
        }
    }
}

#[test]
fn docx_split_placeholder_keeps_run_properties() {
    let bytes = build_package([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("word/document.xml", DOCUMENT.as_bytes()),
        ("word/footer1.xml", FOOTER.as_bytes()),
        ("word/styles.xml", STYLES.as_bytes()),
    ])
    .unwrap();

    let mut doc = DocxDocument::from_bytes(bytes).unwrap();
    fill_docx(&mut doc, true);
    let out = OfficePackage::from_bytes(doc.to_bytes().unwrap()).unwrap();

    let body = out.read_part_string("word/document.xml").unwrap();
    assert!(body.contains(r#"<w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t xml:space="preserve">"#));
    assert!(body.contains(r#"<w:rPr><w:i/></w:rPr><w:t xml:space="preserve">"#));
    assert!(body.contains(r#"<w:t xml:space="preserve">Arles</w:t>"#));

    let reopened = DocxDocument::from_bytes(out.to_bytes().unwrap()).unwrap();
    assert_eq!(reopened.document().body_text(), "Bonjour Alice, bienvenue");

    let footer = out.read_part_string("word/footer1.xml").unwrap();
    assert!(footer.contains("Alice - Arles"));
    assert_eq!(out.read_part_string("word/styles.xml").unwrap(), STYLES);
}

#[test]
fn docx_tables_can_be_left_alone() {
    let bytes = build_package([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("word/document.xml", DOCUMENT.as_bytes()),
    ])
    .unwrap();

    let mut doc = DocxDocument::from_bytes(bytes).unwrap();
    fill_docx(&mut doc, false);
    let body = String::from_utf8(
        OfficePackage::from_bytes(doc.to_bytes().unwrap())
            .unwrap()
            .read_part("word/document.xml")
            .unwrap(),
    )
    .unwrap();
    assert!(body.contains("<w:t>[ville]</w:t>"));
}

#[test]
fn xlsx_strings_are_filled_numbers_untouched() {
    let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Organisme : [nom]</t></si><si><t>42</t></si></sst>"#;
    let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1"><v>42</v></c><c r="C1" t="inlineStr"><is><t>[ville]</t></is></c></row></sheetData></worksheet>"#;
    let bytes = build_package([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("xl/sharedStrings.xml", sst.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet.as_bytes()),
    ])
    .unwrap();

    let mut book = XlsxWorkbook::from_bytes(bytes).unwrap();
    let mapping = mapping();
    let replacer = CellReplacer::new();
    for cell in book.workbook_mut().cells_mut() {
        replacer.replace(cell, &mapping);
    }
    let out = OfficePackage::from_bytes(book.to_bytes().unwrap()).unwrap();

    let sst_out = out.read_part_string("xl/sharedStrings.xml").unwrap();
    assert!(sst_out.contains("Organisme : Alice"));
    assert!(sst_out.contains("<si><t>42</t></si>"));

    let sheet_out = out.read_part_string("xl/worksheets/sheet1.xml").unwrap();
    assert!(sheet_out.contains(r#"<c r="B1"><v>42</v></c>"#));
    assert!(sheet_out.contains(r#"<is><t xml:space="preserve">Arles</t></is>"#));
}
