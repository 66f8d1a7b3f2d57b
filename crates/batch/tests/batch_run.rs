//! End-to-end batch runs over generated templates

use batch::{run_batch, run_batch_with_progress, BatchError, BatchRequest};
use std::path::Path;
use store::package::build_package;
use store::{BatchSettings, DocxDocument, OfficePackage};
use tempfile::TempDir;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const DATA: &str = "Nom de l'organisme;Ville;Code postal\n[nom_organisme];[ville];[cp]\nFormations du Sud;Arles;01300\n";

fn docx(body_text: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r><w:r><w:t xml:space="preserve"> le [date] à [Fait_a]</w:t></w:r></w:p></w:body></w:document>"#,
        body_text
    );
    build_package([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("word/document.xml", document.as_bytes()),
    ])
    .unwrap()
}

fn xlsx() -> Vec<u8> {
    let sst = r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>[ville] ([cp])</t></si></sst>"#;
    let sheet = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1"><c r="A1" t="s"><v>0</v></c></row></sheetData></worksheet>"#;
    build_package([
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("xl/sharedStrings.xml", sst.as_bytes()),
        ("xl/worksheets/sheet1.xml", sheet.as_bytes()),
    ])
    .unwrap()
}

struct Fixture {
    _dir: TempDir,
    data: std::path::PathBuf,
    templates: std::path::PathBuf,
    output_root: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("clients.csv");
    std::fs::write(&data, DATA).unwrap();
    let templates = dir.path().join("templates");
    std::fs::create_dir_all(&templates).unwrap();
    let output_root = dir.path().join("docs");
    Fixture {
        data,
        templates,
        output_root,
        _dir: dir,
    }
}

fn settings(output_root: &Path, parallel: bool) -> BatchSettings {
    BatchSettings {
        output_root: output_root.to_path_buf(),
        parallel,
        workers: 2,
        ..Default::default()
    }
}

fn read_part(path: &Path, part: &str) -> String {
    OfficePackage::open(path).unwrap().read_part_string(part).unwrap()
}

fn body_text(path: &Path) -> String {
    DocxDocument::open(path).unwrap().document().body_text()
}

#[tokio::test]
async fn corrupt_document_does_not_stop_siblings() {
    let fx = fixture();
    for i in 1..=5 {
        let path = fx.templates.join(format!("doc{}.docx", i));
        if i == 3 {
            std::fs::write(&path, b"PK\x03\x04 this is not a zip").unwrap();
        } else {
            std::fs::write(&path, docx("Organisme : [nom_organisme]")).unwrap();
        }
    }

    let request = BatchRequest::new(&fx.data, &fx.templates, 1).with_settings(settings(&fx.output_root, true));
    let mut progress = Vec::new();
    let report = run_batch_with_progress(&request, |p, _| progress.push(p.completed))
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.succeeded(), 4);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("doc3.docx"));
    assert_eq!(progress, vec![1, 2, 3, 4, 5]);

    assert_eq!(report.record_id, "Formations_du_Sud");
    let output = report.output_dir.join("doc1_Formations_du_Sud.docx");
    let body = body_text(&output);
    assert!(body.starts_with("Organisme : Formations du Sud le "));
    assert!(body.ends_with(" à Arles"));
    assert!(!body.contains("[date]"));
    assert!(read_part(&output, "word/document.xml").contains("<w:rPr><w:b/></w:rPr>"));
    assert!(!report.output_dir.join("doc3_Formations_du_Sud.docx").exists());

    let archive = report.archive.unwrap();
    assert!(archive.exists());
    assert_eq!(archive.extension().unwrap(), "zip");
}

#[tokio::test]
async fn sequential_run_mirrors_tree_and_copies_other_files() {
    let fx = fixture();
    std::fs::create_dir_all(fx.templates.join("Critere_1/Preuves")).unwrap();
    std::fs::write(fx.templates.join("Critere_1/Convention.docx"), docx("[nom_organisme]")).unwrap();
    std::fs::write(fx.templates.join("Budget.xlsx"), xlsx()).unwrap();
    std::fs::write(fx.templates.join("Critere_1/Preuves/Consigne.txt"), "Ajouter les preuves").unwrap();
    std::fs::write(fx.templates.join("Critere_1/~$Convention.docx"), b"lock").unwrap();

    let mut settings = settings(&fx.output_root, false);
    settings.archive = false;
    let report = run_batch(&BatchRequest::new(&fx.data, &fx.templates, 1).with_settings(settings))
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.copied_files, 1);
    assert!(report.archive.is_none());

    let out = &report.output_dir;
    assert!(out.starts_with(&fx.output_root));
    assert!(out.join("Critere_1/Preuves/Consigne.txt").exists());
    assert!(!out.join("Critere_1/~$Convention.docx").exists());

    let sst = read_part(&out.join("Budget_Formations_du_Sud.xlsx"), "xl/sharedStrings.xml");
    assert!(sst.contains("Arles (01300)"));
    let body = body_text(&out.join("Critere_1/Convention_Formations_du_Sud.docx"));
    assert!(body.starts_with("Formations du Sud le "));
}

#[tokio::test]
async fn fatal_errors_abort_before_jobs() {
    let fx = fixture();
    std::fs::write(fx.templates.join("a.docx"), docx("[ville]")).unwrap();

    let out_of_range = BatchRequest::new(&fx.data, &fx.templates, 9).with_settings(settings(&fx.output_root, true));
    assert!(matches!(run_batch(&out_of_range).await, Err(BatchError::DataSource(_))));

    let placeholder_row =
        BatchRequest::new(&fx.data, &fx.templates, 0).with_settings(settings(&fx.output_root, true));
    assert!(matches!(run_batch(&placeholder_row).await, Err(BatchError::DataSource(_))));

    let missing = BatchRequest::new(&fx.data, fx.templates.join("absent"), 1)
        .with_settings(settings(&fx.output_root, true));
    assert!(matches!(run_batch(&missing).await, Err(BatchError::TemplateDirNotFound(_))));

    assert!(!fx.output_root.exists());
}
