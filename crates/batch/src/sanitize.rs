//! ASCII file and folder names
//!
//! Accented letters are transliterated, every other non-alphanumeric
//! character becomes `_`, and runs of `_` collapse to one.

use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sanitize a folder name or any name without extension
pub fn sanitize_folder_name(name: &str) -> String {
    let ascii = deunicode::deunicode(name);
    let mut out = String::with_capacity(ascii.len());
    for c in ascii.chars() {
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Sanitize a file name, keeping the text after the last `.` as extension
pub fn sanitize_file_name(name: &str) -> String {
    let ascii = deunicode::deunicode(name);
    match ascii.rsplit_once('.') {
        Some((stem, extension)) => format!("{}.{}", sanitize_folder_name(stem), extension),
        None => sanitize_folder_name(&ascii),
    }
}

/// Rename every file and folder below `root` to its sanitized name.
///
/// Children are renamed before their parent so collected paths stay
/// valid. `root` itself keeps its name. Returns the renames performed.
pub fn sanitize_tree(root: impl AsRef<Path>) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut renamed = Vec::new();

    for entry in WalkDir::new(root.as_ref()).min_depth(1).contents_first(true) {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping non UTF-8 name: {}", entry.path().display());
            continue;
        };
        let new_name = if entry.file_type().is_dir() {
            sanitize_folder_name(name)
        } else {
            sanitize_file_name(name)
        };
        if new_name == name {
            continue;
        }

        let from = entry.path().to_path_buf();
        let to = from.with_file_name(&new_name);
        if to.exists() {
            tracing::warn!("Not renaming {}: {} already exists", from.display(), to.display());
            continue;
        }
        std::fs::rename(&from, &to)?;
        tracing::debug!("Renamed {} -> {}", from.display(), new_name);
        renamed.push((from, to));
    }

    Ok(renamed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Convention de formation.docx"), "Convention_de_formation.docx");
        assert_eq!(sanitize_file_name("Évaluation à chaud (v2).xlsx"), "Evaluation_a_chaud_v2_.xlsx");
        assert_eq!(sanitize_file_name("archive.tar.gz"), "archive_tar.gz");
        assert_eq!(sanitize_file_name("LISEZMOI"), "LISEZMOI");
    }

    #[test]
    fn test_sanitize_folder_name() {
        assert_eq!(sanitize_folder_name("Indicateur 1 - Procédures"), "Indicateur_1_Procedures");
        assert_eq!(sanitize_folder_name("v1.2"), "v1_2");
        assert_eq!(sanitize_folder_name("Nom de l'organisme"), "Nom_de_l_organisme");
    }

    #[test]
    fn test_sanitize_tree_renames_children_first() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Critère 1").join("Sous dossier");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("Fiche réponse.docx"), b"x").unwrap();

        let renamed = sanitize_tree(dir.path()).unwrap();
        assert_eq!(renamed.len(), 3);
        assert!(dir
            .path()
            .join("Critere_1")
            .join("Sous_dossier")
            .join("Fiche_reponse.docx")
            .exists());
    }
}
