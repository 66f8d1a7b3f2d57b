//! Field definitions: which keyword introduces which field

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A field and the keyword its value follows in the PDF text.
///
/// An empty keyword marks a field that cannot be located automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionField {
    pub keyword: String,
    pub field: String,
}

impl ExtractionField {
    pub fn new(keyword: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            field: field.into(),
        }
    }

    /// Whether the field has a keyword to search for
    pub fn is_defined(&self) -> bool {
        !self.keyword.is_empty()
    }
}

/// Fields of a training agreement ("convention de formation"), in report order
const CONVENTION_FIELDS: &[(&str, &str)] = &[
    ("L'organisme de formation", "Nom de l'organisme"),
    ("Représentée par", "Prénom et Nom du responsable de l'organisme"),
    ("Email", "Email de votre organisme de formation"),
    ("Tel : ", "Téléphone de contact"),
    ("Siège social au : ", "Ville de l'organisme"),
    ("", "Région"),
    ("Siège social au : ", "Adresse (N° + Nom de la rue + code postal + ville)"),
    ("Représentée par ", "Fonction du dirigeant de l'organisme"),
    ("Siret : ", "Numéro Siret"),
    ("", "Code APE"),
    ("", "Numéro NDA"),
    ("- TVA : ", "Numéro TVA"),
    ("- RCS", "Ville du RCS"),
    ("", "Site Internet"),
    ("- Intitulé de l’action :", "Nom de la formation"),
    ("", "Domaine de formation"),
    ("- Formateur :", "Nom du formateur principal"),
    ("", "Nom référent handicap"),
    ("Dates et horaires : ", "Horaires de la formation"),
    ("Durée de l’action de formation :", "Nombre d'heures de la formation"),
    ("Lieu : ", "Lieu de la formation"),
    ("Dates et horaires : ", "Date début de la formation"),
    ("", "Nombre de participants"),
    ("TOTAL GENERAL :", "Prix de la formation"),
    ("2)", "Entreprise cliente bénéficiaire"),
    ("", "Responsable du client"),
    ("", "Siret du client"),
    ("", "Nom stagiaire"),
    ("", "Prénom stagiaire"),
    ("", "Date de la signature du contrat/convention"),
    ("", "Date de la fin de la formation"),
];

/// The built-in field list
pub fn default_fields() -> Vec<ExtractionField> {
    CONVENTION_FIELDS
        .iter()
        .map(|(keyword, field)| ExtractionField::new(*keyword, *field))
        .collect()
}

/// Read a field list from a JSON array of `{"keyword", "field"}` objects
pub fn load_fields(path: impl AsRef<Path>) -> Result<Vec<ExtractionField>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fields_keep_duplicates_in_order() {
        let fields = default_fields();
        let siege: Vec<_> = fields
            .iter()
            .filter(|f| f.keyword == "Siège social au : ")
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(siege, vec!["Ville de l'organisme", "Adresse (N° + Nom de la rue + code postal + ville)"]);
        assert!(!fields[5].is_defined());
    }

    #[test]
    fn test_load_fields() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fields.json");
        std::fs::write(&path, r#"[{"keyword": "Siret : ", "field": "Numéro Siret"}]"#).unwrap();
        assert_eq!(load_fields(&path).unwrap(), vec![ExtractionField::new("Siret : ", "Numéro Siret")]);
    }
}
