//! Relationships (.rels) parts
//!
//! Package parts point at each other through relationship ids
//! (`r:embed="rId4"`). The part is kept as events so a retargeted entry is
//! the only byte that changes.

use crate::package::error::{PackageError, PackageResult};
use crate::package::xml::{get_attribute, with_attributes_set, XmlPart};
use quick_xml::events::Event;

/// Relationship types used by the adapters
pub mod relationship_types {
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
}

/// A single relationship in a .rels part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels part (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's folder
    pub target: String,
    /// True for `TargetMode="External"`
    pub external: bool,
}

/// A parsed .rels part
#[derive(Debug, Clone)]
pub struct Relationships {
    part: XmlPart,
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Parse a .rels part from its XML content
    pub fn parse(name: impl Into<String>, content: &str) -> PackageResult<Self> {
        let part = XmlPart::parse(name, content)?;
        let mut entries = Vec::new();

        for event in &part.events {
            let (Event::Empty(e) | Event::Start(e)) = event else {
                continue;
            };
            if e.name().as_ref() != b"Relationship" {
                continue;
            }
            let id = get_attribute(e, b"Id")
                .ok_or_else(|| PackageError::InvalidStructure("Relationship missing Id".into()))?;
            let rel_type = get_attribute(e, b"Type")
                .ok_or_else(|| PackageError::InvalidStructure("Relationship missing Type".into()))?;
            let target = get_attribute(e, b"Target")
                .ok_or_else(|| PackageError::InvalidStructure("Relationship missing Target".into()))?;
            let external = get_attribute(e, b"TargetMode").as_deref() == Some("External");
            entries.push(Relationship {
                id,
                rel_type,
                target,
                external,
            });
        }

        Ok(Self { part, entries })
    }

    /// Name of the .rels part
    pub fn name(&self) -> &str {
        &self.part.name
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Get all relationships of a given type, in part order
    pub fn get_all_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.entries.iter().filter(|r| r.rel_type == rel_type).collect()
    }

    /// Point an existing relationship at a new target
    pub fn retarget(&mut self, id: &str, target: &str) -> PackageResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PackageError::RelationshipError(format!("No relationship {} in {}", id, self.part.name)))?;
        entry.target = target.to_string();

        for event in self.part.events.iter_mut() {
            let replacement = match event {
                Event::Empty(e) if e.name().as_ref() == b"Relationship" && get_attribute(e, b"Id").as_deref() == Some(id) => {
                    Event::Empty(with_attributes_set(e, &[("Target", target)]))
                }
                Event::Start(e) if e.name().as_ref() == b"Relationship" && get_attribute(e, b"Id").as_deref() == Some(id) => {
                    Event::Start(with_attributes_set(e, &[("Target", target)]))
                }
                _ => continue,
            };
            *event = replacement;
            self.part.dirty = true;
            break;
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.part.dirty
    }

    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        self.part.to_bytes()
    }
}

/// Path of the .rels part describing `part` (`word/header1.xml` →
/// `word/_rels/header1.xml.rels`)
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the folder of its source part
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
