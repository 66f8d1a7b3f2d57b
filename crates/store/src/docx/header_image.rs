//! Header logo replacement
//!
//! Swaps the picture of the first image found in the document's header
//! for a logo file. The drawing element keeps its position and wrapping;
//! its relationship is pointed at a newly added media part and its extent
//! is set to the logo size.

use super::{DocxDocument, DOCUMENT_PART};
use crate::package::content_types::{image_content_type, ContentTypes, CONTENT_TYPES_PART};
use crate::package::relationships::{rels_path_for, resolve_target, Relationships};
use crate::package::xml::{get_attribute, with_attributes_set};
use crate::package::{PackageError, PackageResult};
use quick_xml::events::Event;
use std::path::Path;

/// English Metric Units per inch
pub const EMU_PER_INCH: i64 = 914_400;

/// Image bytes plus the size to display them at
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub bytes: Vec<u8>,
    /// Lowercase file extension without the dot
    pub extension: String,
    pub width_emu: i64,
    pub height_emu: i64,
}

impl LogoImage {
    /// Logo displayed at one inch square
    pub fn new(bytes: Vec<u8>, extension: impl Into<String>) -> PackageResult<Self> {
        let extension = extension.into().to_ascii_lowercase();
        if image_content_type(&extension).is_none() {
            return Err(PackageError::ImageError(format!("Unsupported image type: {}", extension)));
        }
        Ok(Self {
            bytes,
            extension,
            width_emu: EMU_PER_INCH,
            height_emu: EMU_PER_INCH,
        })
    }

    /// Read a logo file, taking the image type from its extension
    pub fn from_file(path: impl AsRef<Path>) -> PackageResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| PackageError::ImageError(format!("No extension on {}", path.display())))?;
        Self::new(std::fs::read(path)?, extension)
    }

    /// Set the display size in inches
    pub fn with_size_inches(mut self, width: f64, height: f64) -> Self {
        self.width_emu = (width * EMU_PER_INCH as f64).round() as i64;
        self.height_emu = (height * EMU_PER_INCH as f64).round() as i64;
        self
    }
}

impl DocxDocument {
    /// Replace the first header image with `logo`.
    ///
    /// The default header of the first section is searched first, then the
    /// remaining headers in part order. Returns false when no header holds
    /// an image.
    pub fn replace_first_header_image(&mut self, logo: &LogoImage) -> PackageResult<bool> {
        for part_index in self.header_search_order()? {
            let Some((blip_index, rel_id)) = find_first_blip(&self.parts[part_index].events) else {
                continue;
            };
            let part_name = self.parts[part_index].name.clone();

            let rels_name = rels_path_for(&part_name);
            let mut rels = Relationships::parse(rels_name.as_str(), &self.package.read_part_string(&rels_name)?)?;

            let media_name = self.unused_media_name(&logo.extension);
            let target = media_name.trim_start_matches("word/").to_string();
            rels.retarget(&rel_id, &target)?;
            self.package.set_part(rels_name, rels.to_bytes()?);
            self.package.set_part(media_name.clone(), logo.bytes.clone());

            let mut content_types = ContentTypes::parse(&self.package.read_part_string(CONTENT_TYPES_PART)?)?;
            if let Some(mime) = image_content_type(&logo.extension) {
                content_types.ensure_default(&logo.extension, mime);
            }
            if content_types.is_dirty() {
                self.package.set_part(CONTENT_TYPES_PART, content_types.to_bytes()?);
            }

            resize_drawing(&mut self.parts[part_index].events, blip_index, logo);
            self.parts[part_index].dirty = true;

            tracing::debug!("Replaced header image {} in {} with {}", rel_id, part_name, media_name);
            return Ok(true);
        }
        Ok(false)
    }

    /// Header part indices, default header of the first section first
    fn header_search_order(&self) -> PackageResult<Vec<usize>> {
        let mut order: Vec<usize> = self
            .parts
            .iter()
            .enumerate()
            .filter(|(_, p)| p.name.starts_with("word/header"))
            .map(|(i, _)| i)
            .collect();

        if let Some(default_header) = self.first_default_header()? {
            if let Some(pos) = order.iter().position(|&i| self.parts[i].name == default_header) {
                let index = order.remove(pos);
                order.insert(0, index);
            }
        }
        Ok(order)
    }

    fn first_default_header(&self) -> PackageResult<Option<String>> {
        let rel_id = self.parts[0].events.iter().find_map(|event| match event {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"w:headerReference" => {
                match get_attribute(e, b"w:type").as_deref() {
                    Some("default") | None => get_attribute(e, b"r:id"),
                    _ => None,
                }
            }
            _ => None,
        });
        let Some(rel_id) = rel_id else {
            return Ok(None);
        };

        let rels_name = rels_path_for(DOCUMENT_PART);
        if !self.package.has_part(&rels_name) {
            return Ok(None);
        }
        let rels = Relationships::parse(rels_name.as_str(), &self.package.read_part_string(&rels_name)?)?;
        Ok(rels
            .get(&rel_id)
            .map(|r| resolve_target(DOCUMENT_PART, &r.target)))
    }

    fn unused_media_name(&self, extension: &str) -> String {
        (1..)
            .map(|n| format!("word/media/logo{}.{}", n, extension))
            .find(|name| !self.package.has_part(name))
            .unwrap_or_else(|| format!("word/media/logo.{}", extension))
    }
}

/// Event index and relationship id of the first `a:blip` with an embed
fn find_first_blip(events: &[Event<'static>]) -> Option<(usize, String)> {
    events.iter().enumerate().find_map(|(i, event)| match event {
        Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"a:blip" => {
            get_attribute(e, b"r:embed").map(|id| (i, id))
        }
        _ => None,
    })
}

/// Set `wp:extent` before the blip and `a:ext` after it, staying inside
/// the enclosing `w:drawing`
fn resize_drawing(events: &mut [Event<'static>], blip_index: usize, logo: &LogoImage) {
    let cx = logo.width_emu.to_string();
    let cy = logo.height_emu.to_string();
    let size = [("cx", cx.as_str()), ("cy", cy.as_str())];

    let extent = (0..blip_index).rev().find_map(|i| match &events[i] {
        Event::Start(e) if e.name().as_ref() == b"w:drawing" => Some(None),
        Event::Empty(e) if e.name().as_ref() == b"wp:extent" => Some(Some((i, with_attributes_set(e, &size)))),
        _ => None,
    });
    let ext = (blip_index + 1..events.len()).find_map(|i| match &events[i] {
        Event::End(e) if e.name().as_ref() == b"w:drawing" => Some(None),
        Event::Empty(e) if e.name().as_ref() == b"a:ext" => Some(Some((i, with_attributes_set(e, &size)))),
        _ => None,
    });

    for (i, resized) in [extent, ext].into_iter().flatten().flatten() {
        events[i] = Event::Empty(resized);
    }
}
