//! [Content_Types].xml handling

use crate::package::error::PackageResult;
use crate::package::xml::{get_attribute, XmlPart};
use quick_xml::events::{BytesStart, Event};

/// Path of the content types part
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Content types of a package, kept as events for in-place edits
#[derive(Debug, Clone)]
pub struct ContentTypes {
    part: XmlPart,
}

impl ContentTypes {
    pub fn parse(content: &str) -> PackageResult<Self> {
        Ok(Self {
            part: XmlPart::parse(CONTENT_TYPES_PART, content)?,
        })
    }

    /// Default content type registered for a file extension
    pub fn default_for(&self, extension: &str) -> Option<String> {
        self.part.events.iter().find_map(|event| match event {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Default" => {
                let ext = get_attribute(e, b"Extension")?;
                if ext.eq_ignore_ascii_case(extension) {
                    get_attribute(e, b"ContentType")
                } else {
                    None
                }
            }
            _ => None,
        })
    }

    /// Register a default for `extension` unless one exists
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) {
        if self.default_for(extension).is_some() {
            return;
        }
        let default = BytesStart::new("Default")
            .with_attributes([("Extension", extension), ("ContentType", content_type)]);
        let insert_at = self
            .part
            .events
            .iter()
            .rposition(|e| matches!(e, Event::End(end) if end.name().as_ref() == b"Types"))
            .unwrap_or(self.part.events.len());
        self.part.events.insert(insert_at, Event::Empty(default.into_owned()));
        self.part.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.part.dirty
    }

    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        self.part.to_bytes()
    }
}

/// MIME type of an image extension accepted as a logo
pub fn image_content_type(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "emf" => Some("image/x-emf"),
        "wmf" => Some("image/x-wmf"),
        _ => None,
    }
}
