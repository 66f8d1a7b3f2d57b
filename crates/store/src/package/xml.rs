//! XML event helpers shared by the DOCX and XLSX adapters
//!
//! Parts are held as owned event lists. Events that are not edited are
//! written back as they were read, so untouched markup keeps its exact
//! bytes.

use crate::package::error::PackageResult;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// An XML part parsed into an owned event list
#[derive(Debug, Clone)]
pub struct XmlPart {
    /// Path of the part inside the package
    pub name: String,
    pub events: Vec<Event<'static>>,
    /// Set when an event was replaced
    pub dirty: bool,
}

impl XmlPart {
    /// Parse part content without trimming any whitespace
    pub fn parse(name: impl Into<String>, content: &str) -> PackageResult<Self> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);

        let mut events = Vec::new();
        loop {
            match reader.read_event()? {
                Event::Eof => break,
                event => events.push(event.into_owned()),
            }
        }
        Ok(Self {
            name: name.into(),
            events,
            dirty: false,
        })
    }

    /// Serialize the events back to bytes
    pub fn to_bytes(&self) -> PackageResult<Vec<u8>> {
        write_events(self.events.iter().cloned())
    }

    /// Index of the matching end event for the start event at `start`.
    /// An empty element is its own end.
    pub fn matching_end(&self, start: usize) -> Option<usize> {
        match self.events.get(start)? {
            Event::Empty(_) => Some(start),
            Event::Start(_) => {
                let mut depth = 0usize;
                for (offset, event) in self.events[start..].iter().enumerate() {
                    match event {
                        Event::Start(_) => depth += 1,
                        Event::End(_) => {
                            depth -= 1;
                            if depth == 0 {
                                return Some(start + offset);
                            }
                        }
                        _ => {}
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// Concatenated unescaped text between `start` and `end`
    pub fn text_between(&self, start: usize, end: usize) -> PackageResult<String> {
        let mut text = String::new();
        for event in self.events.iter().take(end).skip(start + 1) {
            match event {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
                _ => {}
            }
        }
        Ok(text)
    }
}

/// Serialize events to bytes
pub fn write_events<'a>(events: impl IntoIterator<Item = Event<'a>>) -> PackageResult<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    for event in events {
        writer.write_event(event)?;
    }
    Ok(writer.into_inner())
}

/// Events for `<name xml:space="preserve">text</name>`
pub fn preserved_text_element(name: &str, text: &str) -> [Event<'static>; 3] {
    let start = BytesStart::new(name.to_string()).with_attributes([("xml:space", "preserve")]);
    [
        Event::Start(start),
        Event::Text(BytesText::new(text).into_owned()),
        Event::End(quick_xml::events::BytesEnd::new(name.to_string())),
    ]
}

/// Attribute value of an element, unescaped
pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
    event
        .attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// Copy of `event` with the named attributes replaced or appended
pub fn with_attributes_set(event: &BytesStart, updates: &[(&str, &str)]) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(event.name().as_ref()).into_owned();
    let mut updated = BytesStart::new(name);
    let mut pending: Vec<&(&str, &str)> = updates.iter().collect();

    for attr in event.attributes().filter_map(|a| a.ok()) {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        if let Some(pos) = pending.iter().position(|(k, _)| *k == key) {
            let (k, v) = pending.remove(pos);
            updated.push_attribute((*k, *v));
        } else {
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            updated.push_attribute((key.as_str(), value.as_str()));
        }
    }
    for (k, v) in pending {
        updated.push_attribute((*k, *v));
    }
    updated
}

/// Qualified element name of a start or empty event
pub fn element_name<'a>(event: &'a Event<'_>) -> Option<&'a [u8]> {
    match event {
        Event::Start(e) | Event::Empty(e) => Some(e.name().into_inner()),
        _ => None,
    }
}
