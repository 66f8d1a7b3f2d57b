//! WordprocessingML text parts ↔ block model
//!
//! Every `<w:t>` element becomes one [`Run`] whose [`FormatHandle`] is the
//! index of a [`TextSlot`] remembering where the element sits in its part.
//! The run properties (`<w:rPr>`) never leave the XML, so nothing the
//! fill engine does can touch formatting.

use crate::package::xml::{preserved_text_element, write_events, XmlPart};
use crate::package::{PackageError, PackageResult};
use doc_model::{Block, BlockBuilder, FormatHandle, Run};
use quick_xml::events::Event;
use std::collections::BTreeMap;

const W_P: &[u8] = b"w:p";
const W_T: &[u8] = b"w:t";
const W_TBL: &[u8] = b"w:tbl";
const W_TR: &[u8] = b"w:tr";
const W_TC: &[u8] = b"w:tc";

/// Location of one `<w:t>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextSlot {
    /// Index of the part in the document's part list
    pub part: usize,
    /// Event index of the start (or empty) `w:t` element
    pub start: usize,
    /// Event index of the matching end; equals `start` for `<w:t/>`
    pub end: usize,
    /// Text as read
    pub original: String,
}

/// Build the blocks of one part, registering a slot per text element
pub(crate) fn read_blocks(part_index: usize, part: &XmlPart, slots: &mut Vec<TextSlot>) -> PackageResult<Vec<Block>> {
    let mut builder = BlockBuilder::new();
    let mut i = 0;

    while i < part.events.len() {
        match &part.events[i] {
            Event::Start(e) => match e.name().as_ref() {
                W_P => builder.start_paragraph(),
                W_TBL => builder.start_table(),
                W_TR => builder.start_row(),
                W_TC => builder.start_cell(),
                W_T => {
                    let end = part.matching_end(i).ok_or_else(|| {
                        PackageError::XmlParse(format!("Unclosed w:t in {}", part.name))
                    })?;
                    let text = part.text_between(i, end)?;
                    push_slot(&mut builder, slots, part_index, i, end, text, &part.name);
                    i = end + 1;
                    continue;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                W_P => {
                    builder.start_paragraph();
                    builder.end_paragraph()?;
                }
                W_T => push_slot(&mut builder, slots, part_index, i, i, String::new(), &part.name),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                W_P => builder.end_paragraph()?,
                W_TBL => builder.end_table()?,
                W_TR => builder.end_row()?,
                W_TC => builder.end_cell()?,
                _ => {}
            },
            _ => {}
        }
        i += 1;
    }

    Ok(builder.finish()?)
}

fn push_slot(
    builder: &mut BlockBuilder,
    slots: &mut Vec<TextSlot>,
    part: usize,
    start: usize,
    end: usize,
    text: String,
    part_name: &str,
) {
    let run = Run::with_format(text.clone(), FormatHandle::from(slots.len()));
    match builder.push_run(run) {
        Ok(()) => slots.push(TextSlot {
            part,
            start,
            end,
            original: text,
        }),
        Err(e) => tracing::debug!("Skipping text in {}: {}", part_name, e),
    }
}

/// Serialize a part with the given text elements rewritten.
///
/// `edits` maps a slot's start index to (end index, new text). The part's
/// own events are not modified, so slot indices stay valid.
pub(crate) fn render_part(part: &XmlPart, edits: &BTreeMap<usize, (usize, String)>) -> PackageResult<Vec<u8>> {
    if edits.is_empty() {
        return part.to_bytes();
    }

    let mut events: Vec<Event<'_>> = Vec::with_capacity(part.events.len());
    let mut i = 0;
    while i < part.events.len() {
        if let Some((end, text)) = edits.get(&i) {
            events.extend(preserved_text_element("w:t", text));
            i = end + 1;
            continue;
        }
        events.push(part.events[i].clone());
        i += 1;
    }
    write_events(events)
}
