//! String items of SpreadsheetML parts
//!
//! Shared string items (`<si>`) and inline strings (`<is>`) share one
//! layout: plain text in a single `<t>`, or rich text as `<r>` runs each
//! holding a `<t>`. Phonetic runs (`<rPh>`) are not part of the value.

use crate::package::xml::{get_attribute, preserved_text_element, write_events, XmlPart};
use crate::package::{PackageError, PackageResult};
use doc_model::{Cell, FormatHandle};
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;

pub(crate) const ITEM_SHARED: &[u8] = b"si";
pub(crate) const ITEM_INLINE: &[u8] = b"is";

const T: &[u8] = b"t";
const R_PH: &[u8] = b"rPh";
const CELL: &[u8] = b"c";

/// Location of one string item
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StringSlot {
    pub part: usize,
    /// (start, end) event indices of each `<t>` of the item
    pub texts: Vec<(usize, usize)>,
    pub original: String,
}

/// Read every `item` element of a part as a text cell
pub(crate) fn read_string_items(
    part_index: usize,
    part: &XmlPart,
    item: &[u8],
    slots: &mut Vec<StringSlot>,
) -> PackageResult<Vec<Cell>> {
    let mut cells = Vec::new();
    let mut reference: Option<String> = None;
    let mut current: Option<(Vec<(usize, usize)>, String)> = None;
    let mut in_phonetic = false;
    let mut i = 0;

    while i < part.events.len() {
        match &part.events[i] {
            Event::Start(e) => match e.name().as_ref() {
                CELL => reference = get_attribute(e, b"r"),
                R_PH => in_phonetic = true,
                name if name == item => current = Some((Vec::new(), String::new())),
                T if !in_phonetic => {
                    if let Some((texts, value)) = current.as_mut() {
                        let end = part
                            .matching_end(i)
                            .ok_or_else(|| PackageError::XmlParse(format!("Unclosed t in {}", part.name)))?;
                        value.push_str(&part.text_between(i, end)?);
                        texts.push((i, end));
                        i = end + 1;
                        continue;
                    }
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == T && !in_phonetic => {
                if let Some((texts, _)) = current.as_mut() {
                    texts.push((i, i));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                CELL => reference = None,
                R_PH => in_phonetic = false,
                name if name == item => {
                    if let Some((texts, value)) = current.take() {
                        if texts.is_empty() {
                            i += 1;
                            continue;
                        }
                        let mut cell = Cell::new(value.clone()).with_handle(FormatHandle::from(slots.len()));
                        if let Some(r) = reference.as_ref().filter(|_| item == ITEM_INLINE) {
                            cell = cell.with_reference(r.clone());
                        }
                        cells.push(cell);
                        slots.push(StringSlot {
                            part: part_index,
                            texts,
                            original: value,
                        });
                    }
                }
                _ => {}
            },
            _ => {}
        }
        i += 1;
    }

    Ok(cells)
}

/// Serialize a part with the edited items rewritten.
///
/// `edits` maps slot indices to new text. The first `<t>` of an item
/// receives the text; the others are emptied.
pub(crate) fn render_part(part: &XmlPart, slots: &[StringSlot], edits: &BTreeMap<usize, String>) -> PackageResult<Vec<u8>> {
    let mut replacements: BTreeMap<usize, (usize, Option<&str>)> = BTreeMap::new();
    for (slot_index, text) in edits {
        let Some(slot) = slots.get(*slot_index) else {
            continue;
        };
        for (n, (start, end)) in slot.texts.iter().enumerate() {
            let content = (n == 0).then_some(text.as_str());
            replacements.insert(*start, (*end, content));
        }
    }

    let mut events: Vec<Event<'_>> = Vec::with_capacity(part.events.len());
    let mut i = 0;
    while i < part.events.len() {
        match replacements.get(&i) {
            Some((end, Some(text))) => {
                events.extend(preserved_text_element("t", text));
                i = end + 1;
            }
            Some((end, None)) => {
                events.push(Event::Empty(BytesStart::new("t")));
                i = end + 1;
            }
            None => {
                events.push(part.events[i].clone());
                i += 1;
            }
        }
    }
    write_events(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_items_are_skipped() {
        let xml = r#"<sst><si><t/></si><si></si><si><t>x</t></si></sst>"#;
        let part = XmlPart::parse("xl/sharedStrings.xml", xml).unwrap();
        let mut slots = Vec::new();
        let cells = read_string_items(0, &part, ITEM_SHARED, &mut slots).unwrap();

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].value, doc_model::CellValue::from(""));
        assert_eq!(cells[1].handle(), FormatHandle::new(1));
        assert!(cells[1].reference.is_none());
    }

    #[test]
    fn test_inline_strings_carry_reference() {
        let xml = r#"<worksheet><sheetData><row><c r="D4" t="inlineStr"><is><r><t>a</t></r><r><t>b</t></r></is></c><c r="E4" t="str"><f>A1</f><v>[x]</v></c></row></sheetData></worksheet>"#;
        let part = XmlPart::parse("xl/worksheets/sheet1.xml", xml).unwrap();
        let mut slots = Vec::new();
        let cells = read_string_items(3, &part, ITEM_INLINE, &mut slots).unwrap();

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].reference.as_deref(), Some("D4"));
        assert_eq!(slots[0].texts.len(), 2);
        assert_eq!(slots[0].part, 3);
        assert_eq!(slots[0].original, "ab");
    }
}
