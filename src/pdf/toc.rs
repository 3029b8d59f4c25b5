use crate::error::Result;
use crate::outline::TocEntry;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct OutlineItem {
    title: String,
    page: Option<u32>,
    level: u32,
    children: Vec<OutlineItem>,
}

/// Read the document outline as a flat, pre-order list of entries.
///
/// Top-level bookmarks are level 1. Bookmarks whose destination does not
/// resolve to a page of this document are left out.
pub fn extract_toc_from_doc(doc: &Document) -> Result<Vec<TocEntry>> {
    let catalog = doc.catalog()?;

    // Look for Outlines entry
    let outlines_ref = match catalog.get(b"Outlines") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let outlines = match doc.get_dictionary(outlines_ref) {
        Ok(d) => d,
        _ => return Ok(Vec::new()),
    };

    let page_map = build_page_map(doc);

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let mut visited = HashSet::new();
    let items = parse_outline_items(doc, first_ref, &page_map, 1, &mut visited);

    let mut entries = Vec::new();
    flatten(&items, &mut entries);
    debug!(entries = entries.len(), "read outline");
    Ok(entries)
}

fn parse_outline_items(
    doc: &Document,
    first_id: ObjectId,
    page_map: &[(ObjectId, u32)],
    level: u32,
    visited: &mut HashSet<ObjectId>,
) -> Vec<OutlineItem> {
    let mut items = Vec::new();
    let mut current_id = Some(first_id);

    while let Some(id) = current_id {
        // Malformed files can link outline items into a cycle.
        if !visited.insert(id) {
            warn!(object = ?id, "outline item visited twice, stopping");
            break;
        }

        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => "Untitled".to_string(),
        };

        let page = get_destination_page(doc, dict, page_map);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child_ref)) => {
                parse_outline_items(doc, *child_ref, page_map, level + 1, visited)
            }
            _ => Vec::new(),
        };

        items.push(OutlineItem {
            title,
            page,
            level,
            children,
        });

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    items
}

fn flatten(items: &[OutlineItem], result: &mut Vec<TocEntry>) {
    for item in items {
        match item.page {
            Some(page) => result.push(TocEntry {
                level: item.level,
                title: item.title.clone(),
                start_page: page,
            }),
            None => warn!(
                title = %item.title,
                level = item.level,
                "bookmark has no resolvable destination, ignoring it"
            ),
        }
        flatten(&item.children, result);
    }
}

fn get_destination_page(
    doc: &Document,
    dict: &lopdf::Dictionary,
    page_map: &[(ObjectId, u32)],
) -> Option<u32> {
    if let Ok(dest) = dict.get(b"Dest") {
        return resolve_destination(doc, dest, page_map, 0);
    }

    // GoTo action, either indirect or inline
    let action = match dict.get(b"A") {
        Ok(Object::Reference(action_ref)) => doc.get_dictionary(*action_ref).ok(),
        Ok(Object::Dictionary(action_dict)) => Some(action_dict),
        _ => None,
    }?;

    match action.get(b"S") {
        Ok(Object::Name(action_type)) if action_type == b"GoTo" => {
            let dest = action.get(b"D").ok()?;
            resolve_destination(doc, dest, page_map, 0)
        }
        _ => None,
    }
}

/// Named destinations may point at other named destinations; give up after a
/// few hops rather than following a loop.
const MAX_DESTINATION_DEPTH: u32 = 8;

fn resolve_destination(
    doc: &Document,
    dest: &Object,
    page_map: &[(ObjectId, u32)],
    depth: u32,
) -> Option<u32> {
    if depth > MAX_DESTINATION_DEPTH {
        return None;
    }

    match dest {
        Object::String(name, _) | Object::Name(name) => {
            resolve_named_destination(doc, name, page_map, depth + 1)
        }
        Object::Array(arr) => get_page_from_dest_array(arr, page_map),
        Object::Reference(r) => {
            let obj = doc.get_object(*r).ok()?;
            resolve_destination(doc, obj, page_map, depth + 1)
        }
        // Dictionaries in the Dests tree wrap the array under /D
        Object::Dictionary(d) => {
            let inner = d.get(b"D").ok()?;
            resolve_destination(doc, inner, page_map, depth + 1)
        }
        _ => None,
    }
}

fn resolve_named_destination(
    doc: &Document,
    name: &[u8],
    page_map: &[(ObjectId, u32)],
    depth: u32,
) -> Option<u32> {
    let catalog = doc.catalog().ok()?;

    // Names/Dests name tree
    if let Ok(Object::Reference(names_ref)) = catalog.get(b"Names") {
        if let Ok(names_dict) = doc.get_dictionary(*names_ref) {
            if let Ok(Object::Reference(dests_ref)) = names_dict.get(b"Dests") {
                let mut seen = HashSet::new();
                if let Some(dest) = search_name_tree(doc, *dests_ref, name, &mut seen) {
                    return resolve_destination(doc, dest, page_map, depth);
                }
            }
        }
    }

    // Older style Dests dictionary
    if let Ok(Object::Reference(dests_ref)) = catalog.get(b"Dests") {
        if let Ok(dests_dict) = doc.get_dictionary(*dests_ref) {
            if let Ok(dest) = dests_dict.get(name) {
                return resolve_destination(doc, dest, page_map, depth);
            }
        }
    }

    None
}

fn search_name_tree<'a>(
    doc: &'a Document,
    node_id: ObjectId,
    name: &[u8],
    seen: &mut HashSet<ObjectId>,
) -> Option<&'a Object> {
    if !seen.insert(node_id) {
        return None;
    }
    let dict = doc.get_dictionary(node_id).ok()?;

    if let Ok(Object::Array(names)) = dict.get(b"Names") {
        for chunk in names.chunks(2) {
            if let [Object::String(key, _), value] = chunk {
                if key == name {
                    return Some(value);
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid {
                if let Some(dest) = search_name_tree(doc, *kid_ref, name, seen) {
                    return Some(dest);
                }
            }
        }
    }

    None
}

fn get_page_from_dest_array(arr: &[Object], page_map: &[(ObjectId, u32)]) -> Option<u32> {
    // [page_ref /XYZ left top zoom] and friends; remote-style integer page
    // indices are 0-based.
    match arr.first() {
        Some(Object::Reference(page_ref)) => page_map
            .iter()
            .find(|(id, _)| id == page_ref)
            .map(|(_, num)| *num),
        Some(Object::Integer(index)) => {
            let page = u32::try_from(*index).ok()? + 1;
            page_map.iter().any(|(_, num)| *num == page).then_some(page)
        }
        _ => None,
    }
}

fn build_page_map(doc: &Document) -> Vec<(ObjectId, u32)> {
    let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
    pages.sort_by_key(|(num, _)| *num);
    pages.into_iter().map(|(num, id)| (id, num)).collect()
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let u16_chars: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&u16_chars)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        // PDFDocEncoding / Latin-1 (simplified)
        bytes.iter().map(|&b| b as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::build_pdf;
    use lopdf::{dictionary, StringFormat};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flattens_nested_outline_in_reading_order() {
        let doc = build_pdf(
            12,
            &[
                (1, "Part I", 1),
                (2, "Chapter 1", 2),
                (3, "Section 1.1", 3),
                (2, "Chapter 2", 6),
                (1, "Part II", 9),
            ],
        );
        let entries = extract_toc_from_doc(&doc).unwrap();
        assert_eq!(
            entries,
            vec![
                TocEntry::new(1, "Part I", 1),
                TocEntry::new(2, "Chapter 1", 2),
                TocEntry::new(3, "Section 1.1", 3),
                TocEntry::new(2, "Chapter 2", 6),
                TocEntry::new(1, "Part II", 9),
            ]
        );
    }

    #[test]
    fn test_document_without_outline() {
        let doc = build_pdf(3, &[]);
        assert!(extract_toc_from_doc(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_bookmark_without_destination_is_skipped() {
        // Page 0 in the fixture means "no destination".
        let doc = build_pdf(5, &[(1, "Part I", 0), (2, "Chapter 1", 1), (2, "Chapter 2", 3)]);
        let entries = extract_toc_from_doc(&doc).unwrap();
        assert_eq!(
            entries,
            vec![
                TocEntry::new(2, "Chapter 1", 1),
                TocEntry::new(2, "Chapter 2", 3),
            ]
        );
    }

    #[test]
    fn test_goto_action_and_named_destination() {
        let mut doc = build_pdf(4, &[(1, "Intro", 1)]);
        let pages = doc.get_pages();
        let page3 = pages[&3];

        let dests_id = doc.add_object(dictionary! {
            "Names" => vec![
                Object::String(b"chap2".to_vec(), StringFormat::Literal),
                Object::Array(vec![page3.into(), "Fit".into()]),
            ],
        });
        let names_id = doc.add_object(dictionary! { "Dests" => dests_id });
        doc.catalog_mut().unwrap().set("Names", names_id);

        // Point the single bookmark at the named destination through a GoTo action.
        let outlines_id = doc.catalog().unwrap().get(b"Outlines").unwrap().as_reference().unwrap();
        let first_id = doc
            .get_dictionary(outlines_id)
            .unwrap()
            .get(b"First")
            .unwrap()
            .as_reference()
            .unwrap();
        let item = doc.get_dictionary_mut(first_id).unwrap();
        item.remove(b"Dest");
        item.set(
            "A",
            dictionary! {
                "S" => "GoTo",
                "D" => Object::String(b"chap2".to_vec(), StringFormat::Literal),
            },
        );

        let entries = extract_toc_from_doc(&doc).unwrap();
        assert_eq!(entries, vec![TocEntry::new(1, "Intro", 3)]);
    }

    #[test]
    fn test_decode_utf16_title() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Café".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_pdf_string(&bytes), "Café");
    }

    #[test]
    fn test_decode_latin1_title() {
        assert_eq!(decode_pdf_string(b"Caf\xe9"), "Café");
    }
}
