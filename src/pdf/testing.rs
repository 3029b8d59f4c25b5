//! PDF fixtures built in memory for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Build a document with `num_pages` pages reading "Page N" and an outline
/// made of `(level, title, page)` items in reading order. A page of 0 leaves
/// the bookmark without a destination.
pub fn build_pdf(num_pages: u32, outline: &[(u32, &str, u32)]) -> Document {
    build_pdf_with_prefix(num_pages, "Page", outline)
}

pub fn build_pdf_with_prefix(
    num_pages: u32,
    text_prefix: &str,
    outline: &[(u32, &str, u32)],
) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut page_ids = Vec::new();
    for i in 1..=num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("{} {}", text_prefix, i).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => num_pages as i64,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !outline.is_empty() {
        let outlines_id = add_outline(&mut doc, &page_ids, outline);
        catalog.set("Outlines", outlines_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    doc
}

fn add_outline(doc: &mut Document, page_ids: &[ObjectId], outline: &[(u32, &str, u32)]) -> ObjectId {
    let root_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = outline.iter().map(|_| doc.new_object_id()).collect();

    // Parent of each item: the closest earlier item with a smaller level.
    let mut parents: Vec<Option<usize>> = Vec::with_capacity(outline.len());
    let mut stack: Vec<(u32, usize)> = Vec::new();
    for (i, (level, _, _)) in outline.iter().enumerate() {
        while stack.last().is_some_and(|(l, _)| *l >= *level) {
            stack.pop();
        }
        parents.push(stack.last().map(|(_, idx)| *idx));
        stack.push((*level, i));
    }

    let children_of = |parent: Option<usize>| -> Vec<usize> {
        (0..outline.len()).filter(|i| parents[*i] == parent).collect()
    };

    for (i, (_, title, page)) in outline.iter().enumerate() {
        let siblings = children_of(parents[i]);
        let pos = siblings.iter().position(|s| *s == i).unwrap();
        let children = children_of(Some(i));

        let mut item = dictionary! {
            "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            "Parent" => parents[i].map(|p| item_ids[p]).unwrap_or(root_id),
        };
        if *page > 0 {
            let page_ref = page_ids[(*page - 1) as usize];
            item.set(
                "Dest",
                Object::Array(vec![Object::Reference(page_ref), Object::Name(b"Fit".to_vec())]),
            );
        }
        if pos > 0 {
            item.set("Prev", item_ids[siblings[pos - 1]]);
        }
        if let Some(next) = siblings.get(pos + 1) {
            item.set("Next", item_ids[*next]);
        }
        if let (Some(first), Some(last)) = (children.first(), children.last()) {
            item.set("First", item_ids[*first]);
            item.set("Last", item_ids[*last]);
            item.set("Count", children.len() as i64);
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    let top = children_of(None);
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_ids[top[0]],
            "Last" => item_ids[top[top.len() - 1]],
            "Count" => top.len() as i64,
        }),
    );
    root_id
}

/// The raw content stream of page `page` (1-based), lossily decoded.
pub fn page_text(doc: &Document, page: u32) -> String {
    let page_id = doc.get_pages()[&page];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}
