use crate::error::Result;
use lopdf::{Document, Object, ObjectId};
use std::collections::HashMap;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copies objects from one document into another, renumbering as it goes.
struct ObjectCopier<'a> {
    source: &'a Document,
    target: &'a mut Document,
    id_map: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            id_map: HashMap::new(),
        }
    }

    /// Deep-copy `source_id` and everything it references.
    fn copy_object(&mut self, source_id: ObjectId) -> Result<ObjectId> {
        if let Some(target_id) = self.id_map.get(&source_id) {
            return Ok(*target_id);
        }

        // Reserve the id before recursing so reference cycles terminate.
        let new_id = self.target.add_object(Object::Null);
        self.id_map.insert(source_id, new_id);

        let obj = self.source.get_object(source_id)?.clone();
        let new_obj = self.remap_references(obj)?;
        self.target.objects.insert(new_id, new_obj);

        Ok(new_id)
    }

    fn remap_references(&mut self, obj: Object) -> Result<Object> {
        match obj {
            Object::Reference(id) => Ok(Object::Reference(self.copy_object(id)?)),
            Object::Array(arr) => Ok(Object::Array(
                arr.into_iter()
                    .map(|o| self.remap_references(o))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Object::Dictionary(mut dict) => {
                for (_, value) in dict.iter_mut() {
                    *value = self.remap_references(std::mem::replace(value, Object::Null))?;
                }
                Ok(Object::Dictionary(dict))
            }
            Object::Stream(mut stream) => {
                for (_, value) in stream.dict.iter_mut() {
                    *value = self.remap_references(std::mem::replace(value, Object::Null))?;
                }
                Ok(Object::Stream(stream))
            }
            other => Ok(other),
        }
    }

    /// Map every source page to a fresh target id up front, so references
    /// between pages (annotation /P, link destinations) land on the copies
    /// instead of pulling in the source page tree.
    fn reserve_pages(&mut self, page_ids: &[ObjectId]) -> Vec<ObjectId> {
        page_ids
            .iter()
            .map(|page_id| {
                let new_id = self.target.add_object(Object::Null);
                self.id_map.insert(*page_id, new_id);
                new_id
            })
            .collect()
    }

    /// Copy one page dictionary into its reserved slot without its /Parent
    /// link, folding in the attributes it would otherwise inherit from the
    /// source page tree.
    fn copy_page(&mut self, page_id: ObjectId, new_id: ObjectId) -> Result<()> {
        let mut page = self.source.get_dictionary(page_id)?.clone();

        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(self.source, &page, key) {
                page.set(key.to_vec(), value);
            }
        }
        page.remove(b"Parent");

        let page = self.remap_references(Object::Dictionary(page))?;
        self.target.objects.insert(new_id, page);
        Ok(())
    }
}

fn inherited_attribute(doc: &Document, page: &lopdf::Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // Page trees are shallow; the bound only guards against parent cycles.
    for _ in 0..64 {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// Append every page of `source` to the end of `target`.
///
/// Returns the number of pages appended. Outlines and other catalog-level
/// structures of `source` are not carried over.
pub fn merge_documents(target: &mut Document, source: &Document) -> Result<u32> {
    let mut source_pages: Vec<_> = source.get_pages().into_iter().collect();
    if source_pages.is_empty() {
        return Ok(0);
    }
    source_pages.sort_by_key(|(num, _)| *num);
    let source_ids: Vec<ObjectId> = source_pages.into_iter().map(|(_, id)| id).collect();

    let mut copier = ObjectCopier::new(source, target);
    let copied = copier.reserve_pages(&source_ids);
    for (page_id, new_id) in source_ids.iter().zip(&copied) {
        copier.copy_page(*page_id, *new_id)?;
    }

    let pages_id = target.catalog()?.get(b"Pages")?.as_reference()?;
    for page_id in &copied {
        if let Ok(page) = target.get_dictionary_mut(*page_id) {
            page.set("Parent", pages_id);
        }
    }

    let pages_dict = target.get_dictionary_mut(pages_id)?;
    let mut kids = pages_dict.get(b"Kids")?.as_array()?.clone();
    let count = pages_dict.get(b"Count")?.as_i64()?;
    kids.extend(copied.iter().map(|id| Object::Reference(*id)));
    pages_dict.set("Kids", kids);
    pages_dict.set("Count", count + copied.len() as i64);

    Ok(copied.len() as u32)
}
