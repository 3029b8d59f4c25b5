use crate::error::{FolioError, Result};
use crate::outline::TocEntry;
use crate::page_range::PageSpan;
use lopdf::{Document, ObjectId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Catalog entries that can point at pages, dropped from range copies.
const PAGE_LINKED_CATALOG_KEYS: [&[u8]; 4] = [b"Outlines", b"Names", b"Dests", b"OpenAction"];

pub struct PdfDocument {
    pub doc: Document,
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FolioError::InputNotFound(path.to_path_buf()));
        }

        let doc = Document::load(path)?;
        debug!(path = %path.display(), pages = doc.get_pages().len(), "opened PDF");
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// The outline flattened in reading order; empty when the document has none.
    pub fn outline(&self) -> Result<Vec<TocEntry>> {
        super::toc::extract_toc_from_doc(&self.doc)
    }

    /// Copy the pages of `span` into a new document.
    ///
    /// The copy keeps the source's objects for those pages and drops the
    /// outline, named destinations and open action, which could otherwise
    /// point at (and keep alive) deleted pages.
    pub fn extract_range(&self, span: PageSpan) -> Result<Document> {
        let span = span.validate(self.page_count())?;
        let mut new_doc = self.doc.clone();

        let pages_to_delete: Vec<u32> = self
            .page_ids()
            .iter()
            .map(|(num, _)| *num)
            .filter(|num| *num < span.start || *num > span.end)
            .collect();

        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        if let Ok(catalog) = new_doc.catalog_mut() {
            for key in PAGE_LINKED_CATALOG_KEYS {
                catalog.remove(key);
            }
        }
        new_doc.prune_objects();

        Ok(new_doc)
    }

    /// Save to a file. The file only appears once it is completely written.
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        write_atomically(path.as_ref(), |file| {
            let mut writer = BufWriter::new(file);
            doc.save_to(&mut writer)?;
            writer.flush()?;
            Ok(())
        })
    }
}

/// Write into a temporary file next to `path`, then move it into place. On
/// error the temporary file is removed and `path` is left untouched.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
