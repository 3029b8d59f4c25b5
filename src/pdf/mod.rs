pub mod document;
pub mod merge;
pub mod toc;

#[cfg(test)]
pub(crate) mod testing;

pub use document::PdfDocument;
pub use merge::merge_documents;
