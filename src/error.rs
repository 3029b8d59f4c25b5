//! Error types shared by the outline analysis and the PDF collaborator.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FolioError {
    /// The input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The document carries no outline (or an empty one).
    #[error("No table of contents found")]
    NoOutline,

    /// The requested level has no entries in the outline.
    #[error("Level {level} not found in table of contents (available: {})", format_levels(.available))]
    LevelNotPresent { level: u32, available: Vec<u32> },

    /// A user-supplied page range is inverted or outside the document.
    #[error("Invalid page range {start}-{end}: {reason}")]
    InvalidRange { start: u32, end: u32, reason: String },

    /// An outline entry points outside the document.
    #[error("Outline entry '{title}' points to page {page}, outside 1-{total}")]
    PageOutOfBounds { title: String, page: u32, total: u32 },

    #[error("{0}")]
    InvalidArguments(String),

    /// lopdf failed to parse, manipulate or write a document.
    #[error("PDF error")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

fn format_levels(levels: &[u32]) -> String {
    if levels.is_empty() {
        return "none".to_string();
    }
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_not_present_lists_available_levels() {
        let err = FolioError::LevelNotPresent {
            level: 4,
            available: vec![1, 2, 3],
        };
        assert_eq!(
            err.to_string(),
            "Level 4 not found in table of contents (available: 1, 2, 3)"
        );
    }

    #[test]
    fn test_level_not_present_without_levels() {
        let err = FolioError::LevelNotPresent {
            level: 1,
            available: vec![],
        };
        assert!(err.to_string().ends_with("(available: none)"));
    }

    #[test]
    fn test_page_out_of_bounds_display() {
        let err = FolioError::PageOutOfBounds {
            title: "Appendix".to_string(),
            page: 40,
            total: 32,
        };
        assert_eq!(
            err.to_string(),
            "Outline entry 'Appendix' points to page 40, outside 1-32"
        );
    }

    #[test]
    fn test_io_cause_is_reported_once() {
        let err = anyhow::Error::from(FolioError::Io(std::io::Error::other("File too large")));
        assert_eq!(format!("{:#}", err), "IO error: File too large");
    }
}
