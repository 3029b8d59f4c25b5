//! Interpretation of a flattened document outline.
//!
//! The outline arrives as a pre-order list of leveled entries. [`inventory`]
//! groups it by level for display and level validation, [`resolve`] turns the
//! entries at one level into non-overlapping page spans, and [`blocklist`]
//! decides which front/back-matter sections to leave out.

pub mod blocklist;
pub mod inventory;
pub mod resolve;

pub use blocklist::Blocklist;
pub use inventory::{summarize, LevelInventory, LevelSummary};
pub use resolve::{resolve, Chapter, Resolution};

use serde::Serialize;

/// One outline entry, with its 1-based depth and 1-based start page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u32,
    pub title: String,
    pub start_page: u32,
}

impl TocEntry {
    pub fn new(level: u32, title: impl Into<String>, start_page: u32) -> Self {
        TocEntry {
            level,
            title: title.into(),
            start_page,
        }
    }
}
