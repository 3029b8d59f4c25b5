use super::{Blocklist, TocEntry};
use crate::error::{FolioError, Result};
use crate::page_range::PageSpan;
use serde::Serialize;
use tracing::{debug, info};

/// A section of the document resolved to an inclusive page span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
}

impl Chapter {
    pub fn span(&self) -> PageSpan {
        PageSpan::new(self.start_page, self.end_page)
    }

    pub fn page_count(&self) -> u32 {
        self.span().page_count()
    }
}

/// Outcome of resolving one outline level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Chapters in outline order. A chapter's ordinal is its index plus one.
    pub chapters: Vec<Chapter>,
    /// Titles at the target level that the blocklist left out.
    pub excluded: Vec<String>,
}

/// Resolve every entry at `target_level` into a chapter.
///
/// Each chapter runs from its entry's page up to the page before the next
/// entry at the same or a shallower level, so deeper entries are folded into
/// it. The last such section runs to `total_pages`. Sections that share a
/// start page with their successor collapse to a single page.
pub fn resolve(
    entries: &[TocEntry],
    target_level: u32,
    total_pages: u32,
    blocklist: &Blocklist,
) -> Result<Resolution> {
    if entries.is_empty() {
        return Err(FolioError::NoOutline);
    }

    if !entries.iter().any(|e| e.level == target_level) {
        let available = super::summarize(entries).levels_present().into_iter().collect();
        return Err(FolioError::LevelNotPresent {
            level: target_level,
            available,
        });
    }

    let mut resolution = Resolution::default();

    for (i, entry) in entries.iter().enumerate() {
        if entry.level != target_level {
            continue;
        }

        if blocklist.is_blocked(&entry.title) {
            info!(title = %entry.title, "skipping ignored section");
            resolution.excluded.push(entry.title.clone());
            continue;
        }

        check_page(entry, total_pages)?;

        let end_page = match section_end(entries, i, target_level) {
            Some(boundary) => {
                check_page(boundary, total_pages)?;
                boundary.start_page - 1
            }
            None => total_pages,
        };

        let chapter = Chapter {
            title: entry.title.clone(),
            start_page: entry.start_page,
            end_page: end_page.max(entry.start_page),
        };
        debug!(
            title = %chapter.title,
            start = chapter.start_page,
            end = chapter.end_page,
            "resolved chapter"
        );
        resolution.chapters.push(chapter);
    }

    Ok(resolution)
}

/// The entry that closes the section opened at `index`: the first later entry
/// at `level` or shallower. `None` when the section runs to the end of the
/// document.
pub fn section_end(entries: &[TocEntry], index: usize, level: u32) -> Option<&TocEntry> {
    entries
        .get(index + 1..)?
        .iter()
        .find(|next| next.level <= level)
}

fn check_page(entry: &TocEntry, total_pages: u32) -> Result<()> {
    if entry.start_page == 0 || entry.start_page > total_pages {
        return Err(FolioError::PageOutOfBounds {
            title: entry.title.clone(),
            page: entry.start_page,
            total: total_pages,
        });
    }
    Ok(())
}
