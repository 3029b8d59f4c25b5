use crate::error::{FolioError, Result};
use std::fmt;

/// An inclusive, 1-based range of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageSpan {
    pub fn new(start: u32, end: u32) -> Self {
        PageSpan { start, end }
    }

    /// Check the span against a document of `total_pages` pages.
    ///
    /// Both ends must lie in `1..=total_pages` and the span must not be inverted.
    pub fn validate(self, total_pages: u32) -> Result<Self> {
        if self.start == 0 || self.end == 0 {
            return Err(self.invalid("page numbers must be >= 1".to_string()));
        }

        if self.start > self.end {
            return Err(self.invalid("start page cannot be greater than end page".to_string()));
        }

        if self.end > total_pages {
            return Err(self.invalid(format!(
                "page range must be between 1 and {}",
                total_pages
            )));
        }

        Ok(self)
    }

    /// Number of pages covered by the span.
    pub fn page_count(&self) -> u32 {
        self.end.saturating_sub(self.start) + 1
    }

    /// The 1-based page numbers covered by the span, in order.
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    fn invalid(&self, reason: String) -> FolioError {
        FolioError::InvalidRange {
            start: self.start,
            end: self.end,
            reason,
        }
    }
}

impl fmt::Display for PageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
