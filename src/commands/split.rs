use crate::naming::ensure_pdf_extension;
use crate::page_range::PageSpan;
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub fn run<P: AsRef<Path>>(input: P, start: u32, end: u32, output: Option<&str>) -> Result<()> {
    let (output_path, pages) = split_range(input, start, end, output)?;

    println!(
        "Success! Created '{}' with {} pages.",
        output_path.display(),
        pages
    );

    Ok(())
}

/// Copy pages `start..=end` of `input` into a new file.
///
/// The output defaults to `split_<start>-<end>.pdf`. Returns the written path
/// and its page count.
pub fn split_range<P: AsRef<Path>>(
    input: P,
    start: u32,
    end: u32,
    output: Option<&str>,
) -> Result<(PathBuf, u32)> {
    let doc = PdfDocument::open(&input)?;
    let span = PageSpan::new(start, end).validate(doc.page_count())?;

    let output_name = match output {
        Some(name) => ensure_pdf_extension(name),
        None => format!("split_{}-{}.pdf", start, end),
    };
    let output_path = PathBuf::from(output_name);

    let mut new_doc = doc.extract_range(span)?;
    PdfDocument::save(&mut new_doc, &output_path)
        .with_context(|| format!("Failed to save PDF: {}", output_path.display()))?;

    Ok((output_path, span.page_count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FolioError;
    use crate::pdf::testing::{build_pdf, page_text};

    fn fixture(dir: &Path, pages: u32) -> PathBuf {
        let path = dir.join("input.pdf");
        build_pdf(pages, &[]).save(&path).unwrap();
        path
    }

    #[test]
    fn test_split_writes_requested_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixture(dir.path(), 8);
        let output = dir.path().join("middle");

        let (path, pages) = split_range(&input, 3, 5, output.to_str()).unwrap();

        assert_eq!(path, dir.path().join("middle.pdf"));
        assert_eq!(pages, 3);
        let written = PdfDocument::open(&path).unwrap();
        assert_eq!(written.page_count(), 3);
        assert!(page_text(&written.doc, 1).contains("(Page 3)"));
    }

    #[test]
    fn test_split_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixture(dir.path(), 8);

        let err = split_range(&input, 6, 2, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolioError>(),
            Some(FolioError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_split_rejects_range_past_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = fixture(dir.path(), 4);
        let output = dir.path().join("never.pdf");

        assert!(split_range(&input, 1, 9, output.to_str()).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_split_missing_input() {
        let err = split_range("/nope/missing.pdf", 1, 2, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolioError>(),
            Some(FolioError::InputNotFound(_))
        ));
    }
}
