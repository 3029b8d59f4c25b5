use crate::error::FolioError;
use crate::naming::ensure_pdf_extension;
use crate::pdf::{merge_documents, PdfDocument};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run<P: AsRef<Path>>(inputs: &[P], output: Option<&str>) -> Result<()> {
    let (output_path, total_pages) = merge_files(inputs, output)?;

    println!(
        "Success! Merged {} files ({} pages) into '{}'.",
        inputs.len(),
        total_pages,
        output_path.display()
    );

    Ok(())
}

/// Concatenate `inputs` in order into one file.
///
/// At least two inputs are required. The output defaults to
/// `merged_output.pdf`. Returns the written path and its page count.
pub fn merge_files<P: AsRef<Path>>(inputs: &[P], output: Option<&str>) -> Result<(PathBuf, u32)> {
    if inputs.len() < 2 {
        return Err(FolioError::InvalidArguments(
            "You need at least 2 files to merge.".to_string(),
        )
        .into());
    }

    let output_path = PathBuf::from(ensure_pdf_extension(output.unwrap_or("merged_output.pdf")));

    // First document is the base the others are appended to
    let first = PdfDocument::open(&inputs[0])?;
    info!(file = %first.path.display(), "adding");
    let mut merged = first.doc;
    let mut total_pages = merged.get_pages().len() as u32;

    for input in &inputs[1..] {
        let doc = PdfDocument::open(input)?;
        info!(file = %doc.path.display(), "adding");
        total_pages += merge_documents(&mut merged, &doc.doc)
            .with_context(|| format!("Failed to merge PDF: {}", doc.path.display()))?;
    }

    merged.prune_objects();
    PdfDocument::save(&mut merged, &output_path)
        .with_context(|| format!("Failed to save merged PDF: {}", output_path.display()))?;

    Ok((output_path, total_pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testing::{build_pdf_with_prefix, page_text};

    #[test]
    fn test_merge_three_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = Vec::new();
        for (name, pages) in [("a", 2), ("b", 1), ("c", 3)] {
            let path = dir.path().join(format!("{name}.pdf"));
            build_pdf_with_prefix(pages, name, &[]).save(&path).unwrap();
            inputs.push(path);
        }
        let output = dir.path().join("all");

        let (path, pages) = merge_files(&inputs, output.to_str()).unwrap();

        assert_eq!(path, dir.path().join("all.pdf"));
        assert_eq!(pages, 6);
        let merged = PdfDocument::open(&path).unwrap();
        assert_eq!(merged.page_count(), 6);
        assert!(page_text(&merged.doc, 1).contains("(a 1)"));
        assert!(page_text(&merged.doc, 3).contains("(b 1)"));
        assert!(page_text(&merged.doc, 6).contains("(c 3)"));
    }

    #[test]
    fn test_merge_requires_two_inputs() {
        let err = merge_files(&["only.pdf"], None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolioError>(),
            Some(FolioError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_merge_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.pdf");
        build_pdf_with_prefix(1, "p", &[]).save(&present).unwrap();
        let missing = dir.path().join("missing.pdf");
        let output = dir.path().join("out.pdf");

        let err = merge_files(&[present, missing], output.to_str()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FolioError>(),
            Some(FolioError::InputNotFound(_))
        ));
        assert!(!output.exists());
    }
}
