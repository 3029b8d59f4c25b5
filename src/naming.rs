//! Output file naming.

const RESERVED: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Make a section title safe to use as a file name.
///
/// Line breaks and tabs become spaces, reserved and control characters are
/// dropped, and whitespace runs collapse to a single space.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .filter(|c| !RESERVED.contains(c) && !c.is_control())
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `{ordinal:02}_{title}.pdf`, falling back to "chapter" for titles that
/// sanitize to nothing.
pub fn chapter_file_name(ordinal: usize, title: &str) -> String {
    let safe = sanitize_filename(title);
    let safe = if safe.is_empty() { "chapter" } else { safe.as_str() };
    format!("{:02}_{}.pdf", ordinal, safe)
}

/// Append `.pdf` unless the name already ends with it (any case).
pub fn ensure_pdf_extension(name: &str) -> String {
    if name.to_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}
