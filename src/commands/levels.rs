use crate::error::FolioError;
use crate::outline::{summarize, LevelInventory};
use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

/// How many titles the table previews per level.
pub const SAMPLE_COUNT: usize = 3;
const PREVIEW_WIDTH: usize = 55;
const RULE_WIDTH: usize = 80;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let doc = PdfDocument::open(path)?;
    let entries = doc.outline()?;

    if entries.is_empty() {
        return Err(FolioError::NoOutline.into());
    }

    print!("{}", render_inventory(&display_name(path), &summarize(&entries)));
    Ok(())
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The level table shown before asking which level to extract.
pub fn render_inventory(name: &str, inventory: &LevelInventory) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!(
        "\nAnalyzing structure of: {name}\n{rule}\n{:<4} | {:<6} | Samples (First {SAMPLE_COUNT} items)\n{rule}\n",
        "Lvl", "Count",
    );

    for summary in inventory.summaries(SAMPLE_COUNT) {
        let preview = preview(&summary.samples, summary.count);
        out.push_str(&format!(
            "{:<4} | {:<6} | {}\n",
            summary.level, summary.count, preview
        ));
    }

    out.push_str(&rule);
    out.push('\n');
    out
}

/// Join sample titles, cutting long previews and marking levels with more
/// titles than shown.
fn preview(samples: &[String], count: usize) -> String {
    let joined = samples.join(", ");
    if joined.chars().count() > PREVIEW_WIDTH {
        let cut: String = joined.chars().take(PREVIEW_WIDTH - 3).collect();
        format!("{}...", cut)
    } else if count > samples.len() {
        format!("{}, ...", joined)
    } else {
        joined
    }
}
