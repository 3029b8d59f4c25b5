use super::levels::{display_name, render_inventory};
use crate::error::FolioError;
use crate::naming::chapter_file_name;
use crate::outline::{resolve, summarize, Blocklist, Chapter, LevelInventory, Resolution};
use crate::pdf::PdfDocument;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ExtractOptions {
    /// Where chapter files go; `<input stem>_chapters` when unset.
    pub output_dir: Option<PathBuf>,
    /// Level to extract; the user is asked when unset.
    pub level: Option<u32>,
    pub blocklist: Blocklist,
}

/// A chapter file written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct WrittenChapter {
    pub file_name: String,
    pub path: PathBuf,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub page_count: u32,
}

pub fn run<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<()> {
    let path = path.as_ref();
    let doc = PdfDocument::open(path)?;
    let entries = doc.outline()?;

    if entries.is_empty() {
        return Err(FolioError::NoOutline.into());
    }

    let inventory = summarize(&entries);
    let level = match options.level {
        Some(level) => level,
        None => {
            print!("{}", render_inventory(&display_name(path), &inventory));
            let stdin = io::stdin();
            match prompt_level(stdin.lock(), io::stdout(), &inventory)? {
                Some(level) => level,
                None => return Ok(()),
            }
        }
    };

    println!("\nExtracting Level {} (Including all sub-chapters)...", level);

    let resolution = resolve(&entries, level, doc.page_count(), &options.blocklist)?;
    for title in &resolution.excluded {
        println!("   Skipping ignored section: {}", title);
    }
    println!("   Found {} valid chapters.\n", resolution.chapters.len());

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(path));

    let written = write_chapters(&doc, &resolution, &output_dir)?;
    for chapter in &written {
        println!("  Saved: {} ({} pages)", chapter.file_name, chapter.page_count);
    }

    println!("\nDone! Check the folder: {}", output_dir.display());
    Ok(())
}

/// Resolve `level` and write one file per chapter into `output_dir`.
///
/// Nothing is written when the level cannot be resolved.
pub fn extract_chapters(
    doc: &PdfDocument,
    level: u32,
    blocklist: &Blocklist,
    output_dir: &Path,
) -> Result<(Resolution, Vec<WrittenChapter>)> {
    let entries = doc.outline()?;
    let resolution = resolve(&entries, level, doc.page_count(), blocklist)?;
    let written = write_chapters(doc, &resolution, output_dir)?;
    Ok((resolution, written))
}

pub fn write_chapters(
    doc: &PdfDocument,
    resolution: &Resolution,
    output_dir: &Path,
) -> Result<Vec<WrittenChapter>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    resolution
        .chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| write_chapter(doc, i + 1, chapter, output_dir))
        .collect()
}

fn write_chapter(
    doc: &PdfDocument,
    ordinal: usize,
    chapter: &Chapter,
    output_dir: &Path,
) -> Result<WrittenChapter> {
    let file_name = chapter_file_name(ordinal, &chapter.title);
    let out_path = output_dir.join(&file_name);

    let mut new_doc = doc
        .extract_range(chapter.span())
        .with_context(|| format!("Failed to copy pages {} for '{}'", chapter.span(), chapter.title))?;
    PdfDocument::save(&mut new_doc, &out_path)
        .with_context(|| format!("Failed to save PDF: {}", out_path.display()))?;

    info!(file = %out_path.display(), pages = %chapter.span(), "wrote chapter");

    Ok(WrittenChapter {
        file_name,
        path: out_path,
        title: chapter.title.clone(),
        start_page: chapter.start_page,
        end_page: chapter.end_page,
        page_count: chapter.page_count(),
    })
}

/// `<input stem>_chapters`, relative to the working directory.
pub fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    PathBuf::from(format!("{}_chapters", stem))
}

/// Ask for a level until a present one is entered.
///
/// Returns `None` when the user quits with `q` or input ends.
pub fn prompt_level<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    inventory: &LevelInventory,
) -> io::Result<Option<u32>> {
    loop {
        write!(output, "\nSelect a Level to extract (or 'q' to quit): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match answer.parse::<u32>() {
            Ok(level) if inventory.contains(level) => return Ok(Some(level)),
            _ => writeln!(output, "Invalid level.")?,
        }
    }
}
