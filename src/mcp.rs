use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::commands::extract::{default_output_dir, extract_chapters, WrittenChapter};
use crate::commands::merge::merge_files;
use crate::commands::split::split_range;
use crate::error::FolioError;
use crate::outline::{summarize, Blocklist, LevelSummary};
use crate::pdf::PdfDocument;

/// Titles previewed per level by `pdf_toc_levels`.
const MCP_SAMPLE_COUNT: usize = 5;

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExtractChaptersRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Table of contents level to extract (1 = top level)")]
    pub level: u32,
    #[schemars(description = "Directory for chapter files (default: <name>_chapters next to the working directory)")]
    #[serde(default)]
    pub output_dir: Option<String>,
    #[schemars(description = "Additional title phrases to skip (whole word, case-insensitive)")]
    #[serde(default)]
    pub block: Vec<String>,
    #[schemars(description = "Do not skip front/back matter such as 'Index' or 'Copyright' (default: false)")]
    #[serde(default)]
    pub no_default_blocklist: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "First page (1-based)")]
    pub start: u32,
    #[schemars(description = "Last page (1-based, inclusive)")]
    pub end: u32,
    #[schemars(description = "Output file path (default: split_<start>-<end>.pdf)")]
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MergeRequest {
    #[schemars(description = "PDF files to merge, in order (at least 2)")]
    pub inputs: Vec<String>,
    #[schemars(description = "Output file path (default: merged_output.pdf)")]
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FolioServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl FolioServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for FolioServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl FolioServer {
    #[tool(description = "List the levels of a PDF's table of contents with entry counts and sample titles")]
    fn pdf_toc_levels(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        to_json(toc_levels(path))
    }

    #[tool(description = "Write one PDF per table-of-contents entry at the given level. Each file covers the entry and all of its sub-sections; front/back matter is skipped.")]
    fn pdf_extract_chapters(&self, Parameters(req): Parameters<ExtractChaptersRequest>) -> String {
        to_json(extract(req))
    }

    #[tool(description = "Copy an inclusive page range of a PDF into a new file")]
    fn pdf_split(&self, Parameters(req): Parameters<SplitRequest>) -> String {
        to_json(
            split_range(&req.path, req.start, req.end, req.output.as_deref()).map(
                |(output_path, page_count)| WrittenFileResult {
                    output_path: output_path.display().to_string(),
                    page_count,
                },
            ),
        )
    }

    #[tool(description = "Concatenate two or more PDFs, in order, into one file")]
    fn pdf_merge(&self, Parameters(req): Parameters<MergeRequest>) -> String {
        to_json(merge_files(&req.inputs, req.output.as_deref()).map(
            |(output_path, page_count)| WrittenFileResult {
                output_path: output_path.display().to_string(),
                page_count,
            },
        ))
    }
}

fn toc_levels(path: String) -> Result<TocLevelsResult> {
    let doc = PdfDocument::open(&path)?;
    let entries = doc.outline()?;
    if entries.is_empty() {
        return Err(FolioError::NoOutline.into());
    }
    Ok(TocLevelsResult {
        page_count: doc.page_count(),
        levels: summarize(&entries).summaries(MCP_SAMPLE_COUNT),
        path,
    })
}

fn extract(req: ExtractChaptersRequest) -> Result<ExtractChaptersResult> {
    let blocklist = Blocklist::configured(req.block, !req.no_default_blocklist)?;

    let doc = PdfDocument::open(&req.path)?;
    let output_dir = req
        .output_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_dir(&doc.path));

    let (resolution, chapters) = extract_chapters(&doc, req.level, &blocklist, &output_dir)?;
    Ok(ExtractChaptersResult {
        output_dir: output_dir.display().to_string(),
        excluded: resolution.excluded,
        chapters,
    })
}

fn to_json<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(value) => serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error: {}", e)),
        Err(e) => format!("Error: {:#}", e),
    }
}

// Result types for MCP tools

#[derive(Debug, Serialize)]
pub struct TocLevelsResult {
    pub path: String,
    pub page_count: u32,
    pub levels: Vec<LevelSummary>,
}

#[derive(Debug, Serialize)]
pub struct ExtractChaptersResult {
    pub output_dir: String,
    pub excluded: Vec<String>,
    pub chapters: Vec<WrittenChapter>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WrittenFileResult {
    pub output_path: String,
    pub page_count: u32,
}

impl ServerHandler for FolioServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF chapter extraction tools. Use pdf_toc_levels to see which table-of-contents \
                 levels a document has, pdf_extract_chapters to write one PDF per entry at a \
                 level, pdf_split to copy a page range, and pdf_merge to concatenate PDFs."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = FolioServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
