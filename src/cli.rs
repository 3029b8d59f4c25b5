use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Split PDFs into chapters using their table of contents, or by page range")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract one PDF per table-of-contents entry at a given level
    Extract {
        /// PDF file to extract chapters from
        input_file: PathBuf,

        /// Directory to save chapters (default: <name>_chapters)
        #[arg(short = 'd', long)]
        output_dir: Option<PathBuf>,

        /// Which hierarchy level to extract (1=Part, 2=Chapter); prompts when omitted
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        level: Option<u32>,

        #[command(flatten)]
        blocklist: BlocklistArgs,
    },

    /// Show how many table-of-contents entries each level has
    #[command(alias = "toc")]
    Levels {
        /// PDF file to inspect
        input_file: PathBuf,
    },

    /// Copy a page range into a new PDF
    Split {
        /// PDF file to split
        input_file: PathBuf,

        /// First page
        #[arg(short, long)]
        start: u32,

        /// Last page
        #[arg(short, long)]
        end: u32,

        /// Output filename (default: split_<start>-<end>.pdf)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge, in order
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Output filename (default: merged_output.pdf)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run as MCP server over stdio
    Mcp,
}

/// Which section titles `extract` leaves out.
#[derive(Args, Debug, Default)]
pub struct BlocklistArgs {
    /// Additional title phrase to skip (whole word, case-insensitive); repeatable
    #[arg(short, long = "block", value_name = "PHRASE")]
    pub block: Vec<String>,

    /// Do not skip front/back matter such as "Index" or "Copyright" by default
    #[arg(long)]
    pub no_default_blocklist: bool,
}
