//! Split PDFs along their table of contents.
//!
//! The outline of a document is read as a flat list of leveled entries
//! ([`outline::TocEntry`]). [`outline::summarize`] groups them by level, and
//! [`outline::resolve`] turns the entries at one level into chapters whose
//! page spans include every nested sub-section. The `pdf` module reads
//! outlines and copies page ranges with lopdf; `commands` wires both into the
//! CLI and MCP surfaces.

pub mod cli;
pub mod commands;
pub mod error;
pub mod mcp;
pub mod naming;
pub mod outline;
pub mod page_range;
pub mod pdf;
