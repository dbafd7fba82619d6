//! # gzmd
//!
//! A markdown viewer library for gzip-compressed documents with tree-based
//! outline navigation.
//!
//! The host application's own index only knows files it parsed itself, so
//! compressed markdown would render without any structure. This crate fills
//! the gap: it decompresses transparently, extracts the heading structure
//! from raw text, builds the outline tree, and maintains the interactive
//! view state (filter, collapse/expand, active-heading tracking) over it.
//!
//! ## Features
//!
//! - Transparent gzip decompression (detected by content, not extension)
//! - Heading extraction with fenced-code-block awareness
//! - Tree construction from the flat heading sequence
//! - Pure, render-free outline state store (collapse, filter, active line)
//! - Interactive dual-pane TUI
//!
//! ## Example
//!
//! ```rust
//! use gzmd::{archive, parse_markdown};
//!
//! let markdown = "# Introduction\n\n## Background\n\n## Methodology\n";
//!
//! // Round-trip through the compression boundary
//! let bytes = archive::compress(markdown).unwrap();
//! let text = archive::decompress(&bytes).unwrap();
//!
//! let doc = parse_markdown(&text);
//! assert_eq!(doc.headings.len(), 3);
//!
//! // Build the outline tree
//! let tree = doc.build_tree();
//! assert_eq!(tree.len(), 1);
//! assert_eq!(tree[0].children.len(), 2);
//! ```

/// Gzip compression boundary and transparent document I/O.
pub mod archive;

/// Configuration module for persisting user preferences.
pub mod config;

/// Structural-metadata lookup as an injectable capability.
///
/// Lets the viewer substitute its derived heading records for documents the
/// host never indexed, without patching any shared lookup function.
pub mod metadata;

/// Outline view state: collapse set, heading filter, active heading.
pub mod outline;

/// Parser module for markdown documents.
///
/// Provides heading extraction and tree building for markdown content.
pub mod parser;

/// TUI module for the interactive terminal interface.
pub mod tui;

// Re-export commonly used types for convenience
pub use config::Config;
pub use metadata::{DerivedMetadata, HeadingMetadataProvider, NativeMetadata};
pub use outline::{NodeKey, OutlineItem, OutlineState};
pub use parser::{Document, Heading, HeadingNode, parse_file, parse_markdown};
pub use tui::App;
