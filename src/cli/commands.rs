use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gzmd")]
#[command(version)]
#[command(about = "A gzip-transparent markdown viewer with tree-based outline navigation")]
#[command(
    long_about = "gzmd - view markdown documents, plain or gzip-compressed, with an\n\
    interactive outline pane.\n\n\
    Launch without flags for the dual-pane TUI with collapse/expand, heading\n\
    filter, and scroll-synchronized outline. Use flags for CLI mode to list,\n\
    filter, and extract document structure, or the compress/decompress\n\
    subcommands to convert files.\n\n\
    Examples:\n  \
    gzmd README.md                # Interactive TUI mode\n  \
    gzmd notes.md.gz              # Compressed files open transparently\n  \
    gzmd -l README.md             # List all headings\n  \
    gzmd --tree notes.md.gz       # Show heading tree\n  \
    gzmd compress README.md       # Write README.md.gz"
)]
pub struct Cli {
    /// Markdown file to view (.md, .markdown, or gzip-compressed .gz)
    ///
    /// Compressed input is detected by content, not extension, and is
    /// decompressed transparently before viewing.
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,

    /// List all headings in the document (non-interactive)
    ///
    /// Displays all headings with their level indicators (# for h1, ## for
    /// h2, etc.). Combine with --filter or --level to narrow results.
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Show heading tree structure with box-drawing characters (non-interactive)
    #[arg(long = "tree")]
    pub tree: bool,

    /// Filter headings by text pattern (case-insensitive)
    ///
    /// Only shows headings containing the specified text.
    /// Works with --list mode.
    #[arg(long = "filter", value_name = "PATTERN")]
    pub filter: Option<String>,

    /// Show only headings at specific level (1-6)
    #[arg(short = 'L', long = "level", value_name = "LEVEL")]
    pub level: Option<usize>,

    /// Output format for --list and --tree modes
    #[arg(short = 'o', long = "output", default_value = "plain")]
    pub output: OutputFormat,

    /// Extract specific section by heading name
    ///
    /// Extracts content from a heading until the next heading of same or
    /// higher level.
    #[arg(short = 's', long = "section", value_name = "HEADING")]
    pub section: Option<String>,

    /// Count headings by level (shows statistics)
    #[arg(long = "count")]
    pub count: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a markdown file to gzip
    ///
    /// Writes <FILE>.gz next to the input unless --output is given. The
    /// input file is left in place.
    Compress {
        /// Plain markdown file to compress
        file: PathBuf,

        /// Destination path (default: <FILE>.gz)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Decompress a gzip markdown file
    ///
    /// Drops the trailing .gz for the default destination. The input file
    /// is left in place.
    Decompress {
        /// Gzip-compressed file to expand
        file: PathBuf,

        /// Destination path (default: input without .gz)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Plain,
    /// JSON for scripting
    Json,
}
