//! # gzmd
//!
//! A gzip-transparent markdown viewer with tree-based outline navigation.
//!
//! ## Usage
//!
//! Launch the interactive TUI:
//! ```sh
//! gzmd notes.md.gz
//! ```
//!
//! List all headings:
//! ```sh
//! gzmd -l notes.md.gz
//! ```
//!
//! Compress a document:
//! ```sh
//! gzmd compress notes.md
//! ```

mod cli;

use clap::Parser as ClapParser;
use cli::{Cli, Command, OutputFormat};
use color_eyre::Result;
use gzmd::parser::{self, Document, Heading};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    // Explicit compress/decompress commands run outside the viewing path
    if let Some(ref command) = args.command {
        return handle_archive_command(command);
    }

    let file = match args.file.clone() {
        Some(file) => file,
        None => match find_markdown_in_cwd() {
            Some(file) => file,
            None => {
                eprintln!("No markdown files found in current directory.");
                eprintln!("\nUsage: gzmd [OPTIONS] <FILE>");
                eprintln!("       gzmd compress <FILE>");
                eprintln!("       gzmd decompress <FILE>\n");
                eprintln!("Tip: Navigate to a directory with .md or .md.gz files, or specify a path.");
                process::exit(1);
            }
        },
    };

    let cli_mode = args.list || args.tree || args.count || args.section.is_some();

    if cli_mode {
        // Load failures in CLI mode are reported once and end the run
        let doc = match parser::parse_file(&file) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("Error reading {}: {}", file.display(), e);
                process::exit(1);
            }
        };
        handle_cli_mode(&args, &doc);
        return Ok(());
    }

    run_tui(&file)
}

fn run_tui(file: &PathBuf) -> Result<()> {
    let config = gzmd::Config::load();
    let mut app = gzmd::App::new(config);

    // A malformed stream gets one notice; the outline then shows its
    // empty state instead of crashing. Re-opening is the retry path.
    match parser::parse_file(file) {
        Ok(doc) => app.load_document(doc, file.clone()),
        Err(e) => {
            app.status_message = Some(format!("✗ Could not load {}: {}", file.display(), e));
        }
    }

    // Initialize terminal with explicit error handling
    use crossterm::ExecutableCommand;
    use crossterm::terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    };
    use std::io::stdout;

    enable_raw_mode().inspect_err(|e| {
        eprintln!("Failed to enable raw mode: {}", e);
    })?;

    stdout().execute(EnterAlternateScreen).inspect_err(|_| {
        disable_raw_mode().ok();
    })?;

    let backend = ratatui::backend::CrosstermBackend::new(stdout());
    let mut terminal = ratatui::Terminal::new(backend).inspect_err(|_| {
        disable_raw_mode().ok();
    })?;

    let result = gzmd::tui::run(&mut terminal, app);

    stdout().execute(LeaveAlternateScreen).ok();
    disable_raw_mode().ok();

    result
}

fn handle_archive_command(command: &Command) -> Result<()> {
    let outcome = match command {
        Command::Compress { file, output } => {
            gzmd::archive::compress_file(file, output.as_deref())
        }
        Command::Decompress { file, output } => {
            gzmd::archive::decompress_file(file, output.as_deref())
        }
    };

    match outcome {
        Ok(written) => {
            println!("{}", written.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Pick a markdown file from the current directory when none was given.
///
/// Plain and compressed markdown both qualify; the alphabetically first
/// match wins so repeated launches are stable.
fn find_markdown_in_cwd() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(&cwd)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_markdown_path(path))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

fn is_markdown_path(path: &std::path::Path) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_lowercase(),
        None => return false,
    };
    name.ends_with(".md")
        || name.ends_with(".markdown")
        || name.ends_with(".md.gz")
        || name.ends_with(".markdown.gz")
}

fn handle_cli_mode(args: &Cli, doc: &Document) {
    // Apply filters
    let headings: Vec<&Heading> = if let Some(level) = args.level {
        doc.headings_at_level(level)
    } else if let Some(ref filter) = args.filter {
        doc.filter_headings(filter)
    } else {
        doc.headings.iter().collect()
    };

    if args.count {
        print_heading_counts(doc);
    } else if args.tree {
        print_tree(doc, args.output);
    } else if let Some(ref section_name) = args.section {
        print_section(doc, section_name);
    } else if args.list {
        print_headings(&headings, args.output);
    }
}

fn print_headings(headings: &[&Heading], format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            for heading in headings {
                let prefix = "#".repeat(heading.level);
                println!("{} {}", prefix, heading.text);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(headings) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing headings: {}", e);
                process::exit(1);
            }
        },
    }
}

fn print_tree(doc: &Document, format: OutputFormat) {
    match format {
        OutputFormat::Plain => {
            let tree = doc.build_tree();
            for (i, node) in tree.iter().enumerate() {
                let is_last = i == tree.len() - 1;
                print!("{}", node.render_box_tree("", is_last));
            }
        }
        OutputFormat::Json => {
            // JSON keeps the flat heading list; nesting is recoverable
            // from the levels
            match serde_json::to_string_pretty(&doc.headings) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing headings: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn print_heading_counts(doc: &Document) {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for heading in &doc.headings {
        *counts.entry(heading.level).or_insert(0) += 1;
    }

    println!("Heading counts:");
    for level in 1..=6 {
        if let Some(count) = counts.get(&level) {
            let prefix = "#".repeat(level);
            println!("  {}: {}", prefix, count);
        }
    }
    println!("\nTotal: {}", doc.headings.len());
}

fn print_section(doc: &Document, section_name: &str) {
    match doc.extract_section(section_name) {
        Some(content) => println!("{}", content),
        None => {
            eprintln!("Section '{}' not found", section_name);
            process::exit(1);
        }
    }
}
