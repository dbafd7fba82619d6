//! Markdown parsing and document structure extraction.
//!
//! Only heading lines matter to the outline: the scanner walks the text once,
//! line by line, and emits an ordered list of heading records with byte
//! offsets. Content between fence markers is never scanned.

mod document;

pub use document::{Document, Heading, HeadingNode, build_forest};

use std::io;
use std::path::Path;

/// Parse a markdown file, decompressing transparently when it is gzip.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the gzip stream is
/// malformed, or the text is not valid UTF-8.
pub fn parse_file(path: &Path) -> io::Result<Document> {
    let content = crate::archive::read_document(path)?;
    Ok(parse_markdown(&content))
}

/// Parse markdown content and extract headings with byte offsets.
pub fn parse_markdown(content: &str) -> Document {
    let headings = scan_headings(content);
    Document::new(content.to_string(), headings)
}

/// Scan text for ATX headings, skipping fenced code blocks.
///
/// A line is a heading iff it begins with 1-6 `#` characters followed by at
/// least one whitespace character and non-empty remaining content. The fence
/// state is a plain toggle: any line whose trimmed form starts with ```` ``` ````
/// flips it, and an unterminated fence suppresses every heading after it.
/// That last part is surprising but intentional; see the fence tests.
///
/// Pure function of the input; malformed markdown never fails, it just
/// doesn't match.
pub fn scan_headings(content: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut offset = 0usize;
    let mut in_fence = false;

    for (line_no, line) in content.split('\n').enumerate() {
        if line.trim().starts_with("```") {
            in_fence = !in_fence;
        } else if !in_fence
            && let Some((level, text)) = match_heading(line)
        {
            headings.push(Heading {
                level,
                text,
                line: line_no,
                offset,
                end_offset: offset + line.len(),
            });
        }
        offset += line.len() + 1;
    }

    headings
}

/// Match one line as a heading: marker count and trimmed remainder.
fn match_heading(line: &str) -> Option<(usize, String)> {
    let hashes = line.bytes().take_while(|&b| b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }

    Some((hashes, text.to_string()))
}
