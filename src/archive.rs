//! Gzip compression boundary and transparent document I/O.
//!
//! The viewer treats compressed and plain markdown uniformly: `read_document`
//! sniffs the gzip magic and decompresses when present, otherwise the bytes
//! are taken as UTF-8 text. Compression itself only runs on the explicit
//! `compress`/`decompress` commands, never on the viewing path.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// File extension used for compressed markdown (`doc.md.gz`).
pub const COMPRESSED_EXT: &str = "gz";

/// Compress UTF-8 text into a gzip byte stream.
pub fn compress(text: &str) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    encoder.finish()
}

/// Decompress a gzip byte stream into UTF-8 text.
///
/// Fails on a truncated or corrupt stream and on decompressed bytes that are
/// not valid UTF-8; both surface as a single `io::Error` at the load boundary.
pub fn decompress(bytes: &[u8]) -> io::Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder.read_to_string(&mut text)?;
    Ok(text)
}

/// Check for the gzip magic header (0x1f 0x8b).
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Whether a path names a compressed document (`.gz` extension).
pub fn is_compressed_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(COMPRESSED_EXT))
}

/// Read a document, decompressing transparently when the content is gzip.
///
/// The decision is made on content, not extension, so a plain file with a
/// misleading name still loads.
pub fn read_document(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    if is_gzip(&bytes) {
        decompress(&bytes)
    } else {
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Write a document, compressing when the target path has a `.gz` extension.
///
/// The write is atomic: content goes to a temp file in the target directory
/// which is then persisted over the destination.
pub fn write_document(path: &Path, text: &str) -> io::Result<()> {
    let bytes = if is_compressed_path(path) {
        compress(text)?
    } else {
        text.as_bytes().to_vec()
    };
    write_atomic(path, &bytes)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file
        .persist(path)
        .map_err(|e| io::Error::other(format!("failed to persist {}: {}", path.display(), e)))?;
    Ok(())
}

/// Compress a plain file to `<file>.gz` (or an explicit output path).
///
/// Returns the path written. Refuses input that is already gzip.
pub fn compress_file(input: &Path, output: Option<&Path>) -> io::Result<PathBuf> {
    let bytes = fs::read(input)?;
    if is_gzip(&bytes) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is already gzip-compressed", input.display()),
        ));
    }
    let text =
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let mut name = input.as_os_str().to_os_string();
            name.push(".gz");
            PathBuf::from(name)
        }
    };
    write_atomic(&target, &compress(&text)?)?;
    Ok(target)
}

/// Decompress a gzip file, dropping a trailing `.gz` for the default output.
///
/// Returns the path written.
pub fn decompress_file(input: &Path, output: Option<&Path>) -> io::Result<PathBuf> {
    let bytes = fs::read(input)?;
    if !is_gzip(&bytes) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not gzip-compressed", input.display()),
        ));
    }
    let text = decompress(&bytes)?;

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => {
            if is_compressed_path(input) {
                input.with_extension("")
            } else {
                let mut name = input.as_os_str().to_os_string();
                name.push(".txt");
                PathBuf::from(name)
            }
        }
    };
    write_atomic(&target, text.as_bytes())?;
    Ok(target)
}
