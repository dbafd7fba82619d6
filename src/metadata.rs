//! Structural-metadata lookup as an injectable capability.
//!
//! The host's own index knows nothing about compressed documents, so the
//! viewer substitutes its derived heading records through a decorator rather
//! than patching any shared lookup function: consumers hold a
//! [`HeadingMetadataProvider`] and never care which implementation answers.

use crate::parser::Heading;
use std::collections::HashMap;

/// Queryable per-document heading metadata, keyed by document identifier.
pub trait HeadingMetadataProvider {
    /// Heading records for the document, or `None` when this provider has
    /// no structural metadata for it.
    fn headings(&self, doc_id: &str) -> Option<Vec<Heading>>;
}

/// The host-indexed metadata store.
///
/// Holds whatever the host indexed itself; compressed documents never appear
/// here, which is the gap the decorator fills.
#[derive(Debug, Default)]
pub struct NativeMetadata {
    indexed: HashMap<String, Vec<Heading>>,
}

impl NativeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record host-indexed headings for a document.
    pub fn index(&mut self, doc_id: impl Into<String>, headings: Vec<Heading>) {
        self.indexed.insert(doc_id.into(), headings);
    }
}

impl HeadingMetadataProvider for NativeMetadata {
    fn headings(&self, doc_id: &str) -> Option<Vec<Heading>> {
        self.indexed.get(doc_id).cloned()
    }
}

/// Override-then-delegate decorator carrying derived heading records.
///
/// Lookups check the derived store first and fall back to the wrapped
/// provider, so documents the host indexed itself keep working unchanged.
/// Records are installed when a document's outline is built and removed when
/// it closes; nothing global is mutated and there is no teardown dance.
#[derive(Debug)]
pub struct DerivedMetadata<P> {
    inner: P,
    derived: HashMap<String, Vec<Heading>>,
}

impl<P: HeadingMetadataProvider> DerivedMetadata<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            derived: HashMap::new(),
        }
    }

    /// Install derived records for a document, replacing any previous ones.
    pub fn install(&mut self, doc_id: impl Into<String>, headings: Vec<Heading>) {
        self.derived.insert(doc_id.into(), headings);
    }

    /// Drop the derived records for a document, restoring delegation.
    pub fn remove(&mut self, doc_id: &str) {
        self.derived.remove(doc_id);
    }
}

impl<P: HeadingMetadataProvider> HeadingMetadataProvider for DerivedMetadata<P> {
    fn headings(&self, doc_id: &str) -> Option<Vec<Heading>> {
        self.derived
            .get(doc_id)
            .cloned()
            .or_else(|| self.inner.headings(doc_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::scan_headings;

    #[test]
    fn test_native_lookup() {
        let mut native = NativeMetadata::new();
        native.index("notes.md", scan_headings("# Indexed\n"));

        assert_eq!(native.headings("notes.md").unwrap()[0].text, "Indexed");
        assert!(native.headings("other.md").is_none());
    }

    #[test]
    fn test_derived_overrides_then_delegates() {
        let mut native = NativeMetadata::new();
        native.index("plain.md", scan_headings("# Native\n"));

        let mut provider = DerivedMetadata::new(native);
        provider.install("doc.md.gz", scan_headings("# Derived\n## Child\n"));

        // Derived record wins for the compressed document
        let derived = provider.headings("doc.md.gz").unwrap();
        assert_eq!(derived.len(), 2);
        assert_eq!(derived[0].text, "Derived");

        // Misses delegate to the native index
        assert_eq!(provider.headings("plain.md").unwrap()[0].text, "Native");
        assert!(provider.headings("unknown.md").is_none());
    }

    #[test]
    fn test_install_shadows_native() {
        let mut native = NativeMetadata::new();
        native.index("doc.md", scan_headings("# Old\n"));

        let mut provider = DerivedMetadata::new(native);
        provider.install("doc.md", scan_headings("# New\n"));
        assert_eq!(provider.headings("doc.md").unwrap()[0].text, "New");

        // Removing the override restores delegation
        provider.remove("doc.md");
        assert_eq!(provider.headings("doc.md").unwrap()[0].text, "Old");
    }
}
