//! Core data models used throughout the answering pipeline.
//!
//! These types represent the documents and text segments that flow from
//! the corpus loader through chunking, indexing, and retrieval.

use std::collections::HashMap;
use std::path::PathBuf;

/// Metadata key under which a segment records its originating file.
pub const SOURCE_KEY: &str = "source";

/// Raw file contents produced by the corpus loader before chunking.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source_path: PathBuf,
    pub content: String,
}

/// A contiguous piece of a document's text, carrying provenance metadata.
///
/// Segments are immutable once created. The metadata map always contains
/// [`SOURCE_KEY`] pointing at the source file path.
#[derive(Debug, Clone)]
pub struct Segment {
    pub text: String,
    pub metadata: HashMap<String, String>,
}
