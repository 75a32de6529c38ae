//! Recursive text splitter with sliding overlap.
//!
//! Splits document text into [`Segment`]s of at most `chunk_size`
//! characters, carrying `chunk_overlap` characters between adjacent
//! segments. Splitting prefers the coarsest boundary present in the text:
//!
//! | Separator | Boundary |
//! |-----------|----------|
//! | `"\n\n"`  | paragraph |
//! | `"\n"`    | line |
//! | `" "`     | word |
//! | `""`      | character |
//!
//! Pieces still longer than `chunk_size` are re-split at the next finer
//! boundary; pieces that fit are merged back into windows of at most
//! `chunk_size` characters. All lengths are counted in characters, never
//! bytes, so multi-byte text cannot be cut mid-character.
//!
//! Splitting is pure and deterministic: the same text and limits always
//! produce the same segments. Callers must hold `chunk_overlap <
//! chunk_size` (enforced by config validation).

use tracing::warn;

use crate::config::ChunkingConfig;
use crate::models::{RawDocument, Segment, SOURCE_KEY};

/// Boundary ladder, coarsest first. The empty separator always applies.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Split every document and tag each segment with its source path.
pub fn split_documents(documents: &[RawDocument], config: &ChunkingConfig) -> Vec<Segment> {
    let mut segments = Vec::new();
    for doc in documents {
        for text in split_text(&doc.content, config.chunk_size, config.chunk_overlap) {
            segments.push(make_segment(doc, text));
        }
    }
    segments
}

/// Split one text into overlapping windows of at most `chunk_size` chars.
///
/// Whitespace-only text produces no output; a nonempty text shorter than
/// `chunk_size` produces a single window.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    split_recursive(text, chunk_size, chunk_overlap, &SEPARATORS)
}

fn make_segment(doc: &RawDocument, text: String) -> Segment {
    let mut metadata = std::collections::HashMap::new();
    metadata.insert(
        SOURCE_KEY.to_string(),
        doc.source_path.display().to_string(),
    );
    Segment { text, metadata }
}

fn split_recursive(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    let mut final_chunks = Vec::new();

    // Coarsest separator that actually occurs in the text; the empty
    // separator matches anything and ends the ladder.
    let mut separator = "";
    let mut finer: &[&str] = &[];
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep) {
            separator = sep;
            finer = &separators[i + 1..];
            break;
        }
    }

    let mut window: Vec<String> = Vec::new();
    for piece in split_on_separator(text, separator) {
        if char_len(&piece) < chunk_size {
            window.push(piece);
            continue;
        }
        if !window.is_empty() {
            final_chunks.extend(merge_window(&window, separator, chunk_size, chunk_overlap));
            window.clear();
        }
        if finer.is_empty() {
            final_chunks.push(piece);
        } else {
            final_chunks.extend(split_recursive(&piece, chunk_size, chunk_overlap, finer));
        }
    }
    if !window.is_empty() {
        final_chunks.extend(merge_window(&window, separator, chunk_size, chunk_overlap));
    }

    final_chunks
}

fn split_on_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        text.chars().map(String::from).collect()
    } else {
        text.split(separator)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Merge fitting pieces into windows of at most `chunk_size` chars.
///
/// When a window fills up it is emitted, then pieces are dropped from its
/// front until at most `chunk_overlap` chars remain; those chars open the
/// next window, producing the overlap between adjacent segments.
fn merge_window(
    pieces: &[String],
    separator: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let sep_len = char_len(separator);
    let mut merged = Vec::new();
    let mut window: Vec<&str> = Vec::new();
    // Running char total of the window including separators.
    let mut total = 0usize;

    for piece in pieces {
        let piece_len = char_len(piece);
        let join_len = if window.is_empty() { 0 } else { sep_len };

        if total + piece_len + join_len > chunk_size {
            if total > chunk_size {
                warn!(
                    chars = total,
                    limit = chunk_size,
                    "segment exceeds the configured chunk size"
                );
            }
            if !window.is_empty() {
                if let Some(text) = join_window(&window, separator) {
                    merged.push(text);
                }
                while total > chunk_overlap
                    || (total + piece_len + if window.is_empty() { 0 } else { sep_len }
                        > chunk_size
                        && total > 0)
                {
                    total -= char_len(window[0]) + if window.len() > 1 { sep_len } else { 0 };
                    window.remove(0);
                }
            }
        }

        window.push(piece);
        total += piece_len + if window.len() > 1 { sep_len } else { 0 };
    }

    if let Some(text) = join_window(&window, separator) {
        merged.push(text);
    }

    merged
}

fn join_window(window: &[&str], separator: &str) -> Option<String> {
    let text = window.join(separator);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split_text("Hello, world!", 3500, 50);
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(split_text("", 3500, 50).is_empty());
        assert!(split_text("   \n\n  ", 3500, 50).is_empty());
    }

    #[test]
    fn test_short_multi_paragraph_text_stays_whole() {
        let text = "First paragraph.\n\nSecond paragraph.";
        let chunks = split_text(text, 3500, 50);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn test_word_level_windows_with_overlap() {
        let text = "one two three four five six seven eight nine ten";
        let chunks = split_text(text, 15, 5);
        assert_eq!(
            chunks,
            vec![
                "one two three".to_string(),
                "three four five".to_string(),
                "five six seven".to_string(),
                "seven eight".to_string(),
                "eight nine ten".to_string(),
            ]
        );
    }

    #[test]
    fn test_character_fallback_for_unbroken_text() {
        let chunks = split_text("abcdefghij", 3, 1);
        assert_eq!(chunks, vec!["abc", "cde", "efg", "ghi", "ij"]);
    }

    #[test]
    fn test_every_chunk_within_size() {
        let text = "Alpha beta gamma delta epsilon zeta eta theta iota kappa \
                    lambda mu nu xi omicron pi rho sigma tau upsilon phi chi psi omega";
        for chunk in split_text(text, 20, 6) {
            assert!(
                chunk.chars().count() <= 20,
                "chunk too long: {:?}",
                chunk
            );
        }
    }

    #[test]
    fn test_paragraphs_split_before_words() {
        let text = "aaa bbb ccc\n\nddd eee fff";
        let chunks = split_text(text, 14, 0);
        // Each paragraph fits on its own; the paragraph boundary wins.
        assert_eq!(chunks, vec!["aaa bbb ccc", "ddd eee fff"]);
    }

    #[test]
    fn test_multibyte_text_counted_in_chars() {
        let chunks = split_text("αβγδε", 2, 0);
        assert_eq!(chunks, vec!["αβ", "γδ", "ε"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "Alpha\n\nBeta gamma delta\n\nEpsilon zeta";
        let a = split_text(text, 12, 4);
        let b = split_text(text, 12, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_overlap_has_no_carryover() {
        let chunks = split_text("one two three four", 9, 0);
        assert_eq!(chunks, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_split_documents_tags_source() {
        let doc = RawDocument {
            source_path: PathBuf::from("data/notes.md"),
            content: "Some markdown body.".to_string(),
        };
        let segments = split_documents(&[doc], &ChunkingConfig::default());
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "Some markdown body.");
        assert_eq!(
            segments[0].metadata.get(SOURCE_KEY).map(String::as_str),
            Some("data/notes.md")
        );
    }
}
