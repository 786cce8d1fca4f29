//! Sliding-window chunking that prefers natural text boundaries.
//!
//! Each window is at most `chunk_size` characters. Before cutting at the hard
//! edge, the window is searched backwards for a paragraph break, then a line
//! break, then sentence and clause punctuation, then any space. The next window
//! starts `chunk_overlap` characters before the previous cut.

use super::{Chunk, Chunker, ChunkingConfig};
use crate::ingest::Document;

/// Break candidates in order of preference. A cut lands just after the separator.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", "! ", "? ", "; ", ", ", " ", "\t"];

/// Boundary-aware chunker.
#[derive(Debug, Clone, Default)]
pub struct RecursiveChunker {
    config: ChunkingConfig,
}

impl RecursiveChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        split_text(&document.content, &self.config)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Chunk::new(text, document.source_id.clone(), i))
            .collect()
    }
}

/// Split `text` into overlapping windows. Lengths are counted in characters.
///
/// Whitespace-only text yields no pieces.
pub fn split_text<'a>(text: &'a str, config: &ChunkingConfig) -> Vec<&'a str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let size = config.chunk_size();
    let overlap = config.chunk_overlap();

    // Byte offset of every character, plus the end of the text.
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let total = offsets.len() - 1;

    let mut pieces = Vec::new();
    let mut start = 0;

    loop {
        if total - start <= size {
            pieces.push(&text[offsets[start]..]);
            break;
        }

        let hard_end = start + size;
        // Never cut so early that the window stops making progress or shrinks below half.
        let floor = start + (size / 2).max(overlap + 1);
        let end = find_break(text, &offsets, floor, hard_end).unwrap_or(hard_end);

        pieces.push(&text[offsets[start]..offsets[end]]);
        start = end - overlap;
    }

    pieces
}

/// Find the preferred cut position (a character index) in `(floor, hard_end]`.
fn find_break(text: &str, offsets: &[usize], floor: usize, hard_end: usize) -> Option<usize> {
    if floor >= hard_end {
        return None;
    }

    let window_start = offsets[floor];
    let window = &text[window_start..offsets[hard_end]];

    SEPARATORS.iter().find_map(|sep| {
        window.rfind(sep).and_then(|pos| {
            let cut = window_start + pos + sep.len();
            offsets.binary_search(&cut).ok()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config(size: usize, overlap: usize) -> ChunkingConfig {
        ChunkingConfig::new(size, overlap).unwrap()
    }

    /// Rebuild the original text by dropping each chunk's leading overlap.
    fn reassemble(pieces: &[&str], overlap: usize) -> String {
        let mut out = String::new();
        for (i, piece) in pieces.iter().enumerate() {
            if i == 0 {
                out.push_str(piece);
            } else {
                out.extend(piece.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_short_text_is_one_chunk() {
        let text = "The capital of France is Paris.";
        let pieces = split_text(text, &ChunkingConfig::default());
        assert_eq!(pieces, vec![text]);
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(split_text("", &ChunkingConfig::default()).is_empty());
        assert!(split_text("  \n\t ", &ChunkingConfig::default()).is_empty());
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let first = "a".repeat(30);
        let second = "b".repeat(30);
        let text = format!("{}\n\n{}", first, second);

        let pieces = split_text(&text, &config(40, 0));

        assert_eq!(pieces[0], format!("{}\n\n", first));
        assert_eq!(pieces[1], second);
    }

    #[test]
    fn test_prefers_sentence_over_word() {
        let text = "One two three. Four five six seven eight nine ten eleven.";
        let pieces = split_text(text, &config(24, 0));
        assert_eq!(pieces[0], "One two three. ");
    }

    #[test]
    fn test_hard_cut_without_boundaries() {
        let text = "x".repeat(25);
        let pieces = split_text(&text, &config(10, 2));

        assert_eq!(pieces[0].len(), 10);
        assert_eq!(pieces[1].len(), 10);
        assert_eq!(reassemble(&pieces, 2), text);
    }

    #[test]
    fn test_overlap_is_shared_verbatim() {
        let text = "word ".repeat(100);
        let pieces = split_text(&text, &config(50, 10));

        for pair in pieces.windows(2) {
            let tail: String = pair[0].chars().rev().take(10).collect::<Vec<_>>().into_iter().rev().collect();
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn test_multibyte_characters_are_counted_as_characters() {
        let text = "é".repeat(15);
        let pieces = split_text(&text, &config(10, 3));

        assert_eq!(pieces[0].chars().count(), 10);
        assert_eq!(reassemble(&pieces, 3), text);
    }

    #[test]
    fn test_chunker_tags_source_and_sequence() {
        let chunker = RecursiveChunker::new(config(10, 2));
        let doc = Document::new("abcdefghijklmnopqrstuvwxyz", "alphabet.pdf");

        let chunks = chunker.chunk(&doc);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.source_id, "alphabet.pdf");
            assert_eq!(chunk.sequence_index, i);
            assert!(doc.content.contains(&chunk.text));
        }
    }

    fn text_and_config() -> impl Strategy<Value = (String, usize, usize)> {
        (2usize..60)
            .prop_flat_map(|size| (Just(size), 0..size))
            .prop_flat_map(|(size, overlap)| {
                ("[a-zé .,!?\n]{0,400}", Just(size), Just(overlap))
            })
    }

    proptest! {
        #[test]
        fn prop_chunks_reassemble_to_original((text, size, overlap) in text_and_config()) {
            let pieces = split_text(&text, &config(size, overlap));
            if text.trim().is_empty() {
                prop_assert!(pieces.is_empty());
            } else {
                prop_assert_eq!(reassemble(&pieces, overlap), text.clone());
            }
        }

        #[test]
        fn prop_chunks_respect_size((text, size, overlap) in text_and_config()) {
            let pieces = split_text(&text, &config(size, overlap));
            let min_len = ((size / 2).max(overlap + 1) + 1).min(size);
            for (i, piece) in pieces.iter().enumerate() {
                let len = piece.chars().count();
                prop_assert!(len <= size);
                if i + 1 < pieces.len() {
                    prop_assert!(len >= min_len);
                }
            }
        }

        #[test]
        fn prop_consecutive_chunks_overlap((text, size, overlap) in text_and_config()) {
            let pieces = split_text(&text, &config(size, overlap));
            for pair in pieces.windows(2) {
                let prev: Vec<char> = pair[0].chars().collect();
                let tail: String = prev[prev.len() - overlap..].iter().collect();
                prop_assert!(pair[1].starts_with(&tail));
            }
        }

        #[test]
        fn prop_segmentation_is_deterministic((text, size, overlap) in text_and_config()) {
            let first = split_text(&text, &config(size, overlap));
            let second = split_text(&text, &config(size, overlap));
            prop_assert_eq!(first, second);
        }
    }
}
