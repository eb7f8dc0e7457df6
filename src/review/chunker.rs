//! Word-boundary chunking for oversized diffs.

/// A bounded-size slice of the diff text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffChunk {
    /// Zero-based position of this chunk in the original word sequence.
    pub index: usize,
    /// Chunk text, words joined by single spaces.
    pub text: String,
}

/// Split `text` on whitespace into chunks of at most `max_words` words.
///
/// A text of N words yields ceil(N / max_words) chunks; joining the chunk
/// texts with single spaces reconstructs the original word sequence.
/// Empty or whitespace-only input yields no chunks.
pub fn split_words(text: &str, max_words: usize) -> Vec<DiffChunk> {
    let max_words = max_words.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(max_words)
        .enumerate()
        .map(|(index, chunk)| DiffChunk {
            index,
            text: chunk.join(" "),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_text(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_count_is_ceiling_division() {
        for (n, w, expected) in [
            (10, 3, 4),
            (10, 5, 2),
            (10, 10, 1),
            (10, 11, 1),
            (1, 1, 1),
            (11, 3, 4),
        ] {
            let chunks = split_words(&word_text(n), w);
            assert_eq!(chunks.len(), expected, "n={n} w={w}");
        }
    }

    #[test]
    fn test_concatenation_reconstructs_word_sequence() {
        let text = "  one\ttwo\n three   four five\nsix ";
        let chunks = split_words(text, 2);

        let joined = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let expected = text.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_indices_are_sequential() {
        let chunks = split_words(&word_text(9), 2);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split_words("", 100).is_empty());
        assert!(split_words("   \n\t  ", 100).is_empty());
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        let chunks = split_words("one two three", 0);
        assert_eq!(chunks.len(), 3);
    }

    #[test]
    fn test_last_chunk_holds_the_remainder() {
        let chunks = split_words(&word_text(7), 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.split_whitespace().count(), 3);
        assert_eq!(chunks[2].text.split_whitespace().count(), 1);
    }
}
