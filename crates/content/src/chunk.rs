//! Size-bounded text chunking.

/// Split `text` into ordered chunks of at most `max_len` characters.
///
/// Splitting is purely positional: chunk `i` covers the half-open character
/// range `[i * max_len, (i + 1) * max_len)`. No attempt is made to avoid
/// splitting mid-word or mid-line; this is a deliberate simplicity
/// trade-off, not a defect. Offsets are counted in Unicode scalar values, so
/// a chunk boundary never lands inside an encoded character.
///
/// Concatenating the chunks in order reproduces `text` exactly. Empty input
/// yields an empty vector; input at or below `max_len` yields exactly one
/// chunk equal to the input.
///
/// # Panics
///
/// Panics if `max_len` is zero (precondition violation).
pub fn chunk(text: &str, max_len: usize) -> Vec<String> {
    assert!(max_len > 0, "max_len must be positive");

    let chars: Vec<char> = text.chars().collect();
    chars.chunks(max_len).map(|piece| piece.iter().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(chunk("", 1800).is_empty());
    }

    #[test]
    fn test_short_input_yields_single_chunk() {
        assert_eq!(chunk("hello", 1800), vec!["hello".to_string()]);
    }

    #[test]
    fn test_exact_boundary() {
        let text = "ab".repeat(5);
        assert_eq!(chunk(&text, 10), vec![text.clone()]);
        assert_eq!(chunk(&text, 5), vec!["ababa".to_string(), "babab".to_string()]);
    }

    #[test]
    fn test_chunk_count_law() {
        // ceil(5000 / 1800) = 3, with lengths 1800, 1800, 1400
        let text = "a".repeat(5000);
        let chunks = chunk(&text, 1800);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1800);
        assert_eq!(chunks[1].len(), 1800);
        assert_eq!(chunks[2].len(), 1400);
    }

    #[test]
    fn test_round_trip() {
        let samples = [
            "short",
            "line one\nline two\nline three",
            &"mixed content with spaces ".repeat(137),
        ];
        for text in samples {
            for max_len in [1, 2, 7, 100, 1800] {
                let joined: String = chunk(text, max_len).concat();
                assert_eq!(joined, text, "round-trip failed at max_len={max_len}");
            }
        }
    }

    #[test]
    fn test_multibyte_characters_counted_as_one() {
        let text = "héllo wörld ünïcode";
        let chunks = chunk(text, 4);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    #[should_panic(expected = "max_len must be positive")]
    fn test_zero_max_len_panics() {
        chunk("anything", 0);
    }
}
