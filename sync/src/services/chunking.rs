/// Recursive character text splitting for project descriptions.
///
/// Splits on paragraph, then line, then word boundaries, and merges the
/// resulting pieces back into chunks of at most `chunk_size` characters,
/// carrying up to `chunk_overlap` trailing characters of context into the
/// next chunk.
#[derive(Debug, Clone)]
pub struct TextSplitterConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for TextSplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
        }
    }
}

const SEPARATORS: &[&str] = &["\n\n", "\n", " "];

pub fn chunk_text(content: &str, config: &TextSplitterConfig) -> Vec<String> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let pieces = split_recursive(content, SEPARATORS, config.chunk_size);
    merge_pieces(pieces, config)
}

/// Break text into pieces no longer than `size`, preferring the coarsest
/// separator that gets the job done. Text with no usable separator left is
/// hard-split on character boundaries.
fn split_recursive(text: &str, separators: &[&str], size: usize) -> Vec<String> {
    if char_len(text) <= size {
        return vec![text.to_string()];
    }

    let (separator, rest) = match separators.split_first() {
        Some((sep, rest)) => (*sep, rest),
        None => return hard_split(text, size),
    };

    let mut pieces = Vec::new();
    for part in text.split(separator) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if char_len(part) <= size {
            pieces.push(part.to_string());
        } else {
            pieces.extend(split_recursive(part, rest, size));
        }
    }
    pieces
}

/// Greedily pack pieces into chunks, retaining a tail of previous pieces as
/// overlap when a chunk fills up.
fn merge_pieces(pieces: Vec<String>, config: &TextSplitterConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: Vec<String> = Vec::new();
    let mut window_len = 0usize;

    for piece in pieces {
        let piece_len = char_len(&piece);
        let joiners = window.len(); // one space per joined piece
        if window_len + joiners + piece_len > config.chunk_size && !window.is_empty() {
            chunks.push(window.join(" "));
            while window_len > config.chunk_overlap && !window.is_empty() {
                let removed = window.remove(0);
                window_len -= char_len(&removed);
            }
        }
        window_len += piece_len;
        window.push(piece);
    }

    if !window.is_empty() {
        let last = window.join(" ");
        // A pure-overlap remainder would duplicate the previous chunk's tail.
        if chunks.last().map_or(true, |prev: &String| !prev.ends_with(&last)) {
            chunks.push(last);
        }
    }

    chunks
}

fn hard_split(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size.max(1))
        .map(|c| c.iter().collect::<String>())
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(chunk_size: usize, chunk_overlap: usize) -> TextSplitterConfig {
        TextSplitterConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_short_text_is_a_single_chunk() {
        let chunks = chunk_text(
            "This project helps protect rainforests.",
            &TextSplitterConfig::default(),
        );
        assert_eq!(chunks, vec!["This project helps protect rainforests."]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(chunk_text("", &TextSplitterConfig::default()).is_empty());
        assert!(chunk_text("   \n\n ", &TextSplitterConfig::default()).is_empty());
    }

    #[test]
    fn test_chunks_respect_size_bound() {
        let text = "solar water wind forest river ocean desert tundra meadow valley ".repeat(20);
        let cfg = config(64, 16);
        let chunks = chunk_text(&text, &cfg);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 64, "oversized chunk: {:?}", chunk);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";
        let cfg = config(30, 12);
        let chunks = chunk_text(&text, &cfg);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail_word = pair[0].split_whitespace().last().unwrap();
            assert!(
                pair[1].contains(tail_word),
                "chunk {:?} shares no overlap with {:?}",
                pair[1],
                pair[0]
            );
        }
    }

    #[test]
    fn test_splitting_is_deterministic() {
        let text = "one two three four five six seven eight nine ten ".repeat(30);
        let cfg = config(100, 20);
        assert_eq!(chunk_text(&text, &cfg), chunk_text(&text, &cfg));
    }

    #[test]
    fn test_unbroken_text_is_hard_split() {
        let text = "x".repeat(1000);
        let cfg = config(128, 0);
        let chunks = chunk_text(&text, &cfg);

        assert!(chunks.len() >= 8);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 128);
        }
    }

    #[test]
    fn test_paragraph_boundaries_are_preferred() {
        let text = format!("{}\n\n{}", "a".repeat(40), "b".repeat(40));
        let cfg = config(64, 0);
        let chunks = chunk_text(&text, &cfg);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].chars().all(|c| c == 'a'));
        assert!(chunks[1].chars().all(|c| c == 'b'));
    }
}
