//! Whitespace word boundaries
//!
//! Offsets are UTF-8 byte offsets into the indexed string and always sit on
//! char boundaries.

use std::ops::Range;

/// One whitespace-delimited word: its byte range and ordinal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub index: usize,
    pub range: Range<usize>,
}

impl WordSpan {
    pub fn len(&self) -> usize {
        self.range.end - self.range.start
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.range.contains(&offset)
    }
}

/// Word spans of `text`, in order
pub fn word_spans(text: &str) -> Vec<WordSpan> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push(WordSpan {
                    index: spans.len(),
                    range: s..i,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push(WordSpan {
            index: spans.len(),
            range: s..text.len(),
        });
    }

    spans
}

/// Number of whitespace-delimited words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Index of the word containing byte `offset`, if any
pub fn word_at(text: &str, offset: usize) -> Option<usize> {
    word_spans(text)
        .into_iter()
        .find(|span| span.contains(offset))
        .map(|span| span.index)
}

/// Byte offsets of every non-whitespace character
pub fn non_space_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .filter(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .collect()
}

/// Byte offsets of every whitespace character
pub fn space_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_spans() {
        let spans = word_spans("  ab c\tdef ");
        let ranges: Vec<_> = spans.iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, vec![2..4, 5..6, 7..10]);
        assert_eq!(spans[2].index, 2);
    }

    #[test]
    fn test_word_spans_multibyte() {
        let text = "这 是 🤣.";
        let spans = word_spans(text);
        assert_eq!(spans.len(), 3);
        assert_eq!(&text[spans[2].range.clone()], "🤣.");
    }

    #[test]
    fn test_word_count_matches_spans() {
        for text in ["", " ", "a", "a b", " a  b ", "a\u{3000}b"] {
            assert_eq!(word_count(text), word_spans(text).len(), "{:?}", text);
        }
    }

    #[test]
    fn test_word_at() {
        assert_eq!(word_at("ab cd", 0), Some(0));
        assert_eq!(word_at("ab cd", 2), None);
        assert_eq!(word_at("ab cd", 4), Some(1));
    }

    #[test]
    fn test_offsets() {
        assert_eq!(non_space_offsets("a b"), vec![0, 2]);
        assert_eq!(space_offsets("a b "), vec![1, 3]);
    }
}
