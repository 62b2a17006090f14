//! Hugging Face `tokenizers` model files as a [`Tokenizer`]

use std::fmt;
use std::path::Path;

use super::{TokenSpan, Tokenizer};
use crate::error::{config_error, Error, Result};

/// Wraps a `tokenizer.json` model.
///
/// Encoding offsets don't always cover whitespace (or may overlap for
/// byte-level models); gaps are filled with their own spans and overlaps
/// clamped so the output covers the input contiguously.
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

impl HfTokenizer {
    pub fn load(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path).map_err(|e| {
            config_error(format!("cannot load tokenizer {}: {}", path.display(), e))
        })?;
        log::info!("loaded tokenizer model {}", path.display());
        Ok(Self { inner })
    }
}

impl fmt::Debug for HfTokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HfTokenizer")
            .field("vocab_size", &self.inner.get_vocab_size(true))
            .finish()
    }
}

impl Tokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenSpan>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| Error::Tokenizer(e.to_string()))?;

        let pieces = encoding.get_tokens();
        let offsets = encoding.get_offsets();
        Ok(fill_gaps(
            text,
            pieces
                .iter()
                .zip(offsets.iter())
                .map(|(piece, &(start, end))| (piece.as_str(), start, end)),
        ))
    }
}

/// Turns possibly gappy, possibly overlapping `(piece, start, end)` byte
/// offsets into contiguous spans covering `text`.
pub(crate) fn fill_gaps<'a, I>(text: &str, pieces: I) -> Vec<TokenSpan>
where
    I: IntoIterator<Item = (&'a str, usize, usize)>,
{
    let mut spans = Vec::new();
    let mut cursor = 0;

    for (piece, start, end) in pieces {
        let start = ceil_char_boundary(text, start.max(cursor));
        let end = ceil_char_boundary(text, end.max(start));
        if start > cursor {
            spans.push(TokenSpan::new(&text[cursor..start], cursor..start));
        }
        spans.push(TokenSpan::new(piece, start..end));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(TokenSpan::new(&text[cursor..], cursor..text.len()));
    }

    spans
}

fn ceil_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset += 1;
    }
    offset
}
