//! Built-in tokenizers
//!
//! Both produce contiguous spans that cover the whole input, whitespace
//! included.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{TokenSpan, Tokenizer};
use crate::core::words::word_spans;
use crate::error::{config_error, Result};

/// SentencePiece word boundary marker
pub const SPACE_MARKER: char = '\u{2581}';

/// One token per word; each token owns the whitespace in front of it.
/// Trailing whitespace becomes a token of its own.
#[derive(Debug, Clone, Default)]
pub struct SpaceTokenizer;

impl Tokenizer for SpaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenSpan>> {
        let mut tokens = Vec::new();
        let mut cursor = 0;

        for span in word_spans(text) {
            tokens.push(TokenSpan::new(&text[cursor..span.range.end], cursor..span.range.end));
            cursor = span.range.end;
        }
        if cursor < text.len() {
            tokens.push(TokenSpan::new(&text[cursor..], cursor..text.len()));
        }

        Ok(tokens)
    }
}

/// Greedy longest-match subword tokenizer over a SentencePiece-style vocab
///
/// Whitespace is matched as `▁`, so a piece like `▁is` covers " is".
/// A line that starts with a word matches as if a `▁` preceded it, so
/// `▁Hello` covers a leading "Hello" (the token span stays `0..5`).
/// Characters no piece covers become single-character tokens.
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    pieces: HashSet<String>,
    max_piece_chars: usize,
}

impl VocabTokenizer {
    pub fn from_pieces<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pieces: HashSet<String> = pieces
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| !p.is_empty())
            .collect();
        let max_piece_chars = pieces.iter().map(|p| p.chars().count()).max().unwrap_or(1);

        Self {
            pieces,
            max_piece_chars,
        }
    }

    /// Loads a vocab file: one `piece[\tscore]` per line.
    ///
    /// # Format
    /// ```text
    /// ▁This	-3.2
    /// ▁is	-2.9
    /// ```
    ///
    /// Binary SentencePiece models are rejected; export the vocab first
    /// (`spm_export_vocab`).
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            config_error(format!("cannot read vocab {}: {}", path.display(), e))
        })?;

        let pieces = content
            .lines()
            .filter_map(|line| line.split('\t').next())
            .map(str::to_string);

        let tokenizer = Self::from_pieces(pieces);
        if tokenizer.is_empty() {
            return Err(config_error(format!("vocab {} is empty", path.display())));
        }
        log::info!(
            "loaded {} subword pieces from {}",
            tokenizer.len(),
            path.display()
        );
        Ok(tokenizer)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Tokenizer for VocabTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenSpan>> {
        let prefixed = text.chars().next().is_some_and(|c| !c.is_whitespace());

        let mut offsets = Vec::with_capacity(text.len() + 1);
        let mut normalized = Vec::with_capacity(text.len() + 1);
        if prefixed {
            offsets.push(0);
            normalized.push(SPACE_MARKER);
        }
        for (offset, c) in text.char_indices() {
            offsets.push(offset);
            normalized.push(if c.is_whitespace() { SPACE_MARKER } else { c });
        }

        let mut tokens = Vec::new();
        let mut i = 0;
        while i < normalized.len() {
            // The dummy prefix never becomes a token by itself
            let dummy = prefixed && i == 0;
            let shortest = if dummy { 2 } else { 1 };
            let longest = self.max_piece_chars.min(normalized.len() - i);
            let matched = (shortest..=longest).rev().find_map(|len| {
                let candidate: String = normalized[i..i + len].iter().collect();
                self.pieces.contains(&candidate).then_some((len, candidate))
            });

            let (len, piece) = match matched {
                Some(found) => found,
                None if dummy => {
                    i += 1;
                    continue;
                }
                None => (1, normalized[i].to_string()),
            };

            let start = offsets[i];
            let end = offsets.get(i + len).copied().unwrap_or(text.len());
            tokens.push(TokenSpan::new(piece, start..end));
            i += len;
        }

        Ok(tokens)
    }
}
