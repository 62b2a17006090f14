//! Detokenize / retokenize adapters
//!
//! Records carry whitespace-separated words. Before training they are
//! rendered into "natural" text by a [`Detokenizer`] and then split into
//! subword tokens by a [`Tokenizer`]. [`TextCodec::render`] does both and
//! keeps track of which word every token came from, so word alignments can
//! be projected onto tokens (see [`project_alignment`]).

pub mod detokenizer;
pub mod hf;
mod remap;
pub mod tokenizer;

use std::fmt;
use std::ops::Range;
use std::path::Path;

pub use detokenizer::{locate_words, RuleDetokenizer, SpaceDetokenizer};
pub use hf::HfTokenizer;
pub use remap::project_alignment;
pub use tokenizer::{SpaceTokenizer, VocabTokenizer, SPACE_MARKER};

use crate::error::{config_error, Result};

/// One token with its byte range in the tokenized text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub piece: String,
    pub range: Range<usize>,
}

impl TokenSpan {
    pub fn new(piece: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            piece: piece.into(),
            range,
        }
    }
}

/// Splits text into tokens.
///
/// Output spans must be contiguous, non-overlapping and cover the whole
/// input, whitespace included.
pub trait Tokenizer: Send + Sync + fmt::Debug {
    fn tokenize(&self, text: &str) -> Result<Vec<TokenSpan>>;
}

/// Turns whitespace-separated words into natural text.
///
/// May only drop or normalise whitespace; word characters are kept as-is.
pub trait Detokenizer: Send + Sync + fmt::Debug {
    fn detokenize(&self, text: &str) -> String;
}

/// Parses a detokenizer identifier: `spaces`, `moses:<lang>` or a bare
/// language code.
pub fn detokenizer_from_name(name: &str) -> Result<Box<dyn Detokenizer>> {
    let name = name.trim();
    if name.is_empty() || name == "spaces" {
        return Ok(Box::new(SpaceDetokenizer));
    }

    let lang = name.strip_prefix("moses:").unwrap_or(name);
    if is_language_code(lang) {
        Ok(Box::new(RuleDetokenizer::new(lang)))
    } else {
        Err(config_error(format!("Unknown detokenizer: {}", name)))
    }
}

/// Parses a tokenizer identifier: `spaces`, `spm:<path>`, `vocab:<path>`,
/// `hf:<path>` or a path ending in `.json`.
pub fn tokenizer_from_name(name: &str) -> Result<Box<dyn Tokenizer>> {
    let name = name.trim();
    if name.is_empty() || name == "spaces" {
        return Ok(Box::new(SpaceTokenizer));
    }

    if let Some(path) = name.strip_prefix("spm:").or_else(|| name.strip_prefix("vocab:")) {
        return Ok(Box::new(VocabTokenizer::load(Path::new(path))?));
    }
    if let Some(path) = name.strip_prefix("hf:") {
        return Ok(Box::new(HfTokenizer::load(Path::new(path))?));
    }
    if name.ends_with(".json") {
        return Ok(Box::new(HfTokenizer::load(Path::new(name))?));
    }

    Err(config_error(format!("Unknown tokenizer: {}", name)))
}

/// Picks the tokenizer for a bare vocab path by its extension.
pub fn tokenizer_for_vocab_path(path: &Path) -> Result<Box<dyn Tokenizer>> {
    if path.extension().is_some_and(|ext| ext == "json") {
        Ok(Box::new(HfTokenizer::load(path)?))
    } else {
        Ok(Box::new(VocabTokenizer::load(path)?))
    }
}

fn is_language_code(s: &str) -> bool {
    (2..=3).contains(&s.len()) && s.chars().all(|c| c.is_ascii_lowercase())
}

/// Words rendered to natural text and tokenized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub tokens: Vec<TokenSpan>,
    /// Byte range of every input word in `text`
    pub word_ranges: Vec<Range<usize>>,
    /// Word each token belongs to; `None` for whitespace-only tokens
    pub token_words: Vec<Option<usize>>,
    /// Tokens of each word, ascending
    pub word_tokens: Vec<Vec<usize>>,
}

impl Rendered {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// A detokenizer/tokenizer pair for one side of a record
#[derive(Debug)]
pub struct TextCodec {
    detokenizer: Box<dyn Detokenizer>,
    tokenizer: Box<dyn Tokenizer>,
}

impl Default for TextCodec {
    fn default() -> Self {
        Self::spaces()
    }
}

impl TextCodec {
    pub fn new(detokenizer: Box<dyn Detokenizer>, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            detokenizer,
            tokenizer,
        }
    }

    /// Whitespace in, whitespace out: tokens are the words themselves.
    pub fn spaces() -> Self {
        Self::new(Box::new(SpaceDetokenizer), Box::new(SpaceTokenizer))
    }

    pub fn from_names(detokenizer: &str, tokenizer: &str) -> Result<Self> {
        Ok(Self::new(
            detokenizer_from_name(detokenizer)?,
            tokenizer_from_name(tokenizer)?,
        ))
    }

    pub fn detokenize(&self, text: &str) -> String {
        self.detokenizer.detokenize(text)
    }

    /// Detokenizes `words` and tokenizes the result.
    ///
    /// A token belongs to the word holding its first non-whitespace
    /// character. A word that holds no token start (it sits inside a token
    /// that began in an earlier word) borrows the tokens overlapping it.
    pub fn render<S: AsRef<str>>(&self, words: &[S]) -> Result<Rendered> {
        let joined = words
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        let text = self.detokenizer.detokenize(&joined);
        let word_ranges = locate_words(&text, words);
        let tokens = self.tokenizer.tokenize(&text)?;

        let token_words: Vec<Option<usize>> = tokens
            .iter()
            .map(|token| {
                let first = first_non_space(&text, &token.range)?;
                word_ranges.iter().position(|r| r.contains(&first))
            })
            .collect();

        let mut word_tokens = vec![Vec::new(); words.len()];
        for (token, word) in token_words.iter().enumerate() {
            if let Some(word) = word {
                word_tokens[*word].push(token);
            }
        }
        for (word, range) in word_ranges.iter().enumerate() {
            if word_tokens[word].is_empty() && !range.is_empty() {
                word_tokens[word] = tokens
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.range.start < range.end && range.start < t.range.end)
                    .map(|(i, _)| i)
                    .collect();
            }
        }

        Ok(Rendered {
            text,
            tokens,
            word_ranges,
            token_words,
            word_tokens,
        })
    }
}

fn first_non_space(text: &str, range: &Range<usize>) -> Option<usize> {
    let slice = text.get(range.clone())?;
    slice
        .char_indices()
        .find(|(_, c)| !c.is_whitespace() && *c != SPACE_MARKER)
        .map(|(i, _)| range.start + i)
}
