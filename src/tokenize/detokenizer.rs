//! Rule-based detokenizers
//!
//! Detokenizers only ever remove or normalise whitespace; the characters of
//! every word survive, which is what lets [`locate_words`] find them again.

use std::ops::Range;

use super::Detokenizer;

/// Collapses all whitespace runs to single spaces
#[derive(Debug, Clone, Default)]
pub struct SpaceDetokenizer;

impl Detokenizer for SpaceDetokenizer {
    fn detokenize(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

/// Language-aware detokenizer in the spirit of the Moses rules
///
/// - no space before closing punctuation (`.`, `,`, `!`, `?`, ...)
/// - no space after opening brackets
/// - English clitics (`'s`, `n't`, ...) attach to the previous word
/// - for Chinese and Japanese, no space between two CJK characters
#[derive(Debug, Clone)]
pub struct RuleDetokenizer {
    lang: String,
}

impl RuleDetokenizer {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    fn joins_cjk(&self) -> bool {
        matches!(self.lang.as_str(), "zh" | "ja")
    }

    fn needs_space(&self, prev: &str, word: &str) -> bool {
        if word.chars().all(is_closing_punct) {
            return false;
        }
        if prev.chars().all(is_opening_punct) {
            return false;
        }
        if self.lang == "en" && is_english_clitic(word) {
            return false;
        }
        if self.joins_cjk() {
            let last = prev.chars().next_back();
            let first = word.chars().next();
            if let (Some(last), Some(first)) = (last, first) {
                if is_cjk(last) && is_cjk(first) {
                    return false;
                }
            }
        }
        true
    }
}

impl Detokenizer for RuleDetokenizer {
    fn detokenize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut prev: Option<&str> = None;

        for word in text.split_whitespace() {
            if let Some(prev) = prev {
                if self.needs_space(prev, word) {
                    out.push(' ');
                }
            }
            out.push_str(word);
            prev = Some(word);
        }

        out
    }
}

fn is_closing_punct(c: char) -> bool {
    matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '%' | ')' | ']' | '}' | '»')
}

fn is_opening_punct(c: char) -> bool {
    matches!(c, '(' | '[' | '{' | '«' | '¿' | '¡')
}

fn is_english_clitic(word: &str) -> bool {
    matches!(
        word.to_lowercase().as_str(),
        "'s" | "'re" | "'ve" | "'ll" | "'d" | "'m" | "n't"
    )
}

/// CJK ideographs, kana, CJK punctuation and fullwidth forms
pub fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x3000..=0x303F     // CJK symbols and punctuation
        | 0x3040..=0x30FF   // Hiragana, Katakana
        | 0x3400..=0x4DBF   // Extension A
        | 0x4E00..=0x9FFF   // Unified ideographs
        | 0xF900..=0xFAFF   // Compatibility ideographs
        | 0xFF00..=0xFFEF   // Fullwidth forms
        | 0x20000..=0x2A6DF // Extension B
    )
}

/// Finds each of `words` in `text`, in order, returning their byte ranges.
///
/// Words are matched left to right after skipping whitespace. A word that
/// can't be found gets an empty range at the current position.
pub fn locate_words<S: AsRef<str>>(text: &str, words: &[S]) -> Vec<Range<usize>> {
    let mut spans = Vec::with_capacity(words.len());
    let mut cursor = 0;

    for word in words {
        let word = word.as_ref();
        let rest = &text[cursor..];
        let skipped = rest.len() - rest.trim_start().len();
        let start = cursor + skipped;

        if text[start..].starts_with(word) {
            spans.push(start..start + word.len());
            cursor = start + word.len();
        } else if let Some(found) = text[cursor..].find(word) {
            let start = cursor + found;
            spans.push(start..start + word.len());
            cursor = start + word.len();
        } else {
            log::debug!("word '{}' not found after detokenization", word);
            spans.push(cursor..cursor);
        }
    }

    spans
}
