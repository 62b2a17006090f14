//! Upper- and title-casing of whole records
//!
//! Both sides are recased together. Word boundaries never move, so the
//! alignment field is left as it is.

use rand::RngCore;

use super::{roll, Modifier};
use crate::core::record::Record;
use crate::error::{check_probability, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStyle {
    Upper,
    Title,
}

#[derive(Debug, Clone)]
pub struct CaseModifier {
    style: CaseStyle,
    probability: f64,
}

impl CaseModifier {
    pub fn new(style: CaseStyle, probability: f64) -> Result<Self> {
        let probability = check_probability(style_name(style), probability)?;
        Ok(Self { style, probability })
    }

    pub fn style(&self) -> CaseStyle {
        self.style
    }

    fn recase(&self, text: &str) -> String {
        match self.style {
            CaseStyle::Upper => map_words(text, upper_word),
            CaseStyle::Title => map_words(text, title_word),
        }
    }
}

fn style_name(style: CaseStyle) -> &'static str {
    match style {
        CaseStyle::Upper => "UpperCase",
        CaseStyle::Title => "TitleCase",
    }
}

/// Applies `f` to every word, keeping the whitespace between words intact.
///
/// Case mappings can change a word's length (`ß` → `SS`) but never introduce
/// whitespace, so the word count is preserved.
fn map_words(text: &str, f: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                out.push_str(&f(&text[start..i]));
            }
            out.push(c);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        out.push_str(&f(&text[start..]));
    }

    out
}

fn upper_word(word: &str) -> String {
    word.to_uppercase()
}

fn title_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

impl Modifier for CaseModifier {
    fn name(&self) -> &'static str {
        style_name(self.style)
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn apply(&self, mut record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        if roll(rng, self.probability) {
            record.source = self.recase(&record.source);
            record.target = self.recase(&record.target);
        }
        Ok(vec![record])
    }
}
