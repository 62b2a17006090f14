//! Synthetic noise records
//!
//! Teaches the model to copy through text it cannot translate: with the
//! configured probability a record is followed by a second record whose
//! source and target are the same string of random non-Latin words.

use rand::RngCore;
use serde::Deserialize;

use super::{roll, Modifier};
use crate::core::alignment::AlignmentSet;
use crate::core::record::Record;
use crate::core::unicode::random_noise_words;
use crate::error::{check_probability, config_error, Result};

/// Noise options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoiseOptions {
    /// Shortest noise word, in characters
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,
    /// Longest noise word, in characters
    #[serde(default = "default_max_word_length")]
    pub max_word_length: usize,
    /// Noise words per record are drawn from `1..=max_words`
    #[serde(default = "default_max_words")]
    pub max_words: usize,
}

fn default_min_word_length() -> usize {
    2
}

fn default_max_word_length() -> usize {
    5
}

fn default_max_words() -> usize {
    4
}

impl Default for NoiseOptions {
    fn default() -> Self {
        Self {
            min_word_length: default_min_word_length(),
            max_word_length: default_max_word_length(),
            max_words: default_max_words(),
        }
    }
}

impl NoiseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_word_length(mut self, min: usize, max: usize) -> Self {
        self.min_word_length = min;
        self.max_word_length = max;
        self
    }

    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.min_word_length == 0 {
            return Err(config_error("Noise min_word_length must be at least 1"));
        }
        if self.min_word_length > self.max_word_length {
            return Err(config_error(format!(
                "Noise min_word_length ({}) exceeds max_word_length ({})",
                self.min_word_length, self.max_word_length
            )));
        }
        if self.max_words == 0 {
            return Err(config_error("Noise max_words must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct NoiseModifier {
    probability: f64,
    options: NoiseOptions,
}

impl NoiseModifier {
    pub fn new(probability: f64, options: NoiseOptions) -> Result<Self> {
        let probability = check_probability("Noise", probability)?;
        options.validate()?;
        Ok(Self {
            probability,
            options,
        })
    }

    pub fn options(&self) -> &NoiseOptions {
        &self.options
    }
}

impl Modifier for NoiseModifier {
    fn name(&self) -> &'static str {
        "Noise"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn apply(&self, record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        if !roll(rng, self.probability) {
            return Ok(vec![record]);
        }

        let words = random_noise_words(
            rng,
            self.options.min_word_length,
            self.options.max_word_length,
            self.options.max_words,
        );
        let line = words.join(" ");

        let mut noise = Record::new(line.clone(), line);
        if record.alignment.is_some() {
            let identity = AlignmentSet::from_pairs((0..words.len()).map(|i| (i, i)));
            noise.alignment = Some(identity.to_string());
        }
        noise.extra = record.extra.clone();

        Ok(vec![record, noise])
    }
}
