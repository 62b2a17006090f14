//! Typo injection on the source side
//!
//! Each configured sub-edit is rolled independently, in configured order.
//! Edits that can change word boundaries go through the alignment-preserving
//! primitives whenever the record carries a usable alignment.

use std::fmt;

use rand::RngCore;
use serde_json::{Map, Value};

use super::{roll, Modifier};
use crate::core::alignment::AlignmentSet;
use crate::core::edits::{insert_space, remove_char, remove_space, EditOutcome};
use crate::core::record::{AlignmentState, Record};
use crate::core::words::word_count;
use crate::error::{check_probability, config_error, Error, Result};
use crate::typo::{CharEditor, TypoEdit, TypoEditor};

const DEFAULT_EDIT_PROBABILITY: f64 = 0.1;

pub struct TypoModifier {
    probability: f64,
    edits: Vec<(TypoEdit, f64)>,
    editor: Box<dyn CharEditor>,
}

impl fmt::Debug for TypoModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypoModifier")
            .field("probability", &self.probability)
            .field("edits", &self.edits)
            .finish_non_exhaustive()
    }
}

impl TypoModifier {
    /// `edits` empty means every sub-edit at 0.1.
    pub fn new(probability: f64, edits: Vec<(TypoEdit, f64)>) -> Result<Self> {
        let probability = check_probability("Typo", probability)?;
        let edits = if edits.is_empty() {
            TypoEdit::ALL
                .into_iter()
                .map(|edit| (edit, DEFAULT_EDIT_PROBABILITY))
                .collect()
        } else {
            edits
                .into_iter()
                .map(|(edit, p)| -> Result<(TypoEdit, f64)> {
                    Ok((edit, check_probability(edit.name(), p)?))
                })
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Self {
            probability,
            edits,
            editor: Box::new(TypoEditor::new()),
        })
    }

    /// Builds from configuration options: `{"char_swap": 0.2, ...}`.
    pub fn from_options(probability: f64, options: &Map<String, Value>) -> Result<Self> {
        let edits = options
            .iter()
            .map(|(name, value)| -> Result<(TypoEdit, f64)> {
                let edit: TypoEdit = name.parse().map_err(config_error)?;
                let p = value.as_f64().ok_or_else(|| {
                    config_error(format!("Typo modifier {} needs a numeric probability", name))
                })?;
                Ok((edit, p))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(probability, edits)
    }

    /// Swaps the character editor.
    pub fn with_editor(mut self, editor: Box<dyn CharEditor>) -> Self {
        self.editor = editor;
        self
    }

    pub fn edits(&self) -> &[(TypoEdit, f64)] {
        &self.edits
    }

    fn inconsistent(detail: String) -> Error {
        Error::InternalConsistency {
            modifier: "Typo",
            detail,
        }
    }
}

/// The alignment-preserving version of `edit`, if it has one.
fn aligned_edit(
    edit: TypoEdit,
    text: &str,
    alignment: &AlignmentSet,
    rng: &mut dyn RngCore,
) -> Option<EditOutcome> {
    match edit {
        TypoEdit::RandomSpace => Some(insert_space(text, alignment, false, rng)),
        TypoEdit::SkippedSpace => Some(remove_space(text, alignment, false, rng)),
        TypoEdit::MissingChar => Some(remove_char(text, alignment, rng)),
        _ => None,
    }
}

impl Modifier for TypoModifier {
    fn name(&self) -> &'static str {
        "Typo"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn apply(&self, mut record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        if !roll(rng, self.probability) {
            return Ok(vec![record]);
        }

        let mut word_edits_allowed = true;
        let mut alignment = match record.alignment_state() {
            AlignmentState::Valid(set) => Some(set),
            AlignmentState::Absent => {
                log::debug!("no alignment field, applying plain typos");
                None
            }
            AlignmentState::Empty => {
                log::warn!("empty alignment field, applying typos without alignment");
                None
            }
            AlignmentState::Invalid(e) => {
                log::warn!("invalid alignments ({}), skipping word-boundary typos", e);
                word_edits_allowed = false;
                None
            }
        };

        let mut text = record.source.clone();
        let mut expected_words = word_count(&text) as isize;

        for &(edit, p) in &self.edits {
            if !roll(rng, p) {
                continue;
            }

            if let Some(current) = alignment.as_ref() {
                if let Some(outcome) = aligned_edit(edit, &text, current, &mut *rng) {
                    expected_words += outcome.word_delta;
                    text = outcome.text;
                    alignment = Some(outcome.alignment);
                    continue;
                }
            }
            if edit.affects_words() && !word_edits_allowed {
                continue;
            }

            let before = word_count(&text);
            text = self.editor.edit(edit, &text, &mut *rng);
            let after = word_count(&text);
            if alignment.is_some() && after != before {
                return Err(Self::inconsistent(format!(
                    "{} changed the word count ({} -> {}) without updating the alignment",
                    edit, before, after
                )));
            }
        }

        if let Some(alignment) = alignment {
            let words = word_count(&text);
            if words as isize != expected_words {
                return Err(Self::inconsistent(format!(
                    "expected {} source words after edits, found {}",
                    expected_words, words
                )));
            }
            alignment
                .validate(words, word_count(&record.target))
                .map_err(|e| Self::inconsistent(e.to_string()))?;
            record.alignment = Some(alignment.to_string());
        }
        record.source = text;

        Ok(vec![record])
    }
}
