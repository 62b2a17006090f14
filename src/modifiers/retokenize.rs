//! Detokenize + retokenize both sides of a record
//!
//! Word alignments are projected onto the new token indices, so after this
//! modifier the alignment field counts tokens, not words.

use rand::RngCore;
use serde::Deserialize;

use super::{roll, Modifier};
use crate::core::alignment::AlignmentSet;
use crate::core::record::{AlignmentState, Record};
use crate::error::{check_probability, Result};
use crate::tokenize::{project_alignment, TextCodec};

/// How to render one side: `{"detokenize": "moses:en", "tokenize": "spm:vocab.spm"}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideOptions {
    #[serde(default = "default_identifier")]
    pub detokenize: String,
    #[serde(default = "default_identifier")]
    pub tokenize: String,
}

fn default_identifier() -> String {
    "spaces".to_string()
}

impl Default for SideOptions {
    fn default() -> Self {
        Self {
            detokenize: default_identifier(),
            tokenize: default_identifier(),
        }
    }
}

impl SideOptions {
    pub fn new(detokenize: impl Into<String>, tokenize: impl Into<String>) -> Self {
        Self {
            detokenize: detokenize.into(),
            tokenize: tokenize.into(),
        }
    }

    fn codec(&self) -> Result<TextCodec> {
        TextCodec::from_names(&self.detokenize, &self.tokenize)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetokenizeOptions {
    #[serde(default)]
    pub src: SideOptions,
    #[serde(default)]
    pub trg: SideOptions,
}

/// Source and target codecs of a record
#[derive(Debug, Default)]
pub(crate) struct RecordCodec {
    pub source: TextCodec,
    pub target: TextCodec,
}

impl RecordCodec {
    pub fn new(source: TextCodec, target: TextCodec) -> Self {
        Self { source, target }
    }

    /// Renders word lists, projecting `alignment` onto the tokens.
    pub fn render<S, T>(
        &self,
        source: &[S],
        target: &[T],
        alignment: &AlignmentSet,
    ) -> Result<(String, String, AlignmentSet)>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let source = self.source.render(source)?;
        let target = self.target.render(target)?;
        let projected = project_alignment(alignment, &source, &target);
        Ok((source.text, target.text, projected))
    }

    /// Detokenizes both sides of `record` without touching the alignment.
    pub fn detokenize(&self, record: &mut Record) {
        record.source = self.source.detokenize(&record.source);
        record.target = self.target.detokenize(&record.target);
    }
}

#[derive(Debug)]
pub struct RetokenizeModifier {
    probability: f64,
    codec: RecordCodec,
}

impl RetokenizeModifier {
    pub fn new(probability: f64, options: RetokenizeOptions) -> Result<Self> {
        let probability = check_probability("Retokenize", probability)?;
        let codec = RecordCodec::new(options.src.codec()?, options.trg.codec()?);
        Ok(Self { probability, codec })
    }

    pub fn with_codecs(probability: f64, source: TextCodec, target: TextCodec) -> Result<Self> {
        let probability = check_probability("Retokenize", probability)?;
        Ok(Self {
            probability,
            codec: RecordCodec::new(source, target),
        })
    }
}

impl Modifier for RetokenizeModifier {
    fn name(&self) -> &'static str {
        "Retokenize"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn apply(&self, mut record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        if !roll(rng, self.probability) {
            return Ok(vec![record]);
        }

        match record.alignment_state() {
            AlignmentState::Valid(alignment) => {
                let (source, target, projected) = self.codec.render(
                    &record.source_words(),
                    &record.target_words(),
                    &alignment,
                )?;
                record.source = source;
                record.target = target;
                record.alignment = Some(projected.to_string());
            }
            AlignmentState::Absent => {
                log::warn!("missing alignment field, detokenizing only");
                self.codec.detokenize(&mut record);
            }
            AlignmentState::Empty => {
                log::warn!("empty alignment field");
                self.codec.detokenize(&mut record);
            }
            AlignmentState::Invalid(e) => {
                log::warn!("invalid alignments ({}), dropping the alignment field", e);
                self.codec.detokenize(&mut record);
                record.alignment = None;
            }
        }

        Ok(vec![record])
    }
}
