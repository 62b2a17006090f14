//! Placeholder tagging
//!
//! Teaches the model to copy through a hinted translation. For a chosen
//! one-to-one aligned word pair the source becomes
//!
//! ```text
//! __source__ Hello __target__ Hallo __done__ world
//! ```
//!
//! and the target is left as it is. Afterwards both sides are detokenized
//! and retokenized, and the alignment is projected onto the new tokens.
//!
//! Three modes, drawn once per record:
//! - tag: inline the aligned target word
//! - replace: inline a random noise word instead of the target word
//! - augment: no markers, insert the same noise words after the chosen
//!   source word and after its target word

use std::path::PathBuf;

use rand::{Rng, RngCore};
use serde::Deserialize;

use super::retokenize::RecordCodec;
use super::{roll, Modifier};
use crate::core::alignment::AlignmentSet;
use crate::core::record::{AlignmentState, Record};
use crate::core::unicode::noise_words;
use crate::error::{check_probability, config_error, Result};
use crate::tokenize::{
    detokenizer_from_name, tokenizer_for_vocab_path, SpaceTokenizer, TextCodec, Tokenizer,
};

pub const SOURCE_MARKER: &str = "__source__";
pub const TARGET_MARKER: &str = "__target__";
pub const DONE_MARKER: &str = "__done__";

const NOISE_MIN_LENGTH: usize = 2;
const NOISE_MAX_LENGTH: usize = 5;
const MAX_AUGMENT_WORDS: usize = 3;

/// Tag options
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagOptions {
    /// Share of tagged records in replace mode
    #[serde(default)]
    pub replace: f64,
    /// Share of tagged records in augment mode
    #[serde(default)]
    pub augment: f64,
    /// Detokenizer identifier for the source side, plain spaces if unset
    #[serde(default, alias = "custom_detok_src")]
    pub source_detokenizer: Option<String>,
    #[serde(default, alias = "custom_detok_trg")]
    pub target_detokenizer: Option<String>,
    /// Subword vocab shared by both sides; whitespace tokens if unset
    #[serde(default, alias = "spm_vocab")]
    pub subword_vocab_path: Option<PathBuf>,
}

impl TagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modes(mut self, replace: f64, augment: f64) -> Self {
        self.replace = replace;
        self.augment = augment;
        self
    }

    pub fn with_detokenizers(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_detokenizer = Some(source.into());
        self.target_detokenizer = Some(target.into());
        self
    }

    pub fn with_vocab(mut self, path: impl Into<PathBuf>) -> Self {
        self.subword_vocab_path = Some(path.into());
        self
    }

    fn codec(&self) -> Result<RecordCodec> {
        let side = |detokenizer: &Option<String>| -> Result<TextCodec> {
            let detokenizer = detokenizer_from_name(detokenizer.as_deref().unwrap_or("spaces"))?;
            let tokenizer: Box<dyn Tokenizer> = match &self.subword_vocab_path {
                Some(path) => tokenizer_for_vocab_path(path)?,
                None => Box::new(SpaceTokenizer),
            };
            Ok(TextCodec::new(detokenizer, tokenizer))
        };
        Ok(RecordCodec::new(
            side(&self.source_detokenizer)?,
            side(&self.target_detokenizer)?,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMode {
    Tag,
    Replace,
    Augment,
}

#[derive(Debug)]
pub struct PlaceholderTagModifier {
    probability: f64,
    replace: f64,
    augment: f64,
    codec: RecordCodec,
}

impl PlaceholderTagModifier {
    pub fn new(probability: f64, options: TagOptions) -> Result<Self> {
        let probability = check_probability("Tags", probability)?;
        let replace = check_probability("Tags replace", options.replace)?;
        let augment = check_probability("Tags augment", options.augment)?;
        if replace + augment > 1.0 + f64::EPSILON {
            return Err(config_error(format!(
                "Tags replace ({}) and augment ({}) add up to more than 1.0",
                replace, augment
            )));
        }

        Ok(Self {
            probability,
            replace,
            augment,
            codec: options.codec()?,
        })
    }

    fn pick_mode(&self, rng: &mut dyn RngCore) -> TagMode {
        let draw: f64 = rng.gen();
        if draw < self.replace {
            TagMode::Replace
        } else if draw < self.replace + self.augment {
            TagMode::Augment
        } else {
            TagMode::Tag
        }
    }

    /// Renders the record without tagging and drops its alignment field.
    fn passthrough(&self, mut record: Record) -> Vec<Record> {
        self.codec.detokenize(&mut record);
        record.alignment = None;
        vec![record]
    }
}

/// Wraps source word `i` as `open word mid inline close`. When
/// `inline_target` is set the inlined word is aligned to that target word.
/// Returns the index after the closing marker.
fn insert_tagged(
    source: &mut Vec<String>,
    alignment: &mut AlignmentSet,
    i: usize,
    inline: String,
    inline_target: Option<usize>,
) -> usize {
    source.insert(i, SOURCE_MARKER.to_string());
    alignment.insert_source_words(i, 1);

    source.insert(i + 2, TARGET_MARKER.to_string());
    source.insert(i + 3, inline);
    source.insert(i + 4, DONE_MARKER.to_string());
    alignment.insert_source_words(i + 2, 3);

    if let Some(t) = inline_target {
        alignment.push(i + 3, t);
    }
    i + 5
}

/// Inserts the same noise words after source word `i` and target word `t`,
/// aligned to each other. Returns the index after the inserted words.
fn insert_noise(
    source: &mut Vec<String>,
    target: &mut Vec<String>,
    alignment: &mut AlignmentSet,
    i: usize,
    t: usize,
    noise: Vec<String>,
) -> usize {
    let count = noise.len();
    for (j, word) in noise.into_iter().enumerate() {
        source.insert(i + 1 + j, word.clone());
        target.insert(t + 1 + j, word);
    }
    alignment.insert_source_words(i + 1, count);
    alignment.insert_target_words(t + 1, count);
    for j in 1..=count {
        alignment.push(i + j, t + j);
    }
    i + 1 + count
}

impl Modifier for PlaceholderTagModifier {
    fn name(&self) -> &'static str {
        "Tags"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn apply(&self, mut record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        let mut alignment = match record.alignment_state() {
            AlignmentState::Valid(alignment) => alignment,
            AlignmentState::Absent => {
                log::warn!("missing alignment field, not tagging");
                return Ok(self.passthrough(record));
            }
            AlignmentState::Empty => {
                log::warn!("empty alignment field, not tagging");
                return Ok(self.passthrough(record));
            }
            AlignmentState::Invalid(e) => {
                log::warn!("invalid alignments ({}), not tagging", e);
                return Ok(self.passthrough(record));
            }
        };

        let mut source: Vec<String> = record.source_words().into_iter().map(String::from).collect();
        let mut target: Vec<String> = record.target_words().into_iter().map(String::from).collect();
        let mode = self.pick_mode(rng);

        let mut i = 0;
        while i < source.len() {
            let Some(t) = alignment.one_to_one_target(i) else {
                i += 1;
                continue;
            };
            if !roll(rng, self.probability) {
                i += 1;
                continue;
            }

            i = match mode {
                TagMode::Tag => {
                    let inline = target[t].clone();
                    insert_tagged(&mut source, &mut alignment, i, inline, Some(t))
                }
                TagMode::Replace => {
                    let inline = noise_words(rng, 1, NOISE_MIN_LENGTH, NOISE_MAX_LENGTH).join(" ");
                    insert_tagged(&mut source, &mut alignment, i, inline, None)
                }
                TagMode::Augment => {
                    let count = rng.gen_range(1..=MAX_AUGMENT_WORDS);
                    let noise = noise_words(rng, count, NOISE_MIN_LENGTH, NOISE_MAX_LENGTH);
                    insert_noise(&mut source, &mut target, &mut alignment, i, t, noise)
                }
            };
        }

        let (source, target, projected) = self.codec.render(&source, &target, &alignment)?;
        record.source = source;
        record.target = target;
        record.alignment = Some(projected.to_string());

        Ok(vec![record])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unicode::is_noise_char;
    use crate::test_log::capture_warnings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn tagger(probability: f64, options: TagOptions) -> PlaceholderTagModifier {
        PlaceholderTagModifier::new(probability, options).unwrap()
    }

    fn run(modifier: &PlaceholderTagModifier, line: &str, seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = modifier.apply(Record::parse(line).unwrap(), &mut rng).unwrap();
        assert_eq!(out.len(), 1);
        out[0].to_line()
    }

    fn is_noise(word: &str) -> bool {
        !word.is_empty() && word.chars().all(is_noise_char)
    }

    #[test]
    fn test_tagging() {
        let modifier = tagger(1.0, TagOptions::new());
        assert_eq!(
            run(&modifier, "Hello world\tHallo Welt\t0-0 1-1", 1),
            "__source__ Hello __target__ Hallo __done__ __source__ world __target__ Welt __done__\tHallo Welt\t1-0 3-0 6-1 8-1"
        );
    }

    #[test]
    fn test_tagging_skips_ambiguous_words() {
        // "Guten Tag" both align to "Hello": nothing is one-to-one there
        let modifier = tagger(1.0, TagOptions::new());
        assert_eq!(
            run(&modifier, "Hello world\tGuten Tag Welt\t0-0 0-1 1-2", 3),
            "Hello __source__ world __target__ Welt __done__\tGuten Tag Welt\t0-0 0-1 2-2 4-2"
        );
    }

    #[test]
    fn test_replace() {
        let modifier = tagger(1.0, TagOptions::new().with_modes(1.0, 0.0));
        let out = run(&modifier, "Hello world\tHallo Welt\t0-0 1-1", 2);
        let fields: Vec<&str> = out.split('\t').collect();
        let words: Vec<&str> = fields[0].split(' ').collect();

        assert_eq!(words.len(), 10);
        assert_eq!(&words[..3], &["__source__", "Hello", "__target__"]);
        assert!(is_noise(words[3]), "{}", words[3]);
        assert_eq!(words[6], "world");
        assert!(is_noise(words[8]), "{}", words[8]);
        // The target keeps the real words
        assert_eq!(fields[1], "Hallo Welt");
        assert_eq!(fields[2], "1-0 6-1");
    }

    #[test]
    fn test_augment() {
        let modifier = tagger(1.0, TagOptions::new().with_modes(0.0, 1.0));
        for seed in 0..10 {
            let out = run(&modifier, "Hello world\tHallo Welt\t0-0 1-1", seed);
            let fields: Vec<&str> = out.split('\t').collect();
            let source: Vec<&str> = fields[0].split(' ').collect();
            let target: Vec<&str> = fields[1].split(' ').collect();

            assert_eq!(source.len(), target.len());
            assert_eq!(source[0], "Hello");
            assert_eq!(target[0], "Hallo");
            assert!(source.len() >= 4 && source.len() <= 8);
            let identity: Vec<String> = (0..source.len()).map(|i| format!("{}-{}", i, i)).collect();
            assert_eq!(fields[2], identity.join(" "));
            for (s, t) in source.iter().zip(&target) {
                assert!(s == t || (!is_noise(s) && !is_noise(t)), "{} / {}", s, t);
            }
        }
    }

    #[test]
    fn test_probability_zero_still_retokenizes() {
        let modifier = tagger(0.0, TagOptions::new());
        assert_eq!(
            run(&modifier, "Hello  world\tHallo Welt\t1-0 0-1", 4),
            "Hello world\tHallo Welt\t0-1 1-0"
        );
    }

    #[test]
    fn test_invalid_alignment_passthrough() {
        let modifier = tagger(1.0, TagOptions::new());
        assert_eq!(
            run(&modifier, "Hello world\tHallo welt\t0-0 1-2", 5),
            "Hello world\tHallo welt"
        );
        assert_eq!(run(&modifier, "Hello world\tHallo welt\t0-x", 5), "Hello world\tHallo welt");
    }

    #[test]
    fn test_missing_alignment_passthrough() {
        let modifier = tagger(1.0, TagOptions::new().with_detokenizers("en", "de"));
        assert_eq!(run(&modifier, "Hello world !\tHallo welt\t", 6), "Hello world!\tHallo welt");
        assert_eq!(run(&modifier, "Hello world !\tHallo welt", 6), "Hello world!\tHallo welt");
    }

    #[test]
    fn test_warn_when_not_tagging() {
        let modifier = tagger(1.0, TagOptions::new());
        let cases = [
            ("Hello world\tHallo welt", "missing alignment field"),
            ("Hello world\tHallo welt\t", "empty alignment field"),
            ("Hello world\tHallo welt\t0-0 1-2", "invalid alignments"),
        ];
        for (line, expected) in cases {
            let (out, warnings) = capture_warnings(|| run(&modifier, line, 8));
            assert_eq!(out, "Hello world\tHallo welt");
            assert_eq!(warnings.len(), 1, "{}", line);
            assert!(warnings[0].contains(expected), "{}", warnings[0]);
        }
    }

    #[test]
    fn test_mode_weights_validated() {
        assert!(PlaceholderTagModifier::new(0.5, TagOptions::new().with_modes(0.6, 0.6)).is_err());
        assert!(PlaceholderTagModifier::new(0.5, TagOptions::new().with_modes(1.2, 0.0)).is_err());
        assert!(PlaceholderTagModifier::new(0.5, TagOptions::new().with_modes(0.4, 0.6)).is_ok());
    }

    #[test]
    fn test_legacy_option_names() {
        let options: TagOptions = serde_json::from_str(
            r#"{"custom_detok_src": "en", "custom_detok_trg": null, "spm_vocab": "vocab.spm"}"#,
        )
        .unwrap();
        assert_eq!(options.source_detokenizer.as_deref(), Some("en"));
        assert_eq!(options.target_detokenizer, None);
        assert_eq!(options.subword_vocab_path, Some(PathBuf::from("vocab.spm")));
        assert!(serde_json::from_str::<TagOptions>(r#"{"template": "x"}"#).is_err());
    }

    #[test]
    fn test_retokenize_with_vocab() {
        let mut vocab = tempfile::NamedTempFile::new().unwrap();
        for piece in ["He", "llo", "▁wor", "ld", "Ha", "▁Welt"] {
            writeln!(vocab, "{}\t-1.0", piece).unwrap();
        }
        let modifier = tagger(0.0, TagOptions::new().with_vocab(vocab.path()));
        assert_eq!(
            run(&modifier, "Hello world\tHallo Welt\t0-0 1-1", 7),
            "Hello world\tHallo Welt\t0-0 0-1 1-0 1-1 2-2 3-2"
        );
    }

    #[test]
    fn test_missing_vocab_is_config_error() {
        let err = PlaceholderTagModifier::new(0.5, TagOptions::new().with_vocab("/nonexistent.spm"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
