//! Crate-wide error type
//!
//! Configuration problems abort before any record is processed. Per-record
//! problems are never errors: modifiers log them and keep the record.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Unknown modifier or sub-edit name, probability out of range,
    /// unresolvable tokenizer/vocab reference.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde_json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// An edit produced a word count that disagrees with its own alignment
    /// update. Always a bug.
    #[error("internal consistency error in {modifier}: {detail}")]
    InternalConsistency {
        modifier: &'static str,
        detail: String,
    },
}

pub(crate) fn config_error<S: Into<String>>(msg: S) -> Error {
    Error::Config(msg.into())
}

/// Rejects probabilities outside `0.0..=1.0`.
pub(crate) fn check_probability(name: &str, probability: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(config_error(format!(
            "{} has a probability out of the 0.0..1.0 range: {}",
            name, probability
        )));
    }
    Ok(probability)
}
