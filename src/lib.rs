pub mod config;
pub mod core;
pub mod error;
pub mod modifiers;
pub mod pipeline;
pub mod tokenize;
pub mod typo;

#[cfg(test)]
mod test_log;

pub use config::{load_config, parse_config, PipelineConfig};
pub use crate::core::{AlignmentError, AlignmentSet, AlignmentState, Record};
pub use error::{Error, Result};
pub use modifiers::{build_chain, build_modifier, Modifier, ModifierKind};
pub use pipeline::Pipeline;
