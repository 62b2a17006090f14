//! Pipeline configuration (JSON)
//!
//! ```json
//! { "seed": 1,
//!   "modifiers": [ { "Typo": 0.1, "char_swap": 0.2 }, { "Tags": 0.05 } ] }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{config_error, Result};

/// Modifier chain plus the seed of its random stream
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Seed of the pipeline RNG; the same seed and input give the same output
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Modifier entries, applied in order
    #[serde(default)]
    pub modifiers: Vec<Map<String, Value>>,
}

fn default_seed() -> u64 {
    0
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            modifiers: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Appends one modifier entry, e.g. `json!({"Noise": 0.01})`.
    pub fn with_modifier(mut self, entry: Value) -> Result<Self> {
        match entry {
            Value::Object(map) => {
                self.modifiers.push(map);
                Ok(self)
            }
            other => Err(config_error(format!(
                "modifier entry must be an object, got {}",
                other
            ))),
        }
    }
}

pub fn parse_config(json: &str) -> Result<PipelineConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a configuration file. A missing or malformed file is an error:
/// running with a silently different chain would change the corpus.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| config_error(format!("cannot read {}: {}", path.display(), e)))?;
    let config = parse_config(&content)?;
    log::info!(
        "loaded {} modifiers from {}",
        config.modifiers.len(),
        path.display()
    );
    Ok(config)
}
