//! Record modifiers
//!
//! A modifier is a probability-gated transform over one [`Record`]. The set
//! of modifiers is closed: [`ModifierKind`] holds one variant per registered
//! modifier and [`REGISTRY`] maps configuration names to constructors.

pub mod case;
pub mod noise;
pub mod placeholders;
pub mod retokenize;
pub mod typo;

use std::fmt;

use rand::{Rng, RngCore};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use case::{CaseModifier, CaseStyle};
pub use noise::{NoiseModifier, NoiseOptions};
pub use placeholders::{PlaceholderTagModifier, TagMode, TagOptions};
pub use retokenize::{RetokenizeModifier, RetokenizeOptions, SideOptions};
pub use typo::TypoModifier;

use crate::core::record::Record;
use crate::error::{check_probability, config_error, Result};

/// A transform over one record.
///
/// All random decisions are drawn from `rng`. Returns the records to emit in
/// place of the input: usually one, two when a modifier appends a record.
pub trait Modifier: Send + Sync + fmt::Debug {
    /// Registry name
    fn name(&self) -> &'static str;

    fn probability(&self) -> f64;

    fn apply(&self, record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>>;
}

/// Every registered modifier
#[derive(Debug)]
pub enum ModifierKind {
    Noise(NoiseModifier),
    Typo(TypoModifier),
    Tags(PlaceholderTagModifier),
    Retokenize(RetokenizeModifier),
    Case(CaseModifier),
}

impl ModifierKind {
    fn inner(&self) -> &dyn Modifier {
        match self {
            ModifierKind::Noise(m) => m,
            ModifierKind::Typo(m) => m,
            ModifierKind::Tags(m) => m,
            ModifierKind::Retokenize(m) => m,
            ModifierKind::Case(m) => m,
        }
    }
}

impl Modifier for ModifierKind {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn probability(&self) -> f64 {
        self.inner().probability()
    }

    fn apply(&self, record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        self.inner().apply(record, rng)
    }
}

/// Builds a modifier from its probability and option object.
pub type Constructor = fn(f64, Value) -> Result<ModifierKind>;

/// Configuration name → constructor
pub const REGISTRY: &[(&str, Constructor)] = &[
    ("Noise", build_noise),
    ("Typo", build_typo),
    ("Tags", build_tags),
    ("Retokenize", build_retokenize),
    ("UpperCase", build_upper_case),
    ("TitleCase", build_title_case),
];

fn build_noise(probability: f64, options: Value) -> Result<ModifierKind> {
    let options = parse_options(options)?;
    Ok(ModifierKind::Noise(NoiseModifier::new(probability, options)?))
}

fn build_typo(probability: f64, options: Value) -> Result<ModifierKind> {
    let edits: Map<String, Value> = parse_options(options)?;
    Ok(ModifierKind::Typo(TypoModifier::from_options(probability, &edits)?))
}

fn build_tags(probability: f64, options: Value) -> Result<ModifierKind> {
    let options = parse_options(options)?;
    Ok(ModifierKind::Tags(PlaceholderTagModifier::new(probability, options)?))
}

fn build_retokenize(probability: f64, options: Value) -> Result<ModifierKind> {
    let options = parse_options(options)?;
    Ok(ModifierKind::Retokenize(RetokenizeModifier::new(probability, options)?))
}

fn build_upper_case(probability: f64, options: Value) -> Result<ModifierKind> {
    no_options("UpperCase", &options)?;
    Ok(ModifierKind::Case(CaseModifier::new(CaseStyle::Upper, probability)?))
}

fn build_title_case(probability: f64, options: Value) -> Result<ModifierKind> {
    no_options("TitleCase", &options)?;
    Ok(ModifierKind::Case(CaseModifier::new(CaseStyle::Title, probability)?))
}

/// Builds one modifier from a configuration entry such as
/// `{"Typo": 0.1, "char_swap": 0.2}`.
///
/// Exactly one key must name a registered modifier; its value is the
/// probability and the remaining keys are the modifier's options.
pub fn build_modifier(entry: &Map<String, Value>) -> Result<ModifierKind> {
    let mut names = entry
        .keys()
        .filter(|key| REGISTRY.iter().any(|(name, _)| *name == key.as_str()));
    let name = match (names.next(), names.next()) {
        (Some(name), None) => name.clone(),
        (None, _) => {
            let keys: Vec<&str> = entry.keys().map(String::as_str).collect();
            return Err(config_error(format!(
                "Unknown modifier in entry with keys {:?}",
                keys
            )));
        }
        (Some(first), Some(second)) => {
            return Err(config_error(format!(
                "Modifier entry names more than one modifier: {}, {}",
                first, second
            )));
        }
    };

    let probability = entry
        .get(&name)
        .and_then(Value::as_f64)
        .ok_or_else(|| config_error(format!("{} needs a numeric probability", name)))?;
    let probability = check_probability(&name, probability)?;

    let options: Map<String, Value> = entry
        .iter()
        .filter(|(key, _)| **key != name)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let constructor = REGISTRY
        .iter()
        .find(|(registered, _)| *registered == name.as_str())
        .map(|(_, constructor)| *constructor)
        .ok_or_else(|| config_error(format!("Unknown modifier: {}", name)))?;

    constructor(probability, Value::Object(options))
}

/// Builds a whole chain, warning when `Tags` isn't applied last.
pub fn build_chain(entries: &[Map<String, Value>]) -> Result<Vec<ModifierKind>> {
    let chain = entries
        .iter()
        .map(build_modifier)
        .collect::<Result<Vec<_>>>()?;

    if let Some(position) = chain.iter().position(|m| m.name() == "Tags") {
        if position + 1 != chain.len() {
            log::warn!("Tags modifier should be the last modifier to be applied");
        }
    }

    Ok(chain)
}

/// `true` with probability `p`. Always consumes one draw.
pub(crate) fn roll(rng: &mut dyn RngCore, p: f64) -> bool {
    rng.gen::<f64>() < p
}

fn parse_options<T: DeserializeOwned>(options: Value) -> Result<T> {
    serde_json::from_value(options).map_err(|e| config_error(e.to_string()))
}

fn no_options(name: &str, options: &Value) -> Result<()> {
    match options.as_object() {
        Some(map) if !map.is_empty() => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            Err(config_error(format!("{} takes no options, got {:?}", name, keys)))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_log::capture_warnings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn entry(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_build_each_registered_modifier() {
        for (name, _) in REGISTRY {
            let mut map = Map::new();
            map.insert(name.to_string(), json!(0.5));
            let modifier = build_modifier(&map).unwrap();
            assert_eq!(modifier.name(), *name);
            assert!((modifier.probability() - 0.5).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_unknown_modifier() {
        let err = build_modifier(&entry(json!({"Shuffle": 0.5}))).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_two_modifier_names() {
        assert!(build_modifier(&entry(json!({"Noise": 0.5, "Typo": 0.5}))).is_err());
    }

    #[test]
    fn test_probability_out_of_range() {
        assert!(build_modifier(&entry(json!({"Noise": 1.5}))).is_err());
        assert!(build_modifier(&entry(json!({"Noise": -0.1}))).is_err());
        assert!(build_modifier(&entry(json!({"Noise": "often"}))).is_err());
    }

    #[test]
    fn test_unknown_option() {
        assert!(build_modifier(&entry(json!({"Noise": 0.5, "max_lines": 3}))).is_err());
        assert!(build_modifier(&entry(json!({"UpperCase": 0.5, "lang": "en"}))).is_err());
        assert!(build_modifier(&entry(json!({"Typo": 0.5, "char_flip": 0.1}))).is_err());
    }

    #[test]
    fn test_chain_order_kept() {
        let chain = build_chain(&[
            entry(json!({"UpperCase": 1.0})),
            entry(json!({"Tags": 0.0})),
        ])
        .unwrap();
        let names: Vec<&str> = chain.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["UpperCase", "Tags"]);
    }

    #[test]
    fn test_warn_if_tags_not_last() {
        let (chain, warnings) = capture_warnings(|| {
            build_chain(&[entry(json!({"Tags": 1.0})), entry(json!({"UpperCase": 1.0}))])
        });
        assert_eq!(chain.unwrap().len(), 2);
        assert_eq!(
            warnings,
            vec!["Tags modifier should be the last modifier to be applied"]
        );

        let (_, warnings) = capture_warnings(|| {
            build_chain(&[entry(json!({"UpperCase": 1.0})), entry(json!({"Tags": 1.0}))])
        });
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_roll_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..100).all(|_| roll(&mut rng, 1.0)));
        assert!((0..100).all(|_| !roll(&mut rng, 0.0)));
    }
}
