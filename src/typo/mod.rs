//! Character-level typo edits
//!
//! The modifier layer asks a [`CharEditor`] for one named edit at a time and
//! hands it the RNG to draw from, so the whole pipeline stays a function of
//! one seed.
//!
//! ```
//! use corpaug::typo::{CharEditor, TypoEdit, TypoEditor};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let edited = TypoEditor::new().edit(TypoEdit::RepeatedChar, "cat", &mut rng);
//! assert_eq!(edited.chars().count(), 4);
//! ```

mod editor;
pub mod keyboard;

use std::fmt;
use std::str::FromStr;

use rand::RngCore;

pub use editor::TypoEditor;

/// One named single-character edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypoEdit {
    /// Swap two adjacent word characters
    CharSwap,
    /// Drop a word character
    MissingChar,
    /// Insert a keyboard neighbour next to a word character
    ExtraChar,
    /// Replace a word character with a keyboard neighbour
    NearbyChar,
    /// Replace a character with a look-alike
    SimilarChar,
    /// Remove a space
    SkippedSpace,
    /// Insert a space
    RandomSpace,
    /// Duplicate a word character
    RepeatedChar,
    /// Collapse a doubled letter into one
    Unichar,
}

impl TypoEdit {
    pub const ALL: [TypoEdit; 9] = [
        TypoEdit::CharSwap,
        TypoEdit::MissingChar,
        TypoEdit::ExtraChar,
        TypoEdit::NearbyChar,
        TypoEdit::SimilarChar,
        TypoEdit::SkippedSpace,
        TypoEdit::RandomSpace,
        TypoEdit::RepeatedChar,
        TypoEdit::Unichar,
    ];

    /// Configuration key
    pub fn name(self) -> &'static str {
        match self {
            TypoEdit::CharSwap => "char_swap",
            TypoEdit::MissingChar => "missing_char",
            TypoEdit::ExtraChar => "extra_char",
            TypoEdit::NearbyChar => "nearby_char",
            TypoEdit::SimilarChar => "similar_char",
            TypoEdit::SkippedSpace => "skipped_space",
            TypoEdit::RandomSpace => "random_space",
            TypoEdit::RepeatedChar => "repeated_char",
            TypoEdit::Unichar => "unichar",
        }
    }

    /// Edits that can change the word count and therefore have an
    /// alignment-preserving counterpart.
    pub fn affects_words(self) -> bool {
        matches!(
            self,
            TypoEdit::SkippedSpace | TypoEdit::RandomSpace | TypoEdit::MissingChar
        )
    }
}

impl FromStr for TypoEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypoEdit::ALL
            .into_iter()
            .find(|edit| edit.name() == s)
            .ok_or_else(|| format!("Unknown typo modifier: {}", s))
    }
}

impl fmt::Display for TypoEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Applies a named single-character edit to a string.
///
/// Implementations must draw every random decision from `rng`. An edit with
/// nothing to act on returns the input unchanged.
pub trait CharEditor: Send + Sync {
    fn edit(&self, edit: TypoEdit, text: &str, rng: &mut dyn RngCore) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for edit in TypoEdit::ALL {
            assert_eq!(edit.name().parse::<TypoEdit>(), Ok(edit));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!("char_flip".parse::<TypoEdit>().is_err());
    }

    #[test]
    fn test_word_affecting_edits() {
        let affecting: Vec<_> = TypoEdit::ALL
            .into_iter()
            .filter(|e| e.affects_words())
            .map(TypoEdit::name)
            .collect();
        assert_eq!(affecting, vec!["missing_char", "skipped_space", "random_space"]);
    }
}
