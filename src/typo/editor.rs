//! Default character editor

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::keyboard::{keyboard_neighbours, match_case, similar_chars};
use super::{CharEditor, TypoEdit};
use crate::core::alignment::AlignmentSet;
use crate::core::edits::{insert_space, remove_space};

/// Typo editor over a QWERTY neighbour table and a look-alike table
#[derive(Debug, Clone, Default)]
pub struct TypoEditor;

impl TypoEditor {
    pub fn new() -> Self {
        Self
    }
}

impl CharEditor for TypoEditor {
    fn edit(&self, edit: TypoEdit, text: &str, rng: &mut dyn RngCore) -> String {
        let mut chars: Vec<char> = text.chars().collect();

        match edit {
            TypoEdit::CharSwap => {
                let candidates: Vec<usize> = (0..chars.len().saturating_sub(1))
                    .filter(|&i| is_word_char(chars[i]) && is_word_char(chars[i + 1]))
                    .collect();
                if let Some(&i) = candidates.choose(rng) {
                    chars.swap(i, i + 1);
                }
            }
            TypoEdit::MissingChar => {
                if let Some(&i) = word_positions(&chars).choose(rng) {
                    chars.remove(i);
                }
            }
            TypoEdit::ExtraChar => {
                if let Some((i, c)) = pick_replacement(&chars, rng, keyboard_neighbours) {
                    chars.insert(i + 1, c);
                }
            }
            TypoEdit::NearbyChar => {
                if let Some((i, c)) = pick_replacement(&chars, rng, keyboard_neighbours) {
                    chars[i] = c;
                }
            }
            TypoEdit::SimilarChar => {
                if let Some((i, c)) = pick_replacement(&chars, rng, similar_chars) {
                    chars[i] = c;
                }
            }
            TypoEdit::RepeatedChar => {
                if let Some(&i) = word_positions(&chars).choose(rng) {
                    chars.insert(i, chars[i]);
                }
            }
            TypoEdit::Unichar => {
                let candidates: Vec<usize> = (0..chars.len().saturating_sub(1))
                    .filter(|&i| chars[i].is_alphabetic() && chars[i] == chars[i + 1])
                    .collect();
                if let Some(&i) = candidates.choose(rng) {
                    chars.remove(i + 1);
                }
            }
            TypoEdit::RandomSpace => {
                return insert_space(text, &AlignmentSet::new(), false, rng).text;
            }
            TypoEdit::SkippedSpace => {
                return remove_space(text, &AlignmentSet::new(), false, rng).text;
            }
        }

        chars.into_iter().collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

fn word_positions(chars: &[char]) -> Vec<usize> {
    (0..chars.len()).filter(|&i| is_word_char(chars[i])).collect()
}

/// Picks a position with a non-empty replacement table, then one of its
/// replacements (case-matched).
fn pick_replacement<R: Rng + ?Sized>(
    chars: &[char],
    rng: &mut R,
    table: fn(char) -> &'static str,
) -> Option<(usize, char)> {
    let candidates: Vec<usize> = (0..chars.len())
        .filter(|&i| is_word_char(chars[i]) && !table(chars[i]).is_empty())
        .collect();
    let &i = candidates.choose(rng)?;
    let options: Vec<char> = table(chars[i]).chars().collect();
    let &c = options.choose(rng)?;
    Some((i, match_case(chars[i], c)))
}
