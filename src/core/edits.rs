//! Alignment-preserving text edits
//!
//! Each edit takes a text snapshot plus its alignment and returns the edited
//! text together with the alignment that matches the new word boundaries.
//! Randomness always comes from the caller's RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use super::alignment::AlignmentSet;
use super::words::{non_space_offsets, space_offsets, word_spans};

/// Result of one edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub text: String,
    pub alignment: AlignmentSet,
    /// Change in word count caused by the edit (-1, 0 or +1)
    pub word_delta: isize,
}

impl EditOutcome {
    fn unchanged(text: &str, alignment: &AlignmentSet) -> Self {
        Self {
            text: text.to_string(),
            alignment: alignment.clone(),
            word_delta: 0,
        }
    }
}

/// Inserts a space before a random non-space character.
///
/// With `include_edges` the end of the string is a candidate too; without it
/// the first non-space character is never chosen.
pub fn insert_space<R: Rng + ?Sized>(
    text: &str,
    alignment: &AlignmentSet,
    include_edges: bool,
    rng: &mut R,
) -> EditOutcome {
    let mut candidates = non_space_offsets(text);
    if include_edges {
        candidates.push(text.len());
    } else if !candidates.is_empty() {
        candidates.remove(0);
    }

    match candidates.choose(rng) {
        Some(&offset) => insert_space_at(text, alignment, offset),
        None => EditOutcome::unchanged(text, alignment),
    }
}

/// Inserts a space at byte `offset`.
pub fn insert_space_at(text: &str, alignment: &AlignmentSet, offset: usize) -> EditOutcome {
    let edited = format!("{} {}", &text[..offset], &text[offset..]);

    let at_boundary = offset == text.len()
        || text[..offset]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
        || text[offset..].starts_with(char::is_whitespace);

    if at_boundary {
        // Existing boundary, no new word
        return EditOutcome {
            text: edited,
            alignment: alignment.clone(),
            word_delta: 0,
        };
    }

    let word = word_spans(text)
        .into_iter()
        .find(|span| span.contains(offset))
        .map(|span| span.index);

    match word {
        Some(word) => EditOutcome {
            text: edited,
            alignment: alignment.split_source_word(word),
            word_delta: 1,
        },
        None => EditOutcome {
            text: edited,
            alignment: alignment.clone(),
            word_delta: 0,
        },
    }
}

/// Removes a random whitespace character.
///
/// Without `include_edges` the first and last character of the string are
/// never removed.
pub fn remove_space<R: Rng + ?Sized>(
    text: &str,
    alignment: &AlignmentSet,
    include_edges: bool,
    rng: &mut R,
) -> EditOutcome {
    let mut candidates = space_offsets(text);
    if !include_edges {
        candidates.retain(|&offset| {
            let width = text[offset..].chars().next().map_or(0, char::len_utf8);
            offset > 0 && offset + width < text.len()
        });
    }

    match candidates.choose(rng) {
        Some(&offset) => remove_space_at(text, alignment, offset),
        None => EditOutcome::unchanged(text, alignment),
    }
}

/// Removes the whitespace character at byte `offset`.
pub fn remove_space_at(text: &str, alignment: &AlignmentSet, offset: usize) -> EditOutcome {
    let width = match text[offset..].chars().next() {
        Some(c) if c.is_whitespace() => c.len_utf8(),
        _ => return EditOutcome::unchanged(text, alignment),
    };
    let edited = format!("{}{}", &text[..offset], &text[offset + width..]);

    let joins_words = text[..offset]
        .chars()
        .next_back()
        .is_some_and(|c| !c.is_whitespace())
        && text[offset + width..]
            .chars()
            .next()
            .is_some_and(|c| !c.is_whitespace());

    if !joins_words {
        return EditOutcome {
            text: edited,
            alignment: alignment.clone(),
            word_delta: 0,
        };
    }

    let word = word_spans(text)
        .into_iter()
        .find(|span| span.range.end == offset)
        .map(|span| span.index);

    match word {
        Some(word) => EditOutcome {
            text: edited,
            alignment: alignment.merge_source_words(word),
            word_delta: -1,
        },
        None => EditOutcome {
            text: edited,
            alignment: alignment.clone(),
            word_delta: 0,
        },
    }
}

/// Removes one random non-space character.
///
/// Never removes the last remaining non-space character. When a
/// single-character word disappears its pairs move to a neighbouring word.
pub fn remove_char<R: Rng + ?Sized>(
    text: &str,
    alignment: &AlignmentSet,
    rng: &mut R,
) -> EditOutcome {
    let candidates = non_space_offsets(text);
    if candidates.len() <= 1 {
        return EditOutcome::unchanged(text, alignment);
    }

    let Some(&offset) = candidates.choose(rng) else {
        return EditOutcome::unchanged(text, alignment);
    };

    let spans = word_spans(text);
    let Some(span) = spans.iter().find(|span| span.contains(offset)) else {
        return EditOutcome::unchanged(text, alignment);
    };
    let width = text[offset..].chars().next().map_or(0, char::len_utf8);

    if span.len() != width {
        return remove_char_at(text, alignment, offset, None);
    }

    // Whole word vanishes: hand its pairs to a neighbour
    let word = span.index;
    let mut neighbours = Vec::with_capacity(2);
    if word > 0 {
        neighbours.push(word - 1);
    }
    if word + 1 < spans.len() {
        neighbours.push(word);
    }
    match neighbours.choose(rng) {
        Some(&replacement) => remove_char_at(text, alignment, offset, Some(replacement)),
        None => EditOutcome::unchanged(text, alignment),
    }
}

/// Removes the character at byte `offset`.
///
/// `replacement` is the post-removal index that receives the pairs of a
/// vanished single-character word; it is ignored when no word vanishes.
pub fn remove_char_at(
    text: &str,
    alignment: &AlignmentSet,
    offset: usize,
    replacement: Option<usize>,
) -> EditOutcome {
    let width = match text[offset..].chars().next() {
        Some(c) if !c.is_whitespace() => c.len_utf8(),
        _ => return EditOutcome::unchanged(text, alignment),
    };
    let edited = format!("{}{}", &text[..offset], &text[offset + width..]);

    let vanished = word_spans(text)
        .into_iter()
        .find(|span| span.contains(offset) && span.len() == width)
        .map(|span| span.index);

    match (vanished, replacement) {
        (Some(word), Some(replacement)) => EditOutcome {
            text: edited,
            alignment: alignment.remove_source_word(word, replacement),
            word_delta: -1,
        },
        (Some(word), None) => {
            let replacement = word.saturating_sub(1);
            EditOutcome {
                text: edited,
                alignment: alignment.remove_source_word(word, replacement),
                word_delta: -1,
            }
        }
        (None, _) => EditOutcome {
            text: edited,
            alignment: alignment.clone(),
            word_delta: 0,
        },
    }
}
