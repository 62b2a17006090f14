//! Word alignment pairs
//!
//! Wire format: space separated `"{src}-{trg}"` tokens, e.g. `0-0 1-2 2-1`.
//! Pairs keep insertion order for serialisation; lookups treat them as a set.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One source-word / target-word correspondence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlignmentPair {
    pub src: usize,
    pub trg: usize,
}

impl AlignmentPair {
    pub fn new(src: usize, trg: usize) -> Self {
        Self { src, trg }
    }
}

impl fmt::Display for AlignmentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.src, self.trg)
    }
}

/// Why an alignment field can't be used for a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("unparsable alignment token '{0}'")]
    Unparsable(String),

    #[error("alignment pair {src}-{trg} out of range ({src_len} source words, {trg_len} target words)")]
    OutOfRange {
        src: usize,
        trg: usize,
        src_len: usize,
        trg_len: usize,
    },
}

/// Ordered collection of alignment pairs (duplicates allowed)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentSet {
    pairs: Vec<AlignmentPair>,
}

impl AlignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(src, trg)| AlignmentPair::new(src, trg))
                .collect(),
        }
    }

    /// Parses `"0-0 1-2 ..."`. An empty or all-whitespace string yields an
    /// empty set.
    pub fn parse(field: &str) -> Result<Self, AlignmentError> {
        let mut pairs = Vec::new();
        for token in field.split_whitespace() {
            let (src, trg) = token
                .split_once('-')
                .ok_or_else(|| AlignmentError::Unparsable(token.to_string()))?;
            let src = src
                .parse::<usize>()
                .map_err(|_| AlignmentError::Unparsable(token.to_string()))?;
            let trg = trg
                .parse::<usize>()
                .map_err(|_| AlignmentError::Unparsable(token.to_string()))?;
            pairs.push(AlignmentPair::new(src, trg));
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[AlignmentPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn push(&mut self, src: usize, trg: usize) {
        self.pairs.push(AlignmentPair::new(src, trg));
    }

    pub fn contains(&self, src: usize, trg: usize) -> bool {
        self.pairs.contains(&AlignmentPair::new(src, trg))
    }

    /// Does source word `src` have any aligned partner
    pub fn has_source(&self, src: usize) -> bool {
        self.pairs.iter().any(|p| p.src == src)
    }

    /// Target partners of source word `src`, in pair order
    pub fn targets_of(&self, src: usize) -> Vec<usize> {
        self.pairs
            .iter()
            .filter(|p| p.src == src)
            .map(|p| p.trg)
            .collect()
    }

    /// Source partners of target word `trg`, in pair order
    pub fn sources_of(&self, trg: usize) -> Vec<usize> {
        self.pairs
            .iter()
            .filter(|p| p.trg == trg)
            .map(|p| p.src)
            .collect()
    }

    /// The single target word aligned to `src`, provided that target word is
    /// aligned to nothing but `src`.
    pub fn one_to_one_target(&self, src: usize) -> Option<usize> {
        match self.targets_of(src).as_slice() {
            [trg] if self.sources_of(*trg).len() == 1 => Some(*trg),
            _ => None,
        }
    }

    /// Checks every pair against the word counts of both sides.
    pub fn validate(&self, src_len: usize, trg_len: usize) -> Result<(), AlignmentError> {
        match self.pairs.iter().find(|p| p.src >= src_len || p.trg >= trg_len) {
            Some(p) => Err(AlignmentError::OutOfRange {
                src: p.src,
                trg: p.trg,
                src_len,
                trg_len,
            }),
            None => Ok(()),
        }
    }

    /// Source word `word` was split in two. Its pairs are duplicated onto
    /// both halves, later words move up by one.
    pub fn split_source_word(&self, word: usize) -> Self {
        let mut pairs = Vec::with_capacity(self.pairs.len() + 1);
        for p in &self.pairs {
            if p.src <= word {
                pairs.push(*p);
            }
            if p.src >= word {
                pairs.push(AlignmentPair::new(p.src + 1, p.trg));
            }
        }
        Self { pairs }
    }

    /// Source words `word` and `word + 1` were joined into one.
    pub fn merge_source_words(&self, word: usize) -> Self {
        let pairs = self
            .pairs
            .iter()
            .map(|p| {
                if p.src > word {
                    AlignmentPair::new(p.src - 1, p.trg)
                } else {
                    *p
                }
            })
            .collect();
        Self { pairs }
    }

    /// Source word `word` vanished. Its pairs move to `replacement`, which is
    /// an index in the numbering after the removal.
    pub fn remove_source_word(&self, word: usize, replacement: usize) -> Self {
        let pairs = self
            .pairs
            .iter()
            .map(|p| {
                if p.src == word {
                    AlignmentPair::new(replacement, p.trg)
                } else if p.src > word {
                    AlignmentPair::new(p.src - 1, p.trg)
                } else {
                    *p
                }
            })
            .collect();
        Self { pairs }
    }

    /// `count` new source words were inserted at position `at`.
    pub fn insert_source_words(&mut self, at: usize, count: usize) {
        for p in &mut self.pairs {
            if p.src >= at {
                p.src += count;
            }
        }
    }

    /// `count` new target words were inserted at position `at`.
    pub fn insert_target_words(&mut self, at: usize, count: usize) {
        for p in &mut self.pairs {
            if p.trg >= at {
                p.trg += count;
            }
        }
    }

    /// Sorts by (src, trg) and drops duplicates.
    pub fn sorted_unique(mut self) -> Self {
        self.pairs.sort_unstable();
        self.pairs.dedup();
        self
    }

    /// Distinct source indices, ascending
    pub fn source_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.pairs.iter().map(|p| p.src).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

impl FromStr for AlignmentSet {
    type Err = AlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AlignmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pair) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", pair)?;
        }
        Ok(())
    }
}
