//! Records, alignments and the alignment-preserving edit primitives

pub mod alignment;
pub mod edits;
pub mod record;
pub mod unicode;
pub mod words;

pub use alignment::{AlignmentError, AlignmentPair, AlignmentSet};
pub use edits::{insert_space, remove_char, remove_space, EditOutcome};
pub use record::{AlignmentState, Record};
pub use words::{word_count, word_spans, WordSpan};
