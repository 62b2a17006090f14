//! Tab-delimited training records
//!
//! `source \t target [\t alignment [\t ...]]`, one record per line.

use std::fmt;

use super::alignment::{AlignmentError, AlignmentSet};
use super::words::word_count;

/// One parallel training example
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub source: String,
    pub target: String,
    /// Raw alignment field. `None` when the line has only two columns,
    /// `Some("")` when the column is present but empty.
    pub alignment: Option<String>,
    /// Columns after the alignment field, carried through untouched
    pub extra: Vec<String>,
}

/// What a modifier can do with a record's alignment field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentState {
    Absent,
    Empty,
    Invalid(AlignmentError),
    Valid(AlignmentSet),
}

impl Record {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            alignment: None,
            extra: Vec::new(),
        }
    }

    pub fn with_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment = Some(alignment.into());
        self
    }

    /// Parses one line. `None` when the line has no tab at all.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let mut fields = line.split('\t');
        let source = fields.next()?.to_string();
        let target = fields.next()?.to_string();
        let alignment = fields.next().map(str::to_string);
        let extra = fields.map(str::to_string).collect();

        Some(Self {
            source,
            target,
            alignment,
            extra,
        })
    }

    pub fn source_words(&self) -> Vec<&str> {
        self.source.split_whitespace().collect()
    }

    pub fn target_words(&self) -> Vec<&str> {
        self.target.split_whitespace().collect()
    }

    /// Parses and range-checks the alignment field against both sides.
    pub fn alignment_state(&self) -> AlignmentState {
        let Some(field) = self.alignment.as_deref() else {
            return AlignmentState::Absent;
        };
        if field.trim().is_empty() {
            return AlignmentState::Empty;
        }

        let parsed = AlignmentSet::parse(field)
            .and_then(|set| {
                set.validate(word_count(&self.source), word_count(&self.target))?;
                Ok(set)
            });
        match parsed {
            Ok(set) => AlignmentState::Valid(set),
            Err(e) => AlignmentState::Invalid(e),
        }
    }

    /// Serialises back to one tab-delimited line (without line break).
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.source, self.target)?;
        if let Some(alignment) = &self.alignment {
            write!(f, "\t{}", alignment)?;
        }
        for field in &self.extra {
            write!(f, "\t{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_fields() {
        let record = Record::parse("Hello world\tHallo Welt\t0-0 1-1").unwrap();
        assert_eq!(record.source, "Hello world");
        assert_eq!(record.target, "Hallo Welt");
        assert_eq!(record.alignment.as_deref(), Some("0-0 1-1"));
        assert_eq!(record.to_line(), "Hello world\tHallo Welt\t0-0 1-1");
    }

    #[test]
    fn test_parse_two_fields() {
        let record = Record::parse("a\tb\n").unwrap();
        assert_eq!(record.alignment, None);
        assert_eq!(record.alignment_state(), AlignmentState::Absent);
        assert_eq!(record.to_line(), "a\tb");
    }

    #[test]
    fn test_parse_empty_alignment() {
        let record = Record::parse("a\tb\t").unwrap();
        assert_eq!(record.alignment.as_deref(), Some(""));
        assert_eq!(record.alignment_state(), AlignmentState::Empty);
        assert_eq!(record.to_line(), "a\tb\t");
    }

    #[test]
    fn test_parse_without_tab() {
        assert!(Record::parse("no tab here").is_none());
    }

    #[test]
    fn test_extra_columns_survive() {
        let record = Record::parse("a\tb\t0-0\tscore=1").unwrap();
        assert_eq!(record.extra, vec!["score=1".to_string()]);
        assert_eq!(record.to_line(), "a\tb\t0-0\tscore=1");
    }

    #[test]
    fn test_out_of_range_alignment() {
        let record = Record::parse("Hello world\tHallo welt\t0-0 1-2").unwrap();
        assert!(matches!(
            record.alignment_state(),
            AlignmentState::Invalid(AlignmentError::OutOfRange { trg: 2, .. })
        ));
    }

    #[test]
    fn test_valid_alignment() {
        let record = Record::new("a b", "c d").with_alignment("0-1 1-0");
        match record.alignment_state() {
            AlignmentState::Valid(set) => assert_eq!(set.to_string(), "0-1 1-0"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
