//! Record stream processing
//!
//! Records flow through the modifier chain one at a time. One seeded RNG is
//! shared by the whole chain, so output is a function of the seed, the
//! configuration and the input.

use std::borrow::Cow;
use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::PipelineConfig;
use crate::core::record::Record;
use crate::error::Result;
use crate::modifiers::{build_chain, Modifier, ModifierKind};

const ORDINAL_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
pub struct Pipeline {
    modifiers: Vec<ModifierKind>,
    rng: StdRng,
}

impl Pipeline {
    pub fn new(modifiers: Vec<ModifierKind>, seed: u64) -> Self {
        Self {
            modifiers,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let modifiers = build_chain(&config.modifiers)?;
        log::debug!(
            "pipeline: {:?}",
            modifiers.iter().map(|m| m.name()).collect::<Vec<_>>()
        );
        Ok(Self::new(modifiers, config.seed))
    }

    pub fn modifiers(&self) -> &[ModifierKind] {
        &self.modifiers
    }

    /// Independent stream for record `ordinal`, for callers that process
    /// records out of order.
    pub fn record_rng(seed: u64, ordinal: u64) -> StdRng {
        StdRng::seed_from_u64(seed ^ ordinal.wrapping_mul(ORDINAL_MIX))
    }

    /// Runs one record through the chain using the pipeline's own stream.
    pub fn process_record(&mut self, record: Record) -> Result<Vec<Record>> {
        apply_chain(&self.modifiers, record, &mut self.rng)
    }

    /// Runs one record through the chain using a caller-supplied stream.
    pub fn process_record_with(&self, record: Record, rng: &mut dyn RngCore) -> Result<Vec<Record>> {
        apply_chain(&self.modifiers, record, rng)
    }

    /// Processes one line; multiple output records are joined by `\n`.
    ///
    /// A line without a tab is logged and returned unchanged.
    pub fn process_line(&mut self, line: &str) -> Result<String> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some(record) = Record::parse(line) else {
            log::warn!("malformed record (no tab), passing through: {}", line);
            return Ok(line.to_string());
        };

        let records = self.process_record(record)?;
        Ok(records
            .iter()
            .map(Record::to_line)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Processes every line of `reader` into `writer`. Returns the number of
    /// input lines.
    ///
    /// Lines that aren't valid UTF-8 are logged and decoded lossily.
    pub fn process<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> Result<usize> {
        let mut count = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            count += 1;

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                log::warn!("line {} is not valid UTF-8, replacing invalid bytes", count);
            }
            let output = self.process_line(&line)?;
            writeln!(writer, "{}", output)?;
        }
        writer.flush()?;
        log::info!("processed {} records", count);
        Ok(count)
    }
}

fn apply_chain(
    modifiers: &[ModifierKind],
    record: Record,
    rng: &mut dyn RngCore,
) -> Result<Vec<Record>> {
    let mut records = vec![record];
    for modifier in modifiers {
        let mut next = Vec::with_capacity(records.len());
        for record in records {
            next.extend(modifier.apply(record, &mut *rng)?);
        }
        records = next;
    }
    Ok(records)
}
