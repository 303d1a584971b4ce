use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use zooscape_core::WorldSnapshot;
use zooscape_system_decision::Engine;

/// Feeds every snapshot line through the engine and writes one command per line.
///
/// Blank lines are skipped. Returns the number of ticks decided.
pub(crate) fn run<R, W>(engine: &mut Engine, input: R, output: &mut W) -> Result<u64>
where
    R: BufRead,
    W: Write,
{
    let mut ticks = 0_u64;
    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("failed to read snapshot line {line_number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let snapshot: WorldSnapshot = serde_json::from_str(&line)
            .with_context(|| format!("malformed snapshot on line {line_number}"))?;
        let command = engine.decide(&snapshot);
        writeln!(output, "{command}")
            .with_context(|| format!("failed to write command for line {line_number}"))?;
        ticks += 1;
    }

    output.flush().context("failed to flush commands")?;
    Ok(ticks)
}
