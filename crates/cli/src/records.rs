//! Record file input and output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use brushmatch_core::{BrushRecord, MatchedRecord};

/// Read a JSON array, or one JSON object per line.
pub fn read_records(path: &Path) -> Result<Vec<BrushRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records from {:?}", path))?;
    parse_records(&content).with_context(|| format!("Invalid record file {:?}", path))
}

fn parse_records(content: &str) -> Result<Vec<BrushRecord>> {
    if content.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(content)?);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", i + 1))
        })
        .collect()
}

pub fn write_matched<I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = MatchedRecord>,
{
    let file =
        File::create(path).with_context(|| format!("Failed to create output {:?}", path))?;
    write_lines(BufWriter::new(file), records)
}

/// One JSON object per line.
pub fn write_lines<W, I>(mut out: W, records: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = MatchedRecord>,
{
    for record in records {
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
