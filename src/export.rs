//! JSON Lines snapshots of the chain, one block per line.
//!
//! A snapshot is an audit artifact: it can be read back and checked with
//! [`crate::blockchain::audit_blocks`], but there is no path from a snapshot
//! back into a live [`crate::blockchain::Ledger`].

use crate::blockchain::Block;
use crate::error::{LedgerError, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `blocks` to `writer`, one JSON object per line, stored hash included.
pub fn write_jsonl<W: Write>(blocks: &[Block], mut writer: W) -> Result<()> {
    for block in blocks {
        serde_json::to_writer(&mut writer, block)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a snapshot. Blank lines are skipped; a malformed line fails the
/// whole read and names the line number.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let block: Block = serde_json::from_str(&line).map_err(|e| {
            LedgerError::SerializationError(format!("line {}: {}", i + 1, e))
        })?;
        blocks.push(block);
    }
    Ok(blocks)
}

/// Replace `path` with a snapshot of `blocks`, creating parent directories.
/// The snapshot is written to a temporary file beside `path` and renamed into
/// place, so a failed write leaves any previous snapshot intact.
pub fn save_to(path: &Path, blocks: &[Block]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    write_jsonl(blocks, BufWriter::new(tmp.as_file_mut()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| LedgerError::from(e.error))?;
    Ok(())
}

pub fn load_from(path: &Path) -> Result<Vec<Block>> {
    let file = File::open(path)?;
    read_jsonl(BufReader::new(file))
}
