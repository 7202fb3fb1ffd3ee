//! Reading and writing the JSONL catalog files.
//!
//! Two append-only logs make up the on-disk catalog:
//! - `meta.jsonl`: one [`SourceItem`] per line, written by the ingestion
//!   clients. An item's id is its zero-based line number.
//! - `catalog.jsonl`: one [`EmbeddingRecord`] per line, written by the
//!   embed step.

use crate::error::{CatalogError, Result};
use crate::types::{EmbeddingRecord, SourceItem};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Parse one record per non-empty line, with line numbers in errors.
fn parse_lines<T: DeserializeOwned>(content: &str, file_name: &str) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(line).map_err(|e| CatalogError::ParseError {
            file: file_name.to_string(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        // Missing logs are treated as empty: a fresh catalog has neither file.
        return Ok(String::new());
    }
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut content = String::new();
    std::io::Read::read_to_string(&mut reader, &mut content)?;
    Ok(content)
}

/// Parse the metadata log into source items (in line order)
pub fn parse_items(path: &Path) -> Result<Vec<SourceItem>> {
    let content = read_file(path)?;
    parse_items_str(&content, &path.display().to_string())
}

/// Parse metadata log content from a string (testable core of [`parse_items`])
pub fn parse_items_str(content: &str, file_name: &str) -> Result<Vec<SourceItem>> {
    parse_lines(content, file_name)
}

/// Parse the embedding log into embedding records
pub fn parse_embeddings(path: &Path) -> Result<Vec<EmbeddingRecord>> {
    let content = read_file(path)?;
    parse_embeddings_str(&content, &path.display().to_string())
}

/// Parse embedding log content from a string
pub fn parse_embeddings_str(content: &str, file_name: &str) -> Result<Vec<EmbeddingRecord>> {
    parse_lines(content, file_name)
}

/// Append records to a JSONL log, creating it if needed.
///
/// One line per record; callers own the ordering guarantee that ids are
/// positional in the metadata log.
pub fn append_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for record in records {
        let line = serde_json::to_string(record).map_err(|e| CatalogError::ParseError {
            file: path.display().to_string(),
            line: 0,
            reason: e.to_string(),
        })?;
        writeln!(file, "{}", line)?;
    }
    file.flush()?;
    Ok(())
}

/// Count the non-empty lines already in a log.
///
/// Used by the ingestion step to know which positional id the next appended
/// item will receive.
pub fn count_records(path: &Path) -> Result<u64> {
    let content = read_file(path)?;
    Ok(content.lines().filter(|l| !l.trim().is_empty()).count() as u64)
}
