//! JSON and JSONL artifact readers and writers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use herbarium_shared::{HerbariumError, Result};

/// Write `data` as pretty-printed JSON.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| HerbariumError::Serialization(format!("JSON serialization failed: {e}")))?;
    std::fs::write(path, json).map_err(|e| HerbariumError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| HerbariumError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| HerbariumError::parse(format!("{}: {e}", path.display())))
}

/// Write one compact JSON object per line.
pub fn write_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| HerbariumError::io(path, e))?;
    let mut out = BufWriter::new(file);

    for record in records {
        serde_json::to_writer(&mut out, record).map_err(|e| {
            HerbariumError::Serialization(format!("JSONL serialization failed: {e}"))
        })?;
        out.write_all(b"\n").map_err(|e| HerbariumError::io(path, e))?;
    }
    out.flush().map_err(|e| HerbariumError::io(path, e))?;

    debug!(path = %path.display(), records = records.len(), "wrote JSONL file");
    Ok(())
}

/// Read a JSONL file. Blank lines are skipped.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| HerbariumError::io(path, e))?;
    let mut records = Vec::new();

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| HerbariumError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            HerbariumError::parse(format!("{} line {}: {e}", path.display(), idx + 1))
        })?;
        records.push(record);
    }

    Ok(records)
}
