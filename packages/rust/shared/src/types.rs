//! Core domain types for Herbarium datasets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ChunkConfig;

/// Current schema version for the run manifest format.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One herb's structured record, as written to `herbs_structured.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Herb name, taken from the all-caps heading line without its period.
    pub name: String,
    /// Body of the `Descript.]` section.
    #[serde(default)]
    pub description: String,
    /// Body of the `Place.]` section.
    #[serde(default)]
    pub place: String,
    /// Body of the `Time.]` section.
    #[serde(default)]
    pub time: String,
    /// Body of the `Government and virtues.]` section.
    #[serde(default)]
    pub government_virtues: String,
    /// Source lines owned by this entry, heading included, each ending in `\n`.
    pub full_text: String,
    /// `full_text` with blank lines and repeated spaces collapsed.
    #[serde(default)]
    pub cleaned_text: String,
}

impl Entry {
    /// Whitespace-delimited words of the cleaned text, the unit chunks are cut in.
    pub fn words(&self) -> std::str::SplitWhitespace<'_> {
        self.cleaned_text.split_whitespace()
    }
}

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// A word-window slice of one entry's cleaned text (`herbs_chunked.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Name of the entry this chunk was cut from.
    pub herb_name: String,
    /// `{herb_name}_{index}`.
    pub chunk_id: String,
    /// Window words joined by single spaces.
    pub text: String,
    pub word_count: usize,
    /// Offset of the first word within the entry's word sequence.
    pub start_word: usize,
}

impl Chunk {
    /// Exclusive end offset of this chunk's word range.
    pub fn end_word(&self) -> usize {
        self.start_word + self.word_count
    }
}

// ---------------------------------------------------------------------------
// QaPair
// ---------------------------------------------------------------------------

/// One instruction-tuning example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub instruction: String,
    #[serde(default)]
    pub input: String,
    pub output: String,
}

impl QaPair {
    /// Build a pair with an empty `input`.
    pub fn new(instruction: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            input: String::new(),
            output: output.into(),
        }
    }

    /// Build a pair that carries a user input alongside the instruction.
    pub fn with_input(
        instruction: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            input: input.into(),
            output: output.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// RunId / RunManifest
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one preprocessing run (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The `manifest.json` written alongside the dataset artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    pub run_id: RunId,
    /// Tool version that produced the artifacts.
    pub tool_version: String,
    /// Path of the plaintext source, as given.
    pub source_file: String,
    /// SHA-256 of the source text (hex).
    pub source_sha256: String,
    pub created_at: DateTime<Utc>,
    /// Last time any artifact in the directory was rewritten.
    pub updated_at: DateTime<Utc>,
    pub herb_count: usize,
    pub chunk_count: usize,
    /// Populated once Q&A generation has run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_count: Option<usize>,
    /// Chunking parameters used for `herbs_chunked.json`.
    pub chunking: ChunkConfig,
}
