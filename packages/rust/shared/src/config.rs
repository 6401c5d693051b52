//! Application configuration for Herbarium.
//!
//! User config lives at `~/.herbarium/herbarium.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HerbariumError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "herbarium.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".herbarium";

// ---------------------------------------------------------------------------
// Config structs (matching herbarium.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Word-window chunking.
    #[serde(default)]
    pub chunking: ChunkConfig,

    /// Q&A generation.
    #[serde(default)]
    pub qa: QaConfig,

    /// Artifact file names.
    #[serde(default)]
    pub files: FilesConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory that receives the dataset artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

/// `[chunking]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window size in words.
    #[serde(default = "default_max_words")]
    pub max_words: usize,

    /// Words shared by consecutive windows. Must be below `max_words`.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_words: default_max_words(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkConfig {
    /// Build a validated chunk configuration.
    pub fn new(max_words: usize, overlap: usize) -> Result<Self> {
        let config = Self { max_words, overlap };
        config.validate()?;
        Ok(config)
    }

    /// Check `max_words > 0` and `overlap < max_words`.
    pub fn validate(&self) -> Result<()> {
        if self.max_words == 0 {
            return Err(HerbariumError::validation("max_words must be positive"));
        }
        if self.overlap >= self.max_words {
            return Err(HerbariumError::validation(format!(
                "overlap ({}) must be smaller than max_words ({})",
                self.overlap, self.max_words
            )));
        }
        Ok(())
    }

    /// Distance between the start offsets of consecutive windows.
    pub fn stride(&self) -> usize {
        self.max_words - self.overlap
    }
}

fn default_max_words() -> usize {
    1000
}
fn default_overlap() -> usize {
    100
}

/// `[qa]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Seed for the shuffle RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Whether to shuffle the generated pairs.
    #[serde(default = "default_true")]
    pub shuffle: bool,

    /// Book title quoted in generated answers.
    #[serde(default = "default_source_title")]
    pub source_title: String,

    /// Excerpt length for "used for" answers, in characters.
    #[serde(default = "default_excerpt_chars")]
    pub virtues_excerpt_chars: usize,

    /// Excerpt length for identification answers, in characters.
    #[serde(default = "default_excerpt_chars")]
    pub description_excerpt_chars: usize,

    /// Excerpt length for medicinal-properties answers, in characters.
    #[serde(default = "default_properties_excerpt_chars")]
    pub properties_excerpt_chars: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            shuffle: true,
            source_title: default_source_title(),
            virtues_excerpt_chars: default_excerpt_chars(),
            description_excerpt_chars: default_excerpt_chars(),
            properties_excerpt_chars: default_properties_excerpt_chars(),
        }
    }
}

fn default_seed() -> u64 {
    42
}
fn default_true() -> bool {
    true
}
fn default_source_title() -> String {
    "The Complete Herbal".into()
}
fn default_excerpt_chars() -> usize {
    500
}
fn default_properties_excerpt_chars() -> usize {
    600
}

/// `[files]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    #[serde(default = "default_herbs_file")]
    pub herbs: String,
    #[serde(default = "default_chunks_file")]
    pub chunks: String,
    #[serde(default = "default_qa_jsonl_file")]
    pub qa_jsonl: String,
    #[serde(default = "default_qa_json_file")]
    pub qa_json: String,
    #[serde(default = "default_manifest_file")]
    pub manifest: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            herbs: default_herbs_file(),
            chunks: default_chunks_file(),
            qa_jsonl: default_qa_jsonl_file(),
            qa_json: default_qa_json_file(),
            manifest: default_manifest_file(),
        }
    }
}

fn default_herbs_file() -> String {
    "herbs_structured.json".into()
}
fn default_chunks_file() -> String {
    "herbs_chunked.json".into()
}
fn default_qa_jsonl_file() -> String {
    "herbal_qa_training.jsonl".into()
}
fn default_qa_json_file() -> String {
    "herbal_qa_training.json".into()
}
fn default_manifest_file() -> String {
    "manifest.json".into()
}

// ---------------------------------------------------------------------------
// Artifact paths (runtime, resolved against an output directory)
// ---------------------------------------------------------------------------

/// Absolute locations of every artifact inside one output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub herbs: PathBuf,
    pub chunks: PathBuf,
    pub qa_jsonl: PathBuf,
    pub qa_json: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactPaths {
    /// Resolve the configured file names under `output_dir`.
    pub fn resolve(output_dir: &Path, files: &FilesConfig) -> Self {
        Self {
            herbs: output_dir.join(&files.herbs),
            chunks: output_dir.join(&files.chunks),
            qa_jsonl: output_dir.join(&files.qa_jsonl),
            qa_json: output_dir.join(&files.qa_json),
            manifest: output_dir.join(&files.manifest),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.herbarium/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| HerbariumError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.herbarium/herbarium.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| HerbariumError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        HerbariumError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    config
        .chunking
        .validate()
        .map_err(|e| HerbariumError::config(format!("{}: {e}", path.display())))?;

    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| HerbariumError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| HerbariumError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| HerbariumError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
