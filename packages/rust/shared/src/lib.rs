//! Shared types, error model, and configuration for Herbarium.
//!
//! This crate is the foundation depended on by all other Herbarium crates.
//! It provides:
//! - [`HerbariumError`]: the unified error type
//! - Domain types ([`Entry`], [`Chunk`], [`QaPair`], [`RunManifest`])
//! - Configuration ([`AppConfig`], [`ChunkConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ArtifactPaths, ChunkConfig, DefaultsConfig, FilesConfig, QaConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{HerbariumError, Result};
pub use types::{CURRENT_SCHEMA_VERSION, Chunk, Entry, QaPair, RunId, RunManifest};
