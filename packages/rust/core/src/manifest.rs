//! Run manifest written next to the dataset artifacts.
//!
//! Records where the data came from (source path and SHA-256), the chunking
//! parameters, and artifact counts. Q&A generation validates the manifest before
//! writing its pairs, then updates `qa_count` in place.

use std::path::Path;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use herbarium_dataset::{read_json, write_json};
use herbarium_shared::{
    CURRENT_SCHEMA_VERSION, ChunkConfig, HerbariumError, Result, RunId, RunManifest,
};

/// Inputs for a fresh manifest.
#[derive(Debug, Clone)]
pub struct ManifestInput<'a> {
    pub run_id: RunId,
    pub tool_version: &'a str,
    pub source_file: &'a Path,
    pub source_text: &'a str,
    pub herb_count: usize,
    pub chunk_count: usize,
    pub chunking: ChunkConfig,
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Build the manifest for a completed preprocessing run.
pub fn build_manifest(input: &ManifestInput<'_>) -> RunManifest {
    let now = Utc::now();
    RunManifest {
        schema_version: CURRENT_SCHEMA_VERSION,
        run_id: input.run_id.clone(),
        tool_version: input.tool_version.to_string(),
        source_file: input.source_file.display().to_string(),
        source_sha256: sha256_hex(input.source_text.as_bytes()),
        created_at: now,
        updated_at: now,
        herb_count: input.herb_count,
        chunk_count: input.chunk_count,
        qa_count: None,
        chunking: input.chunking,
    }
}

/// Read a manifest and check its schema version.
pub fn load_manifest(path: &Path) -> Result<RunManifest> {
    let manifest: RunManifest = read_json(path)?;

    if manifest.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(HerbariumError::validation(format!(
            "unsupported schema_version: {} (expected {})",
            manifest.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(manifest)
}

/// Load and validate the manifest at `path` if one exists.
///
/// Datasets produced by other tools have no manifest; that is `Ok(None)`.
pub fn load_manifest_if_present(path: &Path) -> Result<Option<RunManifest>> {
    if !path.exists() {
        debug!(path = %path.display(), "no manifest present");
        return Ok(None);
    }
    load_manifest(path).map(Some)
}

/// Store the Q&A pair count in a previously loaded manifest and write it back.
#[instrument(skip_all, fields(path = %path.display(), qa_count = qa_count))]
pub fn record_qa_count(path: &Path, mut manifest: RunManifest, qa_count: usize) -> Result<()> {
    manifest.qa_count = Some(qa_count);
    manifest.updated_at = Utc::now();
    write_json(path, &manifest)?;

    debug!("manifest updated with Q&A count");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "herbarium-manifest-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn sample_input(source: &Path) -> ManifestInput<'_> {
        ManifestInput {
            run_id: RunId::new(),
            tool_version: "0.1.0",
            source_file: source,
            source_text: "ROSEMARY.\n",
            herb_count: 1,
            chunk_count: 1,
            chunking: ChunkConfig::default(),
        }
    }

    #[test]
    fn sha256_of_known_input() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn build_sets_schema_and_hash() {
        let manifest = build_manifest(&sample_input(Path::new("herbal.txt")));
        assert_eq!(manifest.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(manifest.source_file, "herbal.txt");
        assert_eq!(manifest.source_sha256, sha256_hex(b"ROSEMARY.\n"));
        assert_eq!(manifest.qa_count, None);
        assert_eq!(manifest.created_at, manifest.updated_at);
    }

    #[test]
    fn record_qa_count_updates_existing_manifest() {
        let tmp = temp_dir();
        let path = tmp.join("manifest.json");
        let manifest = build_manifest(&sample_input(Path::new("herbal.txt")));
        write_json(&path, &manifest).unwrap();

        let loaded = load_manifest_if_present(&path).unwrap().unwrap();
        record_qa_count(&path, loaded, 42).unwrap();

        let reloaded = load_manifest(&path).unwrap();
        assert_eq!(reloaded.qa_count, Some(42));
        assert_eq!(reloaded.run_id, manifest.run_id);
        assert!(reloaded.updated_at >= manifest.updated_at);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_manifest_loads_as_none() {
        let tmp = temp_dir();
        let path = tmp.join("manifest.json");

        assert!(load_manifest_if_present(&path).unwrap().is_none());
        assert!(!path.exists());

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn load_rejects_unknown_schema() {
        let tmp = temp_dir();
        let path = tmp.join("manifest.json");
        let mut manifest = build_manifest(&sample_input(Path::new("herbal.txt")));
        manifest.schema_version = 99;
        write_json(&path, &manifest).unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(err.to_string().contains("schema_version: 99"));
        assert!(load_manifest_if_present(&path).is_err());

        std::fs::remove_dir_all(&tmp).ok();
    }
}
