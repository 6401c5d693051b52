//! End-to-end pipeline: plaintext herbal → entries → chunks → Q&A pairs.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument, warn};

use herbarium_dataset::{DatasetReport, QaGenerator, read_json, read_jsonl, write_json, write_jsonl};
use herbarium_segment::{chunk_entries, orphan_chunks, segment_text};
use herbarium_shared::{
    ArtifactPaths, Chunk, ChunkConfig, Entry, FilesConfig, HerbariumError, QaConfig, QaPair,
    Result, RunId,
};

use crate::manifest::{self, ManifestInput};

/// Configuration for the `preprocess` stage.
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Plaintext herbal to segment.
    pub input: PathBuf,
    /// Directory that receives the artifacts (created if absent).
    pub output_dir: PathBuf,
    pub chunking: ChunkConfig,
    pub files: FilesConfig,
    /// Tool version string recorded in the manifest.
    pub tool_version: String,
}

/// Result of the `preprocess` stage.
#[derive(Debug)]
pub struct PreprocessResult {
    pub run_id: RunId,
    pub herb_count: usize,
    pub chunk_count: usize,
    pub paths: ArtifactPaths,
    pub elapsed: std::time::Duration,
}

/// Configuration for the Q&A generation stage.
#[derive(Debug, Clone)]
pub struct QaRunConfig {
    /// Directory holding the preprocess artifacts; Q&A files are written here too.
    pub output_dir: PathBuf,
    pub qa: QaConfig,
    pub files: FilesConfig,
}

/// Result of the Q&A generation stage.
#[derive(Debug)]
pub struct QaRunResult {
    pub qa_count: usize,
    pub paths: ArtifactPaths,
    pub elapsed: std::time::Duration,
}

/// Result of a full `run`.
#[derive(Debug)]
pub struct RunResult {
    pub preprocess: PreprocessResult,
    pub qa: QaRunResult,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after an artifact file is written.
    fn artifact_written(&self, path: &Path, records: usize);
    /// Called when a stage completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn artifact_written(&self, _path: &Path, _records: usize) {}
    fn done(&self) {}
}

/// Segment and chunk the source text, then write entries, chunks, and manifest.
#[instrument(skip_all, fields(input = %config.input.display(), out = %config.output_dir.display()))]
pub fn preprocess(
    config: &PreprocessConfig,
    progress: &dyn ProgressReporter,
) -> Result<PreprocessResult> {
    let start = Instant::now();
    let run_id = RunId::new();
    config.chunking.validate()?;

    info!(%run_id, "starting preprocess");

    // --- Phase 1: Load ---
    progress.phase("Loading herbal text");
    let text = std::fs::read_to_string(&config.input)
        .map_err(|e| HerbariumError::io(&config.input, e))?;

    // --- Phase 2: Segment ---
    progress.phase("Extracting herb entries");
    let entries = segment_text(&text);
    if entries.is_empty() {
        warn!("source contains no herb headings, writing empty dataset");
    }
    info!(herbs = entries.len(), "herb entries extracted");

    // --- Phase 3: Chunk ---
    progress.phase("Creating text chunks");
    let chunks = chunk_entries(&entries, &config.chunking)?;
    let orphans = orphan_chunks(&entries, &chunks);
    if !orphans.is_empty() {
        return Err(HerbariumError::validation(format!(
            "{} chunks reference unknown herbs (first: {})",
            orphans.len(),
            orphans[0].chunk_id
        )));
    }
    info!(chunks = chunks.len(), "text chunks created");

    // --- Phase 4: Write artifacts ---
    progress.phase("Writing artifacts");
    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| HerbariumError::io(&config.output_dir, e))?;
    let paths = ArtifactPaths::resolve(&config.output_dir, &config.files);

    write_json(&paths.herbs, &entries)?;
    progress.artifact_written(&paths.herbs, entries.len());
    write_json(&paths.chunks, &chunks)?;
    progress.artifact_written(&paths.chunks, chunks.len());

    let manifest = manifest::build_manifest(&ManifestInput {
        run_id: run_id.clone(),
        tool_version: &config.tool_version,
        source_file: &config.input,
        source_text: &text,
        herb_count: entries.len(),
        chunk_count: chunks.len(),
        chunking: config.chunking,
    });
    write_json(&paths.manifest, &manifest)?;
    progress.artifact_written(&paths.manifest, 1);

    let result = PreprocessResult {
        run_id,
        herb_count: entries.len(),
        chunk_count: chunks.len(),
        paths,
        elapsed: start.elapsed(),
    };

    progress.done();
    info!(
        run_id = %result.run_id,
        herbs = result.herb_count,
        chunks = result.chunk_count,
        elapsed_ms = result.elapsed.as_millis(),
        "preprocess complete"
    );

    Ok(result)
}

/// Generate Q&A pairs from the preprocess artifacts and write JSONL + JSON.
#[instrument(skip_all, fields(out = %config.output_dir.display()))]
pub fn generate_qa(config: &QaRunConfig, progress: &dyn ProgressReporter) -> Result<QaRunResult> {
    let start = Instant::now();
    let paths = ArtifactPaths::resolve(&config.output_dir, &config.files);

    progress.phase("Loading structured herbs");
    let entries: Vec<Entry> = read_json(&paths.herbs)?;
    let chunks: Vec<Chunk> = read_json(&paths.chunks)?;
    info!(herbs = entries.len(), chunks = chunks.len(), "loaded dataset");

    let orphans = orphan_chunks(&entries, &chunks);
    if !orphans.is_empty() {
        warn!(
            orphans = orphans.len(),
            "chunks file references herbs missing from the entries file"
        );
    }

    // The manifest must load cleanly before any Q&A file is written.
    let run_manifest = manifest::load_manifest_if_present(&paths.manifest)?;

    progress.phase("Generating Q&A pairs");
    let pairs = QaGenerator::new(&entries, &config.qa).generate();

    progress.phase("Writing Q&A pairs");
    write_jsonl(&paths.qa_jsonl, &pairs)?;
    progress.artifact_written(&paths.qa_jsonl, pairs.len());
    write_json(&paths.qa_json, &pairs)?;
    progress.artifact_written(&paths.qa_json, pairs.len());

    if let Some(run_manifest) = run_manifest {
        manifest::record_qa_count(&paths.manifest, run_manifest, pairs.len())?;
    }

    let result = QaRunResult {
        qa_count: pairs.len(),
        paths,
        elapsed: start.elapsed(),
    };

    progress.done();
    info!(
        qa_count = result.qa_count,
        elapsed_ms = result.elapsed.as_millis(),
        "Q&A generation complete"
    );

    Ok(result)
}

/// Run `preprocess` followed by `generate_qa` on the same output directory.
pub fn run(
    preprocess_config: &PreprocessConfig,
    qa: &QaConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunResult> {
    let preprocess_result = preprocess(preprocess_config, progress)?;

    let qa_config = QaRunConfig {
        output_dir: preprocess_config.output_dir.clone(),
        qa: qa.clone(),
        files: preprocess_config.files.clone(),
    };
    let qa_result = generate_qa(&qa_config, progress)?;

    Ok(RunResult {
        preprocess: preprocess_result,
        qa: qa_result,
    })
}

/// Summarize an output directory's entries and Q&A pairs.
#[instrument(skip_all, fields(out = %output_dir.display()))]
pub fn check_dataset(
    output_dir: &Path,
    files: &FilesConfig,
    source_title: &str,
) -> Result<DatasetReport> {
    let paths = ArtifactPaths::resolve(output_dir, files);
    let entries: Vec<Entry> = read_json(&paths.herbs)?;
    let pairs: Vec<QaPair> = read_jsonl(&paths.qa_jsonl)?;

    Ok(DatasetReport::build(&entries, &pairs, source_title))
}
