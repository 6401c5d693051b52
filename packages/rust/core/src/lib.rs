//! Herbarium core: pipeline orchestration and run manifests.
//!
//! This crate wires the segmenter and dataset crates into the
//! `preprocess` → `qa` pipeline and records each run in `manifest.json`.

pub mod manifest;
pub mod pipeline;
