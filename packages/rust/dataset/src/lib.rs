//! Training-data artifacts: Q&A generation, JSON/JSONL I/O, and quality reports.

pub mod io;
pub mod qa;
pub mod report;

pub use io::{read_json, read_jsonl, write_json, write_jsonl};
pub use qa::QaGenerator;
pub use report::DatasetReport;
