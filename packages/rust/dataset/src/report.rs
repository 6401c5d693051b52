//! Quality summary over the generated dataset.

use serde::Serialize;

use herbarium_shared::{Entry, QaPair};

/// Minimum description and virtues length, in characters, for a herb to count
/// as having good content.
const GOOD_CONTENT_MIN_CHARS: usize = 50;

/// Counts describing one dataset directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetReport {
    pub herb_count: usize,
    /// Herbs whose description and virtues both exceed the minimum length.
    pub good_herb_count: usize,
    pub qa_total: usize,
    pub herb_specific: usize,
    pub general: usize,
    pub ailment: usize,
    pub instruction_following: usize,
    /// Mean `output` length in characters.
    pub avg_answer_chars: f64,
}

impl DatasetReport {
    /// Tally entries and pairs. `source_title` identifies general questions.
    pub fn build(entries: &[Entry], pairs: &[QaPair], source_title: &str) -> Self {
        let good_herb_count = entries
            .iter()
            .filter(|e| {
                e.description.chars().count() > GOOD_CONTENT_MIN_CHARS
                    && e.government_virtues.chars().count() > GOOD_CONTENT_MIN_CHARS
            })
            .count();

        let total_chars: usize = pairs.iter().map(|p| p.output.chars().count()).sum();
        let avg_answer_chars = if pairs.is_empty() {
            0.0
        } else {
            total_chars as f64 / pairs.len() as f64
        };

        Self {
            herb_count: entries.len(),
            good_herb_count,
            qa_total: pairs.len(),
            herb_specific: count_matching(pairs, |i| {
                i.contains("used for") || i.contains("medicinal properties")
            }),
            general: count_matching(pairs, |i| i.contains(source_title)),
            ailment: count_matching(pairs, |i| i.contains("help with")),
            instruction_following: count_matching(pairs, |i| i.contains("Only answer questions")),
            avg_answer_chars,
        }
    }
}

fn count_matching(pairs: &[QaPair], pred: impl Fn(&str) -> bool) -> usize {
    pairs.iter().filter(|p| pred(&p.instruction)).count()
}
