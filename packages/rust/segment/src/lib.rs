//! Herb-entry segmentation and word-window chunking.
//!
//! Scans the plaintext herbal line by line, opens a new entry at every all-caps
//! heading line (`ROSEMARY.`), and hands each finished entry to the field
//! extractor. Lines before the first heading are dropped.
//!
//! Known limitation: an all-caps sentence ending in a period inside body text is
//! indistinguishable from a heading and starts a new entry.

pub mod chunk;
pub mod fields;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use herbarium_shared::Entry;

pub use chunk::{chunk_entries, chunk_entry, orphan_chunks};
pub use fields::{EntryFields, Field, clean_text, extract_fields};

// ---------------------------------------------------------------------------
// Heading detection
// ---------------------------------------------------------------------------

/// If `line` is a heading line, return the herb name it introduces.
pub fn heading_name(line: &str) -> Option<&str> {
    static HEADING_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s']+\.$").expect("valid regex"));

    let trimmed = line.trim();
    HEADING_RE
        .is_match(trimmed)
        .then(|| trimmed.trim_end_matches('.'))
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// An entry still accumulating lines.
#[derive(Debug)]
struct Draft {
    name: String,
    full_text: String,
}

impl Draft {
    fn open(name: &str, heading: &str) -> Self {
        let mut draft = Self {
            name: name.to_string(),
            full_text: String::new(),
        };
        draft.push(heading);
        draft
    }

    fn push(&mut self, line: &str) {
        self.full_text.push_str(line);
        self.full_text.push('\n');
    }

    fn finish(self) -> Entry {
        let cleaned_text = clean_text(&self.full_text);
        let fields = extract_fields(&cleaned_text);
        debug!(
            herb = %self.name,
            description_len = fields.description.len(),
            virtues_len = fields.government_virtues.len(),
            "entry finalized"
        );

        Entry {
            name: self.name,
            description: fields.description,
            place: fields.place,
            time: fields.time,
            government_virtues: fields.government_virtues,
            full_text: self.full_text,
            cleaned_text,
        }
    }
}

/// Segment an ordered sequence of lines into herb entries, in document order.
///
/// Each entry owns its heading line and every line up to the next heading,
/// stored verbatim in `full_text`.
#[instrument(skip_all)]
pub fn segment_lines<I>(lines: I) -> Vec<Entry>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut entries = Vec::new();
    let mut current: Option<Draft> = None;

    for line in lines {
        let line = line.as_ref();
        match heading_name(line) {
            Some(name) => {
                if let Some(done) = current.replace(Draft::open(name, line)) {
                    entries.push(done.finish());
                }
            }
            None => {
                if let Some(draft) = current.as_mut() {
                    draft.push(line);
                }
            }
        }
    }
    entries.extend(current.map(Draft::finish));

    if entries.is_empty() {
        debug!("no heading lines found, document produced no entries");
    } else {
        debug!(entries = entries.len(), "segmentation complete");
    }

    entries
}

/// Segment a whole document, splitting on `\n`.
pub fn segment_text(text: &str) -> Vec<Entry> {
    segment_lines(text.split('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_detection() {
        assert_eq!(heading_name("ROSEMARY."), Some("ROSEMARY"));
        assert_eq!(heading_name("  ADDER'S TONGUE.  "), Some("ADDER'S TONGUE"));
        assert_eq!(heading_name("WATER BETONY."), Some("WATER BETONY"));

        assert_eq!(heading_name("Rosemary."), None);
        assert_eq!(heading_name("ROSEMARY"), None);
        assert_eq!(heading_name("ROSEMARY, SAGE."), None);
        assert_eq!(heading_name("A."), None);
        assert_eq!(heading_name("ROSEMARY. It grows"), None);
        assert_eq!(heading_name(""), None);
    }

    #[test]
    fn two_entries_with_fields() {
        let lines = [
            "ROSEMARY.",
            "Descript.] A shrub with narrow leaves.",
            "Place.] Gardens.",
            "SAGE.",
            "Descript.] A low plant.",
        ];
        let entries = segment_lines(lines);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "ROSEMARY");
        assert_eq!(entries[0].description, "A shrub with narrow leaves.");
        assert_eq!(entries[0].place, "Gardens.");
        assert_eq!(entries[1].name, "SAGE");
        assert_eq!(entries[1].description, "A low plant.");
        assert_eq!(entries[1].place, "");
        assert_eq!(entries[1].time, "");
    }

    #[test]
    fn no_headings_yields_no_entries() {
        assert!(segment_text("").is_empty());
        assert!(segment_text("   \n\t\n").is_empty());
        assert!(segment_text("Descript.] Orphan field.\nPlace.] Nowhere.").is_empty());
    }

    #[test]
    fn preamble_lines_are_dropped() {
        let entries = segment_text("THE COMPLETE HERBAL\nby Culpeper\nPlace.] Ignored.\nDILL.\nBody.");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "DILL");
        assert_eq!(entries[0].place, "");
        assert_eq!(entries[0].full_text, "DILL.\nBody.\n");
    }

    #[test]
    fn full_text_reproduces_owned_lines() {
        let lines = [
            "ALEHOOF.",
            "  Descript.] Creeping stalks.",
            "",
            "Time.] All summer.",
            "BETONY.",
            "Place.] Woods.",
        ];
        let entries = segment_lines(lines);

        assert_eq!(entries.len(), 2);
        let rebuilt: String = lines[..4].iter().map(|l| format!("{l}\n")).collect();
        assert_eq!(entries[0].full_text, rebuilt);
        let rebuilt: String = lines[4..].iter().map(|l| format!("{l}\n")).collect();
        assert_eq!(entries[1].full_text, rebuilt);
    }

    #[test]
    fn n_headings_yield_n_entries_in_order() {
        let names = ["AGRIMONY", "ANGELICA", "BALM", "BAY TREE", "CAMOMILE"];
        let doc: String = names
            .iter()
            .map(|n| format!("{n}.\nDescript.] About {n}.\n\n"))
            .collect();

        let entries = segment_text(&doc);
        let got: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(got, names);
        for entry in &entries {
            assert_eq!(entry.description, format!("About {}.", entry.name));
        }
    }

    #[test]
    fn multi_line_description_is_captured() {
        let doc = "BORAGE.\nDescript.] Great rough leaves.\nThe flowers are blue.\nPlace.] Gardens.\nTime.] June and July.\nGovernment and virtues.] A herb of Jupiter.\nIt comforts the heart.";
        let entries = segment_text(doc);
        let borage = &entries[0];

        assert_eq!(
            borage.description,
            "Great rough leaves.\nThe flowers are blue."
        );
        assert_eq!(borage.place, "Gardens.");
        assert_eq!(borage.time, "June and July.");
        assert_eq!(
            borage.government_virtues,
            "A herb of Jupiter.\nIt comforts the heart."
        );
    }

    #[test]
    fn short_later_prefix_does_not_clobber_field() {
        let doc = "FENNEL.\nPlace.] Gardens and by the sea side.\nPlace.] see above.";
        let entries = segment_text(doc);
        assert_eq!(entries[0].place, "Gardens and by the sea side.");
    }

    #[test]
    fn all_caps_sentence_in_body_starts_new_entry() {
        let doc = "MUGWORT.\nGovernment and virtues.] Good for women.\nTAKE HEED.\nMore text.";
        let entries = segment_text(doc);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["MUGWORT", "TAKE HEED"]);
        assert_eq!(entries[0].government_virtues, "Good for women.");
    }

    #[test]
    fn mid_line_time_marker_leaves_time_empty() {
        let entries = segment_text("DILL.\nDescript.] Grows like the Time.] of year.\n  Place.] Gardens.");
        let dill = &entries[0];
        assert_eq!(dill.description, "Grows like the");
        assert_eq!(dill.place, "Gardens.");
        assert_eq!(dill.time, "");
    }

    fn load_fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/text")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn segment_sample_fixture() {
        let entries = segment_text(&load_fixture("herbal_sample.txt"));
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        // "ALEHOOF, OR GROUND-IVY." has punctuation and is not a heading.
        assert_eq!(names, ["AGRIMONY", "ANGELICA", "WATER ANGELICA"]);

        let agrimony = &entries[0];
        assert!(agrimony.description.starts_with("This has divers long leaves"));
        assert!(agrimony.description.ends_with("up the stalks."));
        assert_eq!(
            agrimony.place,
            "It groweth upon banks, near the sides of hedges or pales."
        );
        assert!(agrimony.time.starts_with("It flowereth in July"));
        assert!(agrimony.government_virtues.contains("Lavender"));
        assert!(agrimony.government_virtues.ends_with("several names."));

        let angelica = &entries[1];
        assert_eq!(angelica.description, "");
        assert_eq!(
            angelica.government_virtues,
            "It is an herb of the Sun in Leo; let it be gathered when he is there.\nIt resists poison, and helps the cough."
        );

        let water = &entries[2];
        assert_eq!(water.place, "This grows in watery places.");
        assert_eq!(water.government_virtues, "It is of like virtue, though weaker.");
    }

    #[test]
    fn cleaned_text_collapses_blank_lines() {
        let entries = segment_text("TANSY.\n\n\nDescript.]  Yellow   buttons.\n\n");
        assert_eq!(entries[0].cleaned_text, "TANSY.\nDescript.] Yellow buttons.");
        assert_eq!(entries[0].description, "Yellow buttons.");
    }
}
