//! Fixed-size, overlapping word windows over entry text.

use std::collections::HashSet;

use tracing::{debug, instrument};

use herbarium_shared::{Chunk, ChunkConfig, Entry, Result};

/// Slice one entry's cleaned text into overlapping word windows.
///
/// Windows start at multiples of `max_words - overlap`. The last window is the
/// first one that reaches the final word, so an entry of `max_words` words or
/// fewer yields exactly one chunk. Text with no words yields none.
pub fn chunk_entry(entry: &Entry, config: &ChunkConfig) -> Result<Vec<Chunk>> {
    config.validate()?;

    let words: Vec<&str> = entry.words().collect();
    let stride = config.stride();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + config.max_words).min(words.len());
        chunks.push(Chunk {
            herb_name: entry.name.clone(),
            chunk_id: format!("{}_{}", entry.name, chunks.len()),
            text: words[start..end].join(" "),
            word_count: end - start,
            start_word: start,
        });

        if end == words.len() {
            break;
        }
        start += stride;
    }

    Ok(chunks)
}

/// Chunk every entry, preserving entry order.
#[instrument(skip_all, fields(entries = entries.len(), max_words = config.max_words, overlap = config.overlap))]
pub fn chunk_entries(entries: &[Entry], config: &ChunkConfig) -> Result<Vec<Chunk>> {
    let mut all = Vec::new();
    for entry in entries {
        let chunks = chunk_entry(entry, config)?;
        debug!(herb = %entry.name, chunks = chunks.len(), "chunked entry");
        all.extend(chunks);
    }
    Ok(all)
}

/// Chunks whose `herb_name` matches no entry in `entries`.
pub fn orphan_chunks<'a>(entries: &[Entry], chunks: &'a [Chunk]) -> Vec<&'a Chunk> {
    let names: HashSet<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    chunks
        .iter()
        .filter(|c| !names.contains(c.herb_name.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_words(name: &str, n: usize) -> Entry {
        let cleaned_text = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        Entry {
            name: name.into(),
            cleaned_text,
            ..Default::default()
        }
    }

    fn cfg(max_words: usize, overlap: usize) -> ChunkConfig {
        ChunkConfig::new(max_words, overlap).unwrap()
    }

    fn assert_covers(chunks: &[Chunk], n: usize) {
        assert_eq!(chunks.first().map(|c| c.start_word), Some(0));
        assert_eq!(chunks.last().map(|c| c.end_word()), Some(n));
        for pair in chunks.windows(2) {
            assert!(pair[0].start_word < pair[1].start_word);
            // No gap between consecutive windows.
            assert!(pair[1].start_word <= pair[0].end_word());
        }
    }

    #[test]
    fn short_entry_yields_single_chunk() {
        let entry = entry_with_words("SAGE", 250);
        let chunks = chunk_entry(&entry, &cfg(1000, 200)).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count, 250);
        assert_eq!(chunks[0].start_word, 0);
        assert_eq!(chunks[0].chunk_id, "SAGE_0");
        assert_eq!(chunks[0].herb_name, "SAGE");
    }

    #[test]
    fn long_entry_overlaps_windows() {
        let entry = entry_with_words("ROSEMARY", 1800);
        let chunks = chunk_entry(&entry, &cfg(1000, 100)).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].start_word, 0);
        assert_eq!(chunks[0].word_count, 1000);
        assert_eq!(chunks[1].start_word, 900);
        assert_eq!(chunks[1].word_count, 900);
        assert_eq!(chunks[1].chunk_id, "ROSEMARY_1");
        assert!(chunks[1].text.starts_with("w900 "));
        assert!(chunks[1].text.ends_with(" w1799"));
    }

    #[test]
    fn entry_between_stride_and_window_is_one_chunk() {
        let entry = entry_with_words("DILL", 950);
        let chunks = chunk_entry(&entry, &cfg(1000, 100)).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].word_count, 950);
    }

    #[test]
    fn chunk_count_matches_closed_form() {
        for (n, w, o) in [
            (1001, 1000, 100),
            (1850, 1000, 100),
            (2800, 1000, 100),
            (37, 10, 3),
            (10, 10, 3),
            (11, 10, 0),
            (500, 7, 6),
        ] {
            let chunks = chunk_entry(&entry_with_words("X", n), &cfg(w, o)).unwrap();
            let expected = if n <= w {
                1
            } else {
                (n - o).div_ceil(w - o)
            };
            assert_eq!(chunks.len(), expected, "n={n} w={w} o={o}");
            assert_covers(&chunks, n);
        }
    }

    #[test]
    fn text_joins_words_with_single_spaces() {
        let entry = Entry {
            name: "RUE".into(),
            cleaned_text: "RUE.\nDescript.] A  small\tshrub.".into(),
            ..Default::default()
        };
        let chunks = chunk_entry(&entry, &cfg(3, 1)).unwrap();
        assert_eq!(chunks[0].text, "RUE. Descript.] A");
        assert_eq!(chunks[1].text, "A small shrub.");
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunks = chunk_entry(&entry_with_words("EMPTY", 0), &cfg(10, 2)).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = ChunkConfig {
            max_words: 10,
            overlap: 10,
        };
        assert!(chunk_entry(&entry_with_words("X", 5), &bad).is_err());
    }

    #[test]
    fn chunk_entries_keeps_entry_order() {
        let entries = vec![entry_with_words("A", 15), entry_with_words("B", 5)];
        let chunks = chunk_entries(&entries, &cfg(10, 5)).unwrap();
        let names: Vec<_> = chunks.iter().map(|c| c.herb_name.as_str()).collect();
        assert_eq!(names, ["A", "A", "B"]);
        assert!(orphan_chunks(&entries, &chunks).is_empty());
    }

    #[test]
    fn orphan_chunks_are_reported() {
        let entries = vec![entry_with_words("A", 3)];
        let mut chunks = chunk_entries(&entries, &cfg(10, 0)).unwrap();
        chunks.extend(chunk_entry(&entry_with_words("GHOST", 3), &cfg(10, 0)).unwrap());

        let orphans = orphan_chunks(&entries, &chunks);
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].herb_name, "GHOST");
    }
}
