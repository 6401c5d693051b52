//! Instruction/input/output example generation from structured herb entries.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, instrument};

use herbarium_shared::{Entry, QaConfig, QaPair};

/// Ailments paired with herb keywords looked up in each entry's virtues.
const AILMENT_KEYWORDS: &[(&str, &[&str])] = &[
    ("headache", &["Rosemary", "Lavender", "Peppermint"]),
    ("digestive issues", &["Chamomile", "Peppermint", "Ginger"]),
    ("cough", &["Coltsfoot", "Marshmallow", "Horehound"]),
    ("wounds", &["Plantain", "Yarrow", "Comfrey"]),
    ("fever", &["Willow bark", "Elderflower", "Peppermint"]),
    ("insomnia", &["Valerian", "Chamomile", "Lavender"]),
    ("skin problems", &["Calendula", "Aloe", "Plantain"]),
    ("liver problems", &["Milk thistle", "Dandelion", "Burdock"]),
];

/// Maximum number of herbs named in one ailment answer.
const MAX_AILMENT_HERBS: usize = 3;

/// Generates Q&A pairs for a set of entries.
pub struct QaGenerator<'a> {
    entries: &'a [Entry],
    config: &'a QaConfig,
}

impl<'a> QaGenerator<'a> {
    pub fn new(entries: &'a [Entry], config: &'a QaConfig) -> Self {
        Self { entries, config }
    }

    /// Generate every category of pair, shuffled when configured.
    #[instrument(skip_all, fields(entries = self.entries.len(), seed = self.config.seed))]
    pub fn generate(&self) -> Vec<QaPair> {
        let mut pairs: Vec<QaPair> = self
            .entries
            .iter()
            .flat_map(|entry| self.herb_pairs(entry))
            .collect();
        let herb_count = pairs.len();

        pairs.extend(self.general_pairs());
        let ailment = self.ailment_pairs();
        let ailment_count = ailment.len();
        pairs.extend(ailment);
        pairs.extend(self.instruction_pairs());

        debug!(herb_count, ailment_count, "generated pair groups");

        if self.config.shuffle {
            let mut rng = StdRng::seed_from_u64(self.config.seed);
            pairs.shuffle(&mut rng);
        }

        info!(total = pairs.len(), "Q&A generation complete");
        pairs
    }

    /// Up to five pairs about one herb, one per non-empty field it draws on.
    pub fn herb_pairs(&self, entry: &Entry) -> Vec<QaPair> {
        let name = &entry.name;
        let title = &self.config.source_title;
        let mut pairs = Vec::new();

        if !entry.government_virtues.is_empty() {
            pairs.push(QaPair::new(
                format!("What is {name} used for?"),
                format!(
                    "{name} is used for various medicinal purposes. According to {title}: {}...",
                    excerpt(&entry.government_virtues, self.config.virtues_excerpt_chars)
                ),
            ));
        }

        if !entry.description.is_empty() {
            pairs.push(QaPair::new(
                format!("How do you identify {name}?"),
                format!(
                    "According to {title}, {name} can be identified by: {}...",
                    excerpt(&entry.description, self.config.description_excerpt_chars)
                ),
            ));
        }

        if !entry.place.is_empty() {
            pairs.push(QaPair::new(
                format!("Where does {name} grow?"),
                format!("{name} grows {}.", entry.place),
            ));
        }

        if !entry.time.is_empty() {
            pairs.push(QaPair::new(
                format!("When does {name} flower?"),
                format!("According to {title}, {name} {}.", entry.time),
            ));
        }

        if !entry.government_virtues.is_empty() {
            pairs.push(QaPair::new(
                format!("What are the medicinal properties of {name}?"),
                format!(
                    "{title} describes {name} as having these medicinal properties: {}...",
                    excerpt(&entry.government_virtues, self.config.properties_excerpt_chars)
                ),
            ));
        }

        pairs
    }

    /// Fixed questions about the book itself.
    pub fn general_pairs(&self) -> Vec<QaPair> {
        let title = &self.config.source_title;
        vec![
            QaPair::new(
                format!("What is {title}?"),
                format!(
                    "{title} is a comprehensive guide to herbal medicine written by Nicholas Culpeper, M.D. \
                     It contains descriptions, medicinal properties, and uses of hundreds of herbs and plants \
                     for treating various ailments and disorders."
                ),
            ),
            QaPair::new(
                format!("Who wrote {title}?"),
                format!(
                    "{title} was written by Nicholas Culpeper, M.D. It was first published in the 1600s \
                     and has been reprinted many times since."
                ),
            ),
            QaPair::new(
                "How should I use herbal remedies?",
                format!(
                    "According to {title}, herbal remedies should be used according to the true system of nature. \
                     The book provides specific instructions for each herb, including preparation methods, dosages, \
                     and application techniques. Always consult with a qualified healthcare provider before using \
                     any herbal remedies."
                ),
            ),
            QaPair::new(
                format!("What are the main categories of herbs in {title}?"),
                format!(
                    "{title} categorizes herbs by their medicinal and occult qualities, including herbs for the head, \
                     brain, memory, blood cleansing, liver health, digestive issues, respiratory problems, and many \
                     other bodily systems and disorders."
                ),
            ),
        ]
    }

    /// One pair per ailment whose keywords appear in at least one entry's virtues.
    pub fn ailment_pairs(&self) -> Vec<QaPair> {
        let title = &self.config.source_title;
        let mut pairs = Vec::new();

        for (ailment, keywords) in AILMENT_KEYWORDS {
            let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
            let relevant: Vec<&str> = self
                .entries
                .iter()
                .filter(|entry| {
                    let virtues = entry.government_virtues.to_lowercase();
                    !virtues.is_empty() && keywords.iter().any(|k| virtues.contains(k.as_str()))
                })
                .map(|entry| entry.name.as_str())
                .take(MAX_AILMENT_HERBS)
                .collect();

            if relevant.is_empty() {
                continue;
            }

            pairs.push(QaPair::new(
                format!("What herbs can help with {ailment}?"),
                format!(
                    "According to {title}, several herbs may help with {ailment}: {}. However, always consult \
                     with a healthcare provider for proper diagnosis and treatment.",
                    relevant.join(", ")
                ),
            ));
        }

        pairs
    }

    /// Fixed examples teaching scope, citation, and admitting ignorance.
    pub fn instruction_pairs(&self) -> Vec<QaPair> {
        let title = &self.config.source_title;
        vec![
            QaPair::with_input(
                format!(
                    "Only answer questions about herbs and herbal medicine from {title}. \
                     If asked about something else, politely decline."
                ),
                "What is the capital of France?",
                format!(
                    "I can only answer questions about herbs and herbal medicine from {title}. I cannot provide \
                     information about geography or other topics outside the scope of this herbal text."
                ),
            ),
            QaPair::with_input(
                format!("Always cite {title} as your source when providing herbal information."),
                "What is rosemary good for?",
                format!(
                    "According to {title}, rosemary has various medicinal properties. However, I would need to \
                     look up the specific details about rosemary in the text to give you an accurate answer \
                     based on Culpeper's descriptions."
                ),
            ),
            QaPair::with_input(
                "If you don't know the answer to a question about herbs, say so rather than guessing.",
                format!("What is the rarest herb mentioned in {title}?"),
                format!(
                    "I don't have enough information from {title} to determine which herb is the rarest. \
                     The text describes many herbs but doesn't specifically rank them by rarity."
                ),
            ),
        ]
    }
}

/// The first `max_chars` characters of `text`.
fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
