//! Labeled-field extraction from an entry's accumulated text.
//!
//! Each field is located by its marker and runs until the first of an explicit
//! set of terminators. `Place.]` and `Time.]` only open a field at the start of
//! a line. The table below is the single source of truth; there is no
//! last-occurrence pass layered on top.

use std::sync::LazyLock;

use regex::Regex;

/// A labeled section inside a herb entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Place,
    Time,
    GovernmentVirtues,
}

impl Field {
    /// Literal prefix that opens the section in the source text.
    pub fn marker(self) -> &'static str {
        match self {
            Field::Description => "Descript.]",
            Field::Place => "Place.]",
            Field::Time => "Time.]",
            Field::GovernmentVirtues => "Government and virtues.]",
        }
    }
}

/// Where a field body stops.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    /// Another field's marker.
    Marker(Field),
    /// The end of the line holding the marker.
    LineEnd,
    /// A fixed string that opens unrelated material.
    Sentinel(&'static str),
}

/// How one field is located and where its body stops.
struct FieldSpec {
    field: Field,
    /// The marker only counts at the start of a line (after at most one space).
    line_start: bool,
    stops: &'static [Boundary],
}

/// Field bodies in extraction order. End of text always terminates.
const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec {
        field: Field::Description,
        line_start: false,
        stops: &[
            Boundary::Marker(Field::Place),
            Boundary::Marker(Field::Time),
            Boundary::Marker(Field::GovernmentVirtues),
        ],
    },
    FieldSpec {
        field: Field::Place,
        line_start: true,
        stops: &[
            Boundary::LineEnd,
            Boundary::Marker(Field::Time),
            Boundary::Marker(Field::GovernmentVirtues),
            Boundary::Marker(Field::Description),
        ],
    },
    FieldSpec {
        field: Field::Time,
        line_start: true,
        stops: &[
            Boundary::LineEnd,
            Boundary::Marker(Field::Place),
            Boundary::Marker(Field::GovernmentVirtues),
            Boundary::Marker(Field::Description),
        ],
    },
    FieldSpec {
        field: Field::GovernmentVirtues,
        line_start: false,
        stops: &[Boundary::Sentinel("WATER ")],
    },
];

static FIELD_PATTERNS: LazyLock<Vec<(Field, Regex)>> = LazyLock::new(|| {
    FIELD_SPECS
        .iter()
        .map(|spec| (spec.field, build_pattern(spec)))
        .collect()
});

fn build_pattern(spec: &FieldSpec) -> Regex {
    let line_bounded = spec.stops.iter().any(|b| matches!(b, Boundary::LineEnd));

    let mut stops: Vec<String> = spec
        .stops
        .iter()
        .filter_map(|b| match b {
            Boundary::Marker(other) => Some(regex::escape(other.marker())),
            Boundary::Sentinel(s) => Some(regex::escape(s)),
            Boundary::LineEnd => None,
        })
        .collect();
    // `$` under (?m) stops at each newline; `\z` is end of text in either mode.
    stops.push(if line_bounded { "$".into() } else { r"\z".into() });

    // `^` needs (?m) to match after each newline.
    let flags = match (line_bounded, spec.line_start) {
        (true, _) => "(?m)",
        (false, true) => "(?ms)",
        (false, false) => "(?s)",
    };
    let anchor = if spec.line_start { "^ ?" } else { "" };

    let pattern = format!(
        "{flags}{anchor}{}(.*?)(?:{})",
        regex::escape(spec.field.marker()),
        stops.join("|")
    );
    Regex::new(&pattern).expect("valid field regex")
}

/// The four labeled fields of one entry. Absent sections stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFields {
    pub description: String,
    pub place: String,
    pub time: String,
    pub government_virtues: String,
}

impl EntryFields {
    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Description => &mut self.description,
            Field::Place => &mut self.place,
            Field::Time => &mut self.time,
            Field::GovernmentVirtues => &mut self.government_virtues,
        }
    }
}

/// Extract every labeled field from cleaned entry text.
///
/// The first occurrence of a marker defines its field.
pub fn extract_fields(text: &str) -> EntryFields {
    let mut fields = EntryFields::default();
    for (field, pattern) in FIELD_PATTERNS.iter() {
        if let Some(body) = pattern.captures(text).and_then(|c| c.get(1)) {
            *fields.slot(*field) = body.as_str().trim().to_string();
        }
    }
    fields
}

/// Collapse blank-line runs and repeated spaces, then trim.
pub fn clean_text(text: &str) -> String {
    static NEWLINES_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));
    static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

    let collapsed = NEWLINES_RE.replace_all(text, "\n");
    let collapsed = SPACES_RE.replace_all(&collapsed, " ");
    collapsed.trim().to_string()
}
