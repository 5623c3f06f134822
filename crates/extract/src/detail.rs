// ABOUTME: Detail-page extraction: the horse's display name and labeled (label, value) fact pairs.
// ABOUTME: Walks the fact table row by row and pairs each known label cell with the cell after it.

//! Fact sheet extraction.
//!
//! A detail page carries the horse name in `<h1 class="fiche">` and its facts
//! in a table whose rows alternate label and value cells:
//!
//! ```text
//! <tr><td>Gains</td><td>1 234€</td><td>Sexe</td><td>F</td></tr>
//! ```
//!
//! Any cell whose text contains one of [`KNOWN_LABELS`] is a label; the cell
//! right after it is its value.

use scraper::Html;
use tracing::debug;

use crate::lookup::{find_all, find_first, find_first_text, root, text_of, Query};

/// Substrings that identify a label cell.
pub const KNOWN_LABELS: [&str; 6] = ["Gains", "Sexe", "Courues", "Age", "Victoires", "Placés"];

/// A raw label/value pair as found in the fact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactPair {
    pub label: String,
    pub value: String,
}

impl FactPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// What to do with a label that is the last cell of its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrailingLabel {
    /// Drop the label; no pair is produced.
    #[default]
    Skip,
    /// Produce the pair with an empty value.
    EmptyValue,
}

/// Pulls the name and fact pairs out of a parsed detail page.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailExtractor {
    trailing_label: TrailingLabel,
}

impl DetailExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trailing_label(mut self, policy: TrailingLabel) -> Self {
        self.trailing_label = policy;
        self
    }

    /// The horse's display name, trimmed. Empty when the heading is missing.
    pub fn name(&self, doc: &Html) -> String {
        let raw = find_first_text(root(doc), &Query::tag("h1").with_class("fiche"));
        raw.trim().to_string()
    }

    /// All (label, value) pairs from the page's fact table, in document order.
    ///
    /// Only the first `tbody` is read. A page without one yields no pairs.
    pub fn facts(&self, doc: &Html) -> Vec<FactPair> {
        let Some(body) = find_first(root(doc), &Query::tag("tbody")) else {
            debug!("no fact table on page");
            return Vec::new();
        };

        let mut pairs = Vec::new();
        for row in find_all(body, &Query::tag("tr")) {
            let cells: Vec<String> = find_all(row, &Query::tag("td")).into_iter().map(text_of).collect();

            for (i, cell) in cells.iter().enumerate() {
                if !is_label(cell) {
                    continue;
                }
                match (cells.get(i + 1), self.trailing_label) {
                    (Some(value), _) => pairs.push(FactPair::new(cell.as_str(), value.as_str())),
                    (None, TrailingLabel::EmptyValue) => pairs.push(FactPair::new(cell.as_str(), "")),
                    (None, TrailingLabel::Skip) => {
                        debug!(label = %cell.trim(), "label is the last cell of its row, skipped");
                    }
                }
            }
        }
        pairs
    }
}

fn is_label(text: &str) -> bool {
    KNOWN_LABELS.iter().any(|label| text.contains(label))
}
