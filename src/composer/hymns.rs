use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::hymn::Hymn;
use super::text::search_key;

/// Maximum number of autocomplete suggestions returned.
pub const MAX_HYMN_SUGGESTIONS: usize = 10;

/// The four hymn slots of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HymnField {
    Opening,
    Intermediate,
    Sacrament,
    Closing,
}

/// Hymn lookup keyed by number.
#[derive(Debug, Clone, Default)]
pub struct HymnTable {
    by_number: BTreeMap<i64, String>,
}

impl HymnTable {
    pub fn new(hymns: &[Hymn]) -> Self {
        let by_number = hymns
            .iter()
            .map(|h| (h.number, h.title.trim().to_string()))
            .collect();
        HymnTable { by_number }
    }

    pub fn title(&self, number: i64) -> Option<&str> {
        self.by_number.get(&number).map(String::as_str)
    }

    /// `"<number> - <title>"` for a hymn in the table.
    pub fn canonical(&self, number: i64) -> Option<String> {
        self.title(number).map(|title| format!("{number} - {title}"))
    }

    /// Resolve free hymn input against the table by its leading number.
    ///
    /// Input without a leading number, or whose number is not in the table,
    /// is returned unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        leading_number(raw)
            .and_then(|n| self.canonical(n))
            .unwrap_or_else(|| raw.to_string())
    }

    /// Autocomplete: number prefix when the query starts with a digit,
    /// otherwise a title substring match.
    pub fn suggestions(&self, query: &str) -> Vec<Hymn> {
        let query = query.trim();
        let by_digits = query.starts_with(|c: char| c.is_ascii_digit());
        let digits: String = query.chars().take_while(char::is_ascii_digit).collect();
        let needle = search_key(query);

        self.by_number
            .iter()
            .filter(|(number, title)| {
                if query.is_empty() {
                    true
                } else if by_digits {
                    number.to_string().starts_with(&digits)
                } else {
                    search_key(title).contains(&needle)
                }
            })
            .take(MAX_HYMN_SUGGESTIONS)
            .map(|(number, title)| Hymn { number: *number, title: title.clone() })
            .collect()
    }
}

/// The integer at the start of `raw` (leading whitespace ignored).
fn leading_number(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}
