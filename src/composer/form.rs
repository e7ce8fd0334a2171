use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::sacrament_meeting::{CallingChange, Discourse, IntermediateHymnType};
use super::hymns::HymnField;
use super::leaders::LeaderField;
use super::toggles::ToggleSet;

/// Field-level validation failure reported back to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        FieldError { field: field.to_string(), message: message.to_string() }
    }
}

/// Everything the program form holds while it is open.
///
/// Unlike `MeetingProgram`, rows here may be blank or stale, and leader
/// slots are kept as dropdown selections rather than composite strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerForm {
    pub date: String,
    pub presider: LeaderField,
    pub director: LeaderField,
    pub music_director: String,
    pub pianist: String,
    pub visiting_authority: String,
    pub opening_hymn: String,
    pub intermediate_hymn: String,
    pub intermediate_hymn_type: IntermediateHymnType,
    pub sacrament_hymn: String,
    pub closing_hymn: String,
    pub is_testimony_meeting: bool,
    pub discourses: Vec<Discourse>,
    pub releases: Vec<CallingChange>,
    pub sustainments: Vec<CallingChange>,
    pub new_members: Vec<String>,
    pub aaronic_orderings: Vec<String>,
    pub child_blessings: Vec<String>,
    pub confirmations: Vec<String>,
    pub stake_business: String,
    pub announcements: String,
    pub opening_prayer: String,
    pub closing_prayer: String,
    pub toggles: ToggleSet,
}

impl ComposerForm {
    pub fn hymn(&self, field: HymnField) -> &str {
        match field {
            HymnField::Opening => &self.opening_hymn,
            HymnField::Intermediate => &self.intermediate_hymn,
            HymnField::Sacrament => &self.sacrament_hymn,
            HymnField::Closing => &self.closing_hymn,
        }
    }

    pub fn hymn_mut(&mut self, field: HymnField) -> &mut String {
        match field {
            HymnField::Opening => &mut self.opening_hymn,
            HymnField::Intermediate => &mut self.intermediate_hymn,
            HymnField::Sacrament => &mut self.sacrament_hymn,
            HymnField::Closing => &mut self.closing_hymn,
        }
    }
}

/// Parse the meeting date (`YYYY-MM-DD`); the only required field.
pub fn validate_date(raw: &str) -> Result<NaiveDate, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::new("date", "La fecha es obligatoria"));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| FieldError::new("date", "La fecha debe tener el formato AAAA-MM-DD"))
}

/// Trim names and drop blank rows.
pub fn clean_names(rows: &[String]) -> Vec<String> {
    rows.iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(String::from)
        .collect()
}

/// Trim discourse rows and drop those with neither speaker nor topic.
pub fn clean_discourses(rows: &[Discourse]) -> Vec<Discourse> {
    rows.iter()
        .map(|d| Discourse {
            speaker: d.speaker.trim().to_string(),
            topic: d.topic.trim().to_string(),
        })
        .filter(|d| !d.speaker.is_empty() || !d.topic.is_empty())
        .collect()
}

/// Trim release/sustainment rows and drop those with neither name nor calling.
pub fn clean_calling_changes(rows: &[CallingChange]) -> Vec<CallingChange> {
    rows.iter()
        .map(|c| CallingChange {
            name: c.name.trim().to_string(),
            calling: c.calling.trim().to_string(),
            organization_id: c.organization_id,
        })
        .filter(|c| !c.name.is_empty() || !c.calling.is_empty())
        .collect()
}

/// The cleaned rows when the section is enabled, otherwise nothing.
pub fn gated<T>(enabled: bool, rows: Vec<T>) -> Vec<T> {
    if enabled { rows } else { Vec::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_validation() {
        assert_eq!(validate_date("").unwrap_err().field, "date");
        assert_eq!(validate_date("   ").unwrap_err().message, "La fecha es obligatoria");
        assert!(validate_date("17/10/2026").is_err());
        assert_eq!(
            validate_date(" 2026-10-18 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
        );
    }

    #[test]
    fn blank_rows_dropped() {
        let names = vec!["  Ana ".to_string(), "".into(), "   ".into(), "Luis".into()];
        assert_eq!(clean_names(&names), vec!["Ana", "Luis"]);

        let talks = vec![
            Discourse { speaker: " ".into(), topic: "".into() },
            Discourse { speaker: "".into(), topic: "Fe".into() },
        ];
        assert_eq!(clean_discourses(&talks), vec![Discourse { speaker: "".into(), topic: "Fe".into() }]);

        let changes = vec![
            CallingChange { name: "  ".into(), calling: " ".into(), organization_id: Some(3) },
            CallingChange { name: "Eva ".into(), calling: "Maestra".into(), organization_id: None },
        ];
        let cleaned = clean_calling_changes(&changes);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].name, "Eva");
    }

    #[test]
    fn gate_discards_rows_when_disabled() {
        assert!(gated(false, vec![1, 2]).is_empty());
        assert_eq!(gated(true, vec![1, 2]), vec![1, 2]);
    }
}
