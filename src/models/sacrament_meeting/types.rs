use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who sings the intermediate hymn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntermediateHymnType {
    #[default]
    Congregation,
    Choir,
}

impl IntermediateHymnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntermediateHymnType::Congregation => "congregation",
            IntermediateHymnType::Choir => "choir",
        }
    }

    /// Unknown stored values fall back to `Congregation`.
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "choir" => IntermediateHymnType::Choir,
            _ => IntermediateHymnType::Congregation,
        }
    }
}

/// One talk in the program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Discourse {
    pub speaker: String,
    pub topic: String,
}

/// A release or sustainment read over the pulpit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallingChange {
    pub name: String,
    pub calling: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
}

/// The assembled sacrament meeting program, as sent to and read from the API.
///
/// Every list is always present (possibly empty). Composite person fields
/// (`presider`, `director`) use the `"Name | Calling"` encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingProgram {
    pub date: NaiveDate,
    #[serde(default)]
    pub presider: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub music_director: String,
    #[serde(default)]
    pub pianist: String,
    #[serde(default)]
    pub visiting_authority: String,
    #[serde(default)]
    pub opening_hymn: String,
    #[serde(default)]
    pub intermediate_hymn: String,
    #[serde(default)]
    pub intermediate_hymn_type: IntermediateHymnType,
    #[serde(default)]
    pub sacrament_hymn: String,
    #[serde(default)]
    pub closing_hymn: String,
    #[serde(default)]
    pub is_testimony_meeting: bool,
    #[serde(default)]
    pub discourses: Vec<Discourse>,
    #[serde(default)]
    pub releases: Vec<CallingChange>,
    #[serde(default)]
    pub sustainments: Vec<CallingChange>,
    #[serde(default)]
    pub new_members: Vec<String>,
    #[serde(default)]
    pub aaronic_orderings: Vec<String>,
    #[serde(default)]
    pub child_blessings: Vec<String>,
    #[serde(default)]
    pub confirmations: Vec<String>,
    #[serde(default)]
    pub stake_business: String,
    #[serde(default)]
    pub announcements: String,
    #[serde(default)]
    pub opening_prayer: String,
    #[serde(default)]
    pub closing_prayer: String,
}

impl MeetingProgram {
    /// An empty program for the given date.
    pub fn empty(date: NaiveDate) -> Self {
        MeetingProgram {
            date,
            presider: String::new(),
            director: String::new(),
            music_director: String::new(),
            pianist: String::new(),
            visiting_authority: String::new(),
            opening_hymn: String::new(),
            intermediate_hymn: String::new(),
            intermediate_hymn_type: IntermediateHymnType::default(),
            sacrament_hymn: String::new(),
            closing_hymn: String::new(),
            is_testimony_meeting: false,
            discourses: Vec::new(),
            releases: Vec::new(),
            sustainments: Vec::new(),
            new_members: Vec::new(),
            aaronic_orderings: Vec::new(),
            child_blessings: Vec::new(),
            confirmations: Vec::new(),
            stake_business: String::new(),
            announcements: String::new(),
            opening_prayer: String::new(),
            closing_prayer: String::new(),
        }
    }
}

/// A persisted program together with its entity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProgram {
    pub id: i64,
    #[serde(flatten)]
    pub program: MeetingProgram,
}

/// Row for the program list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListItem {
    pub id: i64,
    pub date: String,
    pub presider: String,
    pub director: String,
    pub is_testimony_meeting: bool,
}
