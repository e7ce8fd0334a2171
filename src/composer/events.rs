use serde::{Deserialize, Serialize};

use super::hymns::HymnField;
use super::leaders::{LeaderChoice, LeaderSlot};
use super::toggles::RosterToggle;

/// One user interaction with the program form.
///
/// Wire format: `{"type": "setToggle", "toggle": "confirmations", "enabled": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FormEvent {
    SetToggle { toggle: RosterToggle, enabled: bool },
    /// A hymn input lost focus.
    HymnBlur { field: HymnField },
    /// A hymn suggestion was clicked.
    SelectHymn { field: HymnField, number: i64 },
    /// A composite leader value was set wholesale (e.g. pasted or restored).
    SetLeaderValue { slot: LeaderSlot, value: String },
    SelectLeader { slot: LeaderSlot, choice: LeaderChoice },
    SetLeaderText { slot: LeaderSlot, name: String, calling: String },
    SetVisitingAuthority { value: String },
    SetTestimonyMeeting { enabled: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_deserialize_from_camel_case() {
        let event: FormEvent = serde_json::from_str(
            r#"{"type":"setToggle","toggle":"confirmations","enabled":true}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            FormEvent::SetToggle { toggle: RosterToggle::Confirmations, enabled: true }
        );

        let event: FormEvent = serde_json::from_str(
            r#"{"type":"selectLeader","slot":"director","choice":{"kind":"bishopric","name":"Juan"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            FormEvent::SelectLeader {
                slot: LeaderSlot::Director,
                choice: LeaderChoice::Bishopric("Juan".into()),
            }
        );

        let event: FormEvent =
            serde_json::from_str(r#"{"type":"hymnBlur","field":"sacrament"}"#).unwrap();
        assert_eq!(event, FormEvent::HymnBlur { field: HymnField::Sacrament });
    }
}
