use serde::{Deserialize, Serialize};

use crate::models::user::UserRef;
use super::person::{compose_person, parse_person};
use super::text::names_match;

/// Roles that make a user part of the bishopric, with the calling label
/// used when that user presides or directs. Earlier entries win when a user
/// holds more than one.
pub const BISHOPRIC_ROLES: &[(&str, &str)] = &[
    ("obispo", "Obispo"),
    ("consejero_obispo", "Consejero del Obispado"),
];

/// Authority types offered when a visitor presides.
pub const VISITING_AUTHORITY_TYPES: &[&str] = &[
    "Presidente de Estaca",
    "Primer Consejero de la Presidencia de Estaca",
    "Segundo Consejero de la Presidencia de Estaca",
    "Sumo Consejero",
    "Setenta de Área",
    "Patriarca",
    "Obispo",
    "Consejero del Obispado",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BishopricMember {
    pub user_id: i64,
    pub name: String,
    pub calling: String,
}

/// Users eligible to preside or direct without a calling selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BishopricRoster {
    members: Vec<BishopricMember>,
}

impl BishopricRoster {
    /// Build the roster from users with their roles; the bishop comes first.
    pub fn from_users(users: &[UserRef]) -> Self {
        let mut members = Vec::new();
        for (role, calling) in BISHOPRIC_ROLES {
            for user in users {
                let holds_role = user.roles.iter().any(|r| r == role);
                let already_listed = members.iter().any(|m: &BishopricMember| m.user_id == user.id);
                if holds_role && !already_listed && !user.display_name.trim().is_empty() {
                    members.push(BishopricMember {
                        user_id: user.id,
                        name: user.display_name.trim().to_string(),
                        calling: calling.to_string(),
                    });
                }
            }
        }
        BishopricRoster { members }
    }

    pub fn members(&self) -> &[BishopricMember] {
        &self.members
    }

    pub fn find(&self, name: &str) -> Option<&BishopricMember> {
        self.members.iter().find(|m| names_match(&m.name, name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }
}

/// The two leader slots of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeaderSlot {
    Presider,
    Director,
}

/// Per-slot description of the escape-hatch option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDescriptor {
    pub other_value: &'static str,
    pub other_label: &'static str,
    pub authority_types: &'static [&'static str],
}

impl LeaderSlot {
    pub fn descriptor(self) -> SlotDescriptor {
        match self {
            LeaderSlot::Presider => SlotDescriptor {
                other_value: "visiting_authority",
                other_label: "Autoridad visitante",
                authority_types: VISITING_AUTHORITY_TYPES,
            },
            LeaderSlot::Director => SlotDescriptor {
                other_value: "assigned_leader",
                other_label: "Líder asignado",
                authority_types: &[],
            },
        }
    }
}

/// Dropdown state of a leader slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum LeaderChoice {
    #[default]
    Unset,
    /// A bishopric member, by roster name.
    Bishopric(String),
    /// The escape hatch: visiting authority or assigned leader.
    Other,
}

/// UI state behind a composite leader field.
///
/// `name`, `calling` and `authority_type` are only meaningful when `choice`
/// is `Other`; they are cleared whenever a bishopric member is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderField {
    pub choice: LeaderChoice,
    pub name: String,
    pub calling: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority_type: Option<String>,
}

impl LeaderField {
    /// Reverse-derive UI state from a stored composite value.
    pub fn classify(slot: LeaderSlot, value: &str, roster: &BishopricRoster) -> LeaderField {
        let parsed = parse_person(value);
        if parsed.name.is_empty() {
            return LeaderField::default();
        }
        if let Some(member) = roster.find(&parsed.name) {
            return LeaderField {
                choice: LeaderChoice::Bishopric(member.name.clone()),
                ..LeaderField::default()
            };
        }
        let authority_type = match_authority_type(slot, &parsed.calling);
        LeaderField {
            choice: LeaderChoice::Other,
            name: parsed.name,
            calling: parsed.calling,
            authority_type,
        }
    }

    /// Re-resolve this field against `roster` without going through the
    /// composite value, so an escape-hatch selection with blank or partial
    /// text survives.
    ///
    /// A bishopric choice no longer on the roster becomes the escape hatch
    /// holding the bare name. Free text naming a roster member becomes that
    /// member.
    pub fn reclassify(&self, slot: LeaderSlot, roster: &BishopricRoster) -> LeaderField {
        match &self.choice {
            LeaderChoice::Unset => LeaderField::default(),
            LeaderChoice::Bishopric(name) => match roster.find(name) {
                Some(member) => LeaderField {
                    choice: LeaderChoice::Bishopric(member.name.clone()),
                    ..LeaderField::default()
                },
                None => LeaderField {
                    choice: LeaderChoice::Other,
                    name: name.trim().to_string(),
                    ..LeaderField::default()
                },
            },
            LeaderChoice::Other => match roster.find(&self.name) {
                Some(member) => LeaderField {
                    choice: LeaderChoice::Bishopric(member.name.clone()),
                    ..LeaderField::default()
                },
                None => LeaderField {
                    choice: LeaderChoice::Other,
                    name: self.name.clone(),
                    calling: self.calling.clone(),
                    authority_type: match_authority_type(slot, &self.calling),
                },
            },
        }
    }

    /// The composite value to persist for this slot.
    ///
    /// A bishopric choice no longer on the roster degrades to the bare name.
    pub fn value(&self, roster: &BishopricRoster) -> String {
        match &self.choice {
            LeaderChoice::Unset => String::new(),
            LeaderChoice::Bishopric(name) => match roster.find(name) {
                Some(member) => compose_person(&member.name, &member.calling),
                None => compose_person(name, ""),
            },
            LeaderChoice::Other => compose_person(&self.name, &self.calling),
        }
    }

    /// Switch the dropdown. Picking a bishopric member or clearing the slot
    /// drops the free-text inputs; picking the escape hatch keeps them.
    pub fn select(&mut self, choice: LeaderChoice) {
        if !matches!(choice, LeaderChoice::Other) {
            self.name.clear();
            self.calling.clear();
            self.authority_type = None;
        }
        self.choice = choice;
    }

    /// Fill the escape-hatch inputs (implies the escape-hatch choice).
    pub fn set_text(&mut self, slot: LeaderSlot, name: &str, calling: &str) {
        self.choice = LeaderChoice::Other;
        self.name = name.trim().to_string();
        self.calling = calling.trim().to_string();
        self.authority_type = match_authority_type(slot, &self.calling);
    }
}

fn match_authority_type(slot: LeaderSlot, calling: &str) -> Option<String> {
    slot.descriptor()
        .authority_types
        .iter()
        .find(|t| names_match(t, calling))
        .map(|t| t.to_string())
}

/// Drop every roster member from a comma-separated visiting-authority list.
///
/// Remaining entries are kept as typed (trimmed) and rejoined with `", "`.
pub fn strip_roster_names(visiting_authority: &str, roster: &BishopricRoster) -> String {
    visiting_authority
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| !roster.contains(&parse_person(entry).name))
        .collect::<Vec<_>>()
        .join(", ")
}
