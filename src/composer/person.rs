use serde::{Deserialize, Serialize};

/// A composite person field split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonValue {
    pub name: String,
    pub calling: String,
}

/// Build a composite `"Name | Calling"` value.
///
/// A blank name yields `""`; a blank calling yields the bare name. The legacy
/// comma encoding is never produced.
pub fn compose_person(name: &str, calling: &str) -> String {
    let name = name.trim();
    let calling = calling.trim();
    if name.is_empty() {
        String::new()
    } else if calling.is_empty() {
        name.to_string()
    } else {
        format!("{name} | {calling}")
    }
}

/// Split a composite person value.
///
/// Accepts `"Name | Calling"`, the legacy `"Name, Calling, ..."` (everything
/// after the first comma becomes the calling) and a bare name.
pub fn parse_person(value: &str) -> PersonValue {
    let value = value.trim();

    if let Some((name, calling)) = value.split_once('|') {
        return PersonValue {
            name: name.trim().to_string(),
            calling: calling.trim().to_string(),
        };
    }

    let mut parts = value.split(',').map(str::trim);
    let name = parts.next().unwrap_or_default().to_string();
    let calling = parts.filter(|p| !p.is_empty()).collect::<Vec<_>>().join(", ");
    PersonValue { name, calling }
}
