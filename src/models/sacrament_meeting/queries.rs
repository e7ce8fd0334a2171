use std::collections::HashMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::entity;
use super::types::*;

const ENTITY_TYPE: &str = "sacrament_meeting";

const LIST_COLUMNS: &str = "\
    SELECT e.id, \
           COALESCE(p_date.value, '') AS date, \
           COALESCE(p_pres.value, '') AS presider, \
           COALESCE(p_dir.value, '') AS director, \
           COALESCE(p_test.value, 'false') = 'true' AS is_testimony_meeting \
    FROM entities e \
    LEFT JOIN entity_properties p_date \
        ON e.id = p_date.entity_id AND p_date.key = 'meeting_date' \
    LEFT JOIN entity_properties p_pres \
        ON e.id = p_pres.entity_id AND p_pres.key = 'presider' \
    LEFT JOIN entity_properties p_dir \
        ON e.id = p_dir.entity_id AND p_dir.key = 'director' \
    LEFT JOIN entity_properties p_test \
        ON e.id = p_test.entity_id AND p_test.key = 'is_testimony_meeting' \
    WHERE e.entity_type = 'sacrament_meeting'";

fn to_json<T: Serialize>(rows: &[T]) -> Result<String, AppError> {
    Ok(serde_json::to_string(rows)?)
}

/// Flatten a program into entity properties. Lists become JSON arrays.
fn to_properties(p: &MeetingProgram) -> Result<Vec<(&'static str, String)>, AppError> {
    Ok(vec![
        ("meeting_date", p.date.format("%Y-%m-%d").to_string()),
        ("presider", p.presider.clone()),
        ("director", p.director.clone()),
        ("music_director", p.music_director.clone()),
        ("pianist", p.pianist.clone()),
        ("visiting_authority", p.visiting_authority.clone()),
        ("opening_hymn", p.opening_hymn.clone()),
        ("intermediate_hymn", p.intermediate_hymn.clone()),
        ("intermediate_hymn_type", p.intermediate_hymn_type.as_str().to_string()),
        ("sacrament_hymn", p.sacrament_hymn.clone()),
        ("closing_hymn", p.closing_hymn.clone()),
        ("is_testimony_meeting", p.is_testimony_meeting.to_string()),
        ("discourses", to_json(&p.discourses)?),
        ("releases", to_json(&p.releases)?),
        ("sustainments", to_json(&p.sustainments)?),
        ("new_members", to_json(&p.new_members)?),
        ("aaronic_orderings", to_json(&p.aaronic_orderings)?),
        ("child_blessings", to_json(&p.child_blessings)?),
        ("confirmations", to_json(&p.confirmations)?),
        ("stake_business", p.stake_business.clone()),
        ("announcements", p.announcements.clone()),
        ("opening_prayer", p.opening_prayer.clone()),
        ("closing_prayer", p.closing_prayer.clone()),
    ])
}

/// Read a JSON list property. Missing or malformed values read as empty.
fn read_list<T: DeserializeOwned>(props: &HashMap<String, String>, key: &str) -> Vec<T> {
    let Some(raw) = props.get(key) else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed '{key}' list: {e}");
        Vec::new()
    })
}

fn from_properties(date: NaiveDate, props: &HashMap<String, String>) -> MeetingProgram {
    let text = |key: &str| props.get(key).cloned().unwrap_or_default();
    MeetingProgram {
        date,
        presider: text("presider"),
        director: text("director"),
        music_director: text("music_director"),
        pianist: text("pianist"),
        visiting_authority: text("visiting_authority"),
        opening_hymn: text("opening_hymn"),
        intermediate_hymn: text("intermediate_hymn"),
        intermediate_hymn_type: IntermediateHymnType::from_stored(&text("intermediate_hymn_type")),
        sacrament_hymn: text("sacrament_hymn"),
        closing_hymn: text("closing_hymn"),
        is_testimony_meeting: text("is_testimony_meeting") == "true",
        discourses: read_list(props, "discourses"),
        releases: read_list(props, "releases"),
        sustainments: read_list(props, "sustainments"),
        new_members: read_list(props, "new_members"),
        aaronic_orderings: read_list(props, "aaronic_orderings"),
        child_blessings: read_list(props, "child_blessings"),
        confirmations: read_list(props, "confirmations"),
        stake_business: text("stake_business"),
        announcements: text("announcements"),
        opening_prayer: text("opening_prayer"),
        closing_prayer: text("closing_prayer"),
    }
}

fn label_for(date: NaiveDate) -> String {
    format!("Reunión Sacramental {}", date.format("%Y-%m-%d"))
}

/// Create a program entity with all of its properties in one transaction.
/// Returns the new id.
pub async fn create(pool: &PgPool, program: &MeetingProgram) -> Result<i64, AppError> {
    // Dates are not unique, so the entity name gets a random suffix.
    let suffix: [u8; 4] = rand::random();
    let name = format!("sacrament-meeting-{}-{}", program.date.format("%Y-%m-%d"), hex::encode(suffix));
    let props = to_properties(program)?;

    let mut tx = pool.begin().await?;
    let id = entity::create(&mut *tx, ENTITY_TYPE, &name, &label_for(program.date)).await?;
    entity::set_properties(&mut tx, id, &props).await?;
    tx.commit().await?;
    Ok(id)
}

/// Replace every field of an existing program in one transaction.
pub async fn update(pool: &PgPool, id: i64, program: &MeetingProgram) -> Result<(), AppError> {
    let existing = entity::find_by_id(pool, id).await?;
    if !matches!(existing, Some(ref e) if e.entity_type == ENTITY_TYPE) {
        return Err(AppError::NotFound);
    }
    let props = to_properties(program)?;
    let mut tx = pool.begin().await?;
    entity::update_label(&mut *tx, id, &label_for(program.date)).await?;
    entity::set_properties(&mut tx, id, &props).await?;
    tx.commit().await?;
    Ok(())
}

/// Load a program by id.
///
/// A record with an unreadable date is treated as missing.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<StoredProgram>, AppError> {
    let Some(e) = entity::find_by_id(pool, id).await? else {
        return Ok(None);
    };
    if e.entity_type != ENTITY_TYPE {
        return Ok(None);
    }
    let props = entity::get_properties(pool, id).await?;
    let raw_date = props.get("meeting_date").map(String::as_str).unwrap_or("");
    let date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            log::warn!("Sacrament meeting {id} has an invalid date '{raw_date}'");
            return Ok(None);
        }
    };
    Ok(Some(StoredProgram { id, program: from_properties(date, &props) }))
}

/// All programs, newest first.
pub async fn find_all(pool: &PgPool) -> Result<Vec<ProgramListItem>, AppError> {
    let items = sqlx::query_as::<_, ProgramListItem>(&format!(
        "{LIST_COLUMNS} ORDER BY date DESC, e.id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Row offset of a 1-based page. Saturates instead of overflowing; a page
/// past the end simply comes back empty.
fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page.max(0))
}

/// One page of programs, newest first, plus the total count.
pub async fn find_page(
    pool: &PgPool,
    page: i64,
    per_page: i64,
) -> Result<(Vec<ProgramListItem>, i64), AppError> {
    let offset = page_offset(page, per_page);
    let items = sqlx::query_as::<_, ProgramListItem>(&format!(
        "{LIST_COLUMNS} ORDER BY date DESC, e.id DESC LIMIT $1 OFFSET $2"
    ))
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    let total = entity::count_by_type(pool, ENTITY_TYPE).await?;
    Ok((items, total))
}

/// Delete a program. Returns `NotFound` when no such program exists.
pub async fn delete(pool: &PgPool, id: i64) -> Result<(), AppError> {
    let existing = entity::find_by_id(pool, id).await?;
    if !matches!(existing, Some(ref e) if e.entity_type == ENTITY_TYPE) {
        return Err(AppError::NotFound);
    }
    entity::delete(pool, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn lists_round_trip_through_properties() {
        let mut program = MeetingProgram::empty(date());
        program.confirmations = vec!["Ana".into()];
        program.discourses = vec![Discourse { speaker: "Luis".into(), topic: "Fe".into() }];
        program.intermediate_hymn_type = IntermediateHymnType::Choir;

        let props: HashMap<String, String> = to_properties(&program)
            .unwrap()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(props["confirmations"], r#"["Ana"]"#);
        assert_eq!(props["releases"], "[]");
        assert_eq!(from_properties(date(), &props), program);
    }

    #[test]
    fn page_offset_saturates() {
        assert_eq!(page_offset(1, 25), 0);
        assert_eq!(page_offset(0, 25), 0);
        assert_eq!(page_offset(3, 25), 50);
        assert_eq!(page_offset(i64::MAX, 25), i64::MAX);
        assert_eq!(page_offset(i64::MIN, 25), 0);
    }

    #[test]
    fn missing_and_malformed_lists_read_empty() {
        let mut props = HashMap::new();
        props.insert("confirmations".to_string(), "not json".to_string());
        props.insert("releases".to_string(), "".to_string());
        props.insert("intermediate_hymn_type".to_string(), "orchestra".to_string());

        let program = from_properties(date(), &props);
        assert!(program.confirmations.is_empty());
        assert!(program.releases.is_empty());
        assert!(program.discourses.is_empty());
        assert_eq!(program.intermediate_hymn_type, IntermediateHymnType::Congregation);
    }
}
