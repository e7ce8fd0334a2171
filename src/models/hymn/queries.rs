use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::entity;
use super::types::Hymn;

/// Find all active hymns, ordered by number.
///
/// Hymns whose `number` property is not a plain integer are skipped.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Hymn>, AppError> {
    let hymns = sqlx::query_as::<_, Hymn>(
        "SELECT CAST(p_num.value AS BIGINT) AS number, e.label AS title \
         FROM entities e \
         JOIN entity_properties p_num ON e.id = p_num.entity_id AND p_num.key = 'number' \
         WHERE e.entity_type = 'hymn' AND e.is_active = true \
           AND p_num.value ~ '^[0-9]+$' \
         ORDER BY number",
    )
    .fetch_all(pool)
    .await?;
    Ok(hymns)
}

/// Create a hymn entity. Returns the new entity id.
pub async fn create(pool: &PgPool, number: i64, title: &str) -> Result<i64, AppError> {
    let name = format!("hymn-{number}");
    let mut tx = pool.begin().await?;
    let id = entity::create(&mut *tx, "hymn", &name, title).await?;
    entity::set_property(&mut *tx, id, "number", &number.to_string()).await?;
    tx.commit().await?;
    Ok(id)
}
