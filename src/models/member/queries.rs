use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::entity;
use super::types::MemberRef;

/// Find all active members ordered by name.
pub async fn find_all(pool: &PgPool) -> Result<Vec<MemberRef>, AppError> {
    let members = sqlx::query_as::<_, MemberRef>(
        "SELECT e.id, e.label AS name \
         FROM entities e \
         WHERE e.entity_type = 'member' AND e.is_active = true \
         ORDER BY e.label, e.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(members)
}

/// Create a member entity. The entity name is derived from the full name.
pub async fn create(pool: &PgPool, full_name: &str) -> Result<i64, AppError> {
    let name = format!(
        "member-{}",
        full_name.trim().to_lowercase().replace(' ', "-")
    );
    let id = entity::create(pool, "member", &name, full_name.trim()).await?;
    Ok(id)
}
