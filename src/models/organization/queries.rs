use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::entity;
use super::types::Organization;

/// Find all active organizations, in display order.
pub async fn find_all(pool: &PgPool) -> Result<Vec<Organization>, AppError> {
    let orgs = sqlx::query_as::<_, Organization>(
        "SELECT e.id, e.name, e.label, \
                COALESCE(p_type.value, '') AS organization_type \
         FROM entities e \
         LEFT JOIN entity_properties p_type \
             ON e.id = p_type.entity_id AND p_type.key = 'organization_type' \
         WHERE e.entity_type = 'organization' AND e.is_active = true \
         ORDER BY e.sort_order, e.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(orgs)
}

/// Create an organization entity. Returns the new entity id.
pub async fn create(
    pool: &PgPool,
    name: &str,
    label: &str,
    organization_type: &str,
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;
    let id = entity::create(&mut *tx, "organization", name, label).await?;
    entity::set_property(&mut *tx, id, "organization_type", organization_type).await?;
    tx.commit().await?;
    Ok(id)
}
