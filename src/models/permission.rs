use sqlx::PgPool;

use crate::errors::AppError;

/// Get all permission codes granted to a user through any of their roles.
///
/// Traverses: user --[has_role]--> role --[has_permission]--> permission.
pub async fn find_codes_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<String>, AppError> {
    let codes = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT perm.name \
         FROM relations r_role \
         JOIN relations r_perm ON r_perm.source_id = r_role.target_id \
         JOIN entities perm ON r_perm.target_id = perm.id AND perm.entity_type = 'permission' \
         WHERE r_role.source_id = $1 \
           AND r_role.relation_type_id = ( \
               SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'has_role') \
           AND r_perm.relation_type_id = ( \
               SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'has_permission') \
         ORDER BY perm.name",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(codes)
}
