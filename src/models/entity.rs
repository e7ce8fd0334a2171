use sqlx::{PgConnection, PgPool, Postgres};
use std::collections::HashMap;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Entity {
    pub id: i64,
    pub entity_type: String,
    pub name: String,
    pub label: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

const SELECT_ENTITY: &str = "\
    SELECT id, entity_type, name, label, sort_order::BIGINT AS sort_order, is_active, \
           created_at::TEXT AS created_at, updated_at::TEXT AS updated_at \
    FROM entities";

/// Find a single entity by type and name.
pub async fn find_by_type_and_name<'e, E>(
    executor: E,
    entity_type: &str,
    name: &str,
) -> Result<Option<Entity>, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, Entity>(&format!(
        "{SELECT_ENTITY} WHERE entity_type = $1 AND name = $2"
    ))
    .bind(entity_type)
    .bind(name)
    .fetch_optional(executor)
    .await
}

/// Find a single entity by id.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Entity>, sqlx::Error> {
    sqlx::query_as::<_, Entity>(&format!("{SELECT_ENTITY} WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create a new entity, returning its id.
pub async fn create<'e, E>(executor: E, entity_type: &str, name: &str, label: &str) -> Result<i64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO entities (entity_type, name, label) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(entity_type)
    .bind(name)
    .bind(label)
    .fetch_one(executor)
    .await
}

/// Update an entity's label and bump `updated_at`.
pub async fn update_label<'e, E>(executor: E, id: i64, label: &str) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query("UPDATE entities SET label = $1, updated_at = now() WHERE id = $2")
        .bind(label)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Delete an entity (cascades to properties and relations).
/// Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM entities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Count entities of a given type.
pub async fn count_by_type(pool: &PgPool, entity_type: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entities WHERE entity_type = $1")
        .bind(entity_type)
        .fetch_one(pool)
        .await
}

// --- Property helpers ---

/// Get all properties for an entity as a HashMap.
pub async fn get_properties(pool: &PgPool, entity_id: i64) -> Result<HashMap<String, String>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, String)>(
        "SELECT key, value FROM entity_properties WHERE entity_id = $1",
    )
    .bind(entity_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Set a property (upsert).
pub async fn set_property<'e, E>(executor: E, entity_id: i64, key: &str, value: &str) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO entity_properties (entity_id, key, value) VALUES ($1, $2, $3) \
         ON CONFLICT (entity_id, key) DO UPDATE SET value = excluded.value",
    )
    .bind(entity_id)
    .bind(key)
    .bind(value)
    .execute(executor)
    .await?;
    Ok(())
}

/// Set multiple properties on one connection, normally inside the caller's
/// transaction.
pub async fn set_properties(conn: &mut PgConnection, entity_id: i64, props: &[(&str, String)]) -> Result<(), sqlx::Error> {
    for (key, value) in props {
        set_property(&mut *conn, entity_id, key, value).await?;
    }
    Ok(())
}
