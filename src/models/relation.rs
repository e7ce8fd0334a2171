use sqlx::Postgres;

/// Create a relation between two entities (no-op if it already exists).
pub async fn create<'e, E>(executor: E, relation_type_name: &str, source_id: i64, target_id: i64) -> Result<(), sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        "INSERT INTO relations (relation_type_id, source_id, target_id) \
         VALUES ((SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = $1), $2, $3) \
         ON CONFLICT DO NOTHING",
    )
    .bind(relation_type_name)
    .bind(source_id)
    .bind(target_id)
    .execute(executor)
    .await?;
    Ok(())
}
