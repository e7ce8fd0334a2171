use serde_json::Value;
use sqlx::PgPool;

/// Record an action in the audit trail.
///
/// Callers ignore the result; a failed audit write never fails the request.
pub async fn log(
    pool: &PgPool,
    user_id: i64,
    action: &str,
    target_type: &str,
    target_id: i64,
    details: Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_entries (user_id, action, target_type, target_id, details) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(action)
    .bind(target_type)
    .bind(target_id)
    .bind(details)
    .execute(pool)
    .await
    .map_err(|e| {
        log::warn!("Audit write failed for {action} on {target_type}#{target_id}: {e}");
        e
    })?;
    Ok(())
}

/// Delete audit entries older than `retention_days`. Returns rows removed.
pub async fn cleanup_old_entries(pool: &PgPool, retention_days: i32) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM audit_entries WHERE created_at < now() - make_interval(days => $1)",
    )
    .bind(retention_days)
    .execute(pool)
    .await?;
    if result.rows_affected() > 0 {
        log::info!("Removed {} audit entries older than {retention_days} days", result.rows_affected());
    }
    Ok(result.rows_affected())
}

/// Count audit entries for one target.
pub async fn count_for_target(pool: &PgPool, target_type: &str, target_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM audit_entries WHERE target_type = $1 AND target_id = $2",
    )
    .bind(target_type)
    .bind(target_id)
    .fetch_one(pool)
    .await
}
