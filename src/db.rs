use std::collections::HashMap;

use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::errors::AppError;
use crate::models::{entity, relation};

const REFERENCE_SEED: &str = include_str!("../data/seed/reference.json");

pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

// ── Seed format ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SeedPayload {
    #[serde(default)]
    pub entities: Vec<SeedEntity>,
    #[serde(default)]
    pub relations: Vec<SeedRelation>,
}

#[derive(Debug, Deserialize)]
pub struct SeedEntity {
    pub entity_type: String,
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

/// Relations reference entities by `"type:name"`, not numeric ids.
#[derive(Debug, Deserialize)]
pub struct SeedRelation {
    pub relation_type: String,
    pub source: String,
    pub target: String,
}

/// Counts from one seed import.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub entities: usize,
    pub relations: usize,
}

fn split_ref(reference: &str) -> Result<(&str, &str), AppError> {
    reference
        .split_once(':')
        .ok_or_else(|| AppError::Data(format!("Bad entity reference '{reference}'")))
}

/// Import a seed payload in a single transaction. Entities that already
/// exist are left untouched.
pub async fn import_seed(pool: &PgPool, payload: &SeedPayload) -> Result<SeedResult, AppError> {
    let mut result = SeedResult::default();
    let mut tx = pool.begin().await?;

    for e in &payload.entities {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO entities (entity_type, name, label, sort_order) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (entity_type, name) DO NOTHING RETURNING id",
        )
        .bind(&e.entity_type)
        .bind(&e.name)
        .bind(&e.label)
        .bind(e.sort_order)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = id else {
            log::debug!("Seed entity {}:{} already present", e.entity_type, e.name);
            continue;
        };
        for (key, value) in &e.properties {
            entity::set_property(&mut *tx, id, key, value).await?;
        }
        result.entities += 1;
    }

    for r in &payload.relations {
        let (source_type, source_name) = split_ref(&r.source)?;
        let (target_type, target_name) = split_ref(&r.target)?;
        let source = entity::find_by_type_and_name(&mut *tx, source_type, source_name).await?;
        let target = entity::find_by_type_and_name(&mut *tx, target_type, target_name).await?;
        match (source, target) {
            (Some(s), Some(t)) => {
                relation::create(&mut *tx, &r.relation_type, s.id, t.id).await?;
                result.relations += 1;
            }
            _ => log::warn!("Seed relation {} -> {} skipped: missing endpoint", r.source, r.target),
        }
    }

    tx.commit().await?;
    Ok(result)
}

/// Seed roles, permissions, organizations, hymns and the admin user.
///
/// Runs only against an empty database.
pub async fn seed_reference(pool: &PgPool, admin_password_hash: &str) -> Result<(), AppError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entities")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        log::info!("Database already seeded ({count} entities), skipping reference seed");
        return Ok(());
    }

    let payload: SeedPayload = serde_json::from_str(REFERENCE_SEED)
        .map_err(|e| AppError::Data(format!("Bad reference seed JSON: {e}")))?;
    let result = import_seed(pool, &payload).await?;

    if let Some(admin) = entity::find_by_type_and_name(pool, "user", "admin").await? {
        entity::set_property(pool, admin.id, "password", admin_password_hash).await?;
    }
    log::info!(
        "Reference seed complete: entities={}, relations={}",
        result.entities,
        result.relations
    );
    Ok(())
}
