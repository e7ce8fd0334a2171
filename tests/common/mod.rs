//! Shared test infrastructure for database-backed tests.
//!
//! Each test gets its own Postgres schema, migrated and seeded, inside the
//! database named by `TEST_DATABASE_URL`. When that variable is unset the
//! database tests return early.
#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use ward_admin::auth::password;
use ward_admin::db;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: PgPool,
    url: String,
    schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // The test's runtime is winding down, so drop the schema from a
        // thread with its own runtime and wait for it.
        let url = self.url.clone();
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        let cleanup = std::thread::spawn(move || {
            let Ok(rt) = tokio::runtime::Builder::new_current_thread().enable_all().build() else {
                return;
            };
            rt.block_on(async move {
                match PgPoolOptions::new().max_connections(1).connect(&url).await {
                    Ok(pool) => {
                        if let Err(e) = pool.execute(sql.as_str()).await {
                            eprintln!("Failed to drop test schema: {e}");
                        }
                        pool.close().await;
                    }
                    Err(e) => eprintln!("Failed to connect for test cleanup: {e}"),
                }
            });
        });
        let _ = cleanup.join();
    }
}

/// Migrated and seeded database in a fresh schema, or `None` to skip.
pub async fn setup_test_db() -> Option<TestDb> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let suffix: [u8; 6] = rand::random();
    let schema = format!("test_{}", hex::encode(suffix));

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to TEST_DATABASE_URL");
    admin
        .execute(format!("CREATE SCHEMA {schema}").as_str())
        .await
        .expect("Failed to create test schema");
    admin.close().await;

    let search_path = format!("SET search_path TO {schema}");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .after_connect(move |conn, _meta| {
            let sql = search_path.clone();
            Box::pin(async move {
                conn.execute(sql.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("Failed to connect test pool");

    db::run_migrations(&pool).await.expect("Failed to run migrations");
    let hash = password::hash_password(ADMIN_PASS).expect("Failed to hash password");
    db::seed_reference(&pool, &hash).await.expect("Failed to seed reference data");

    Some(TestDb { pool, url, schema })
}
