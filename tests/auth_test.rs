//! Authentication tests: password hashing, user lookup, role permissions.

mod common;

use ward_admin::auth::password;
use ward_admin::models::user::{self, NewUser};
use ward_admin::models::permission;
use common::*;

const TEST_PASSWORD: &str = "password123";

#[test]
fn test_hash_password_randomness() {
    let hash1 = password::hash_password(TEST_PASSWORD).expect("Failed to hash first password");
    let hash2 = password::hash_password(TEST_PASSWORD).expect("Failed to hash second password");

    // Different salts
    assert_ne!(hash1, hash2);
    assert!(password::verify_password(TEST_PASSWORD, &hash1).unwrap());
    assert!(password::verify_password(TEST_PASSWORD, &hash2).unwrap());
}

#[tokio::test]
async fn test_seeded_admin_can_sign_in() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let admin = user::find_by_username(pool, ADMIN_USER)
        .await
        .expect("lookup")
        .expect("admin exists");
    assert!(password::verify_password(ADMIN_PASS, &admin.password).unwrap());

    let perms = permission::find_codes_by_user_id(pool, admin.id).await.expect("permissions");
    for code in ["sacrament.create", "sacrament.delete", "sacrament.edit", "sacrament.list"] {
        assert!(perms.iter().any(|p| p == code), "admin missing {code}");
    }
}

#[tokio::test]
async fn test_counselor_cannot_delete() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let hash = password::hash_password(TEST_PASSWORD).unwrap();
    let id = user::create(pool, &NewUser {
        username: "pruiz".into(),
        password: hash,
        email: "pruiz@example.com".into(),
        display_name: "Pedro Ruiz".into(),
    })
    .await
    .expect("create");
    user::assign_role(pool, id, "consejero_obispo").await.expect("role");

    let perms = permission::find_codes_by_user_id(pool, id).await.unwrap();
    assert!(perms.iter().any(|p| p == "sacrament.edit"));
    assert!(!perms.iter().any(|p| p == "sacrament.delete"));
}

#[tokio::test]
async fn test_update_password() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let admin = user::find_by_username(pool, ADMIN_USER).await.unwrap().unwrap();
    let new_hash = password::hash_password("otra-clave").unwrap();
    user::update_password(pool, admin.id, &new_hash).await.expect("update");

    let admin = user::find_by_username(pool, ADMIN_USER).await.unwrap().unwrap();
    assert!(password::verify_password("otra-clave", &admin.password).unwrap());
    assert!(!password::verify_password(ADMIN_PASS, &admin.password).unwrap());
}

#[tokio::test]
async fn test_unknown_user_not_found() {
    let Some(db) = setup_test_db().await else { return };
    assert!(user::find_by_username(db.pool(), "nobody").await.unwrap().is_none());
}
