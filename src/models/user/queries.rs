use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::{entity, relation};
use super::types::{NewUser, User, UserRef};

/// Find a user by username, including the stored password hash.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT e.id, e.name AS username, \
                COALESCE(p_pw.value, '') AS password, \
                e.label AS display_name \
         FROM entities e \
         LEFT JOIN entity_properties p_pw \
             ON e.id = p_pw.entity_id AND p_pw.key = 'password' \
         WHERE e.entity_type = 'user' AND e.name = $1 AND e.is_active = true",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Find active users holding any of the given role names.
///
/// Users come back in display order with every matching role collected, so a
/// user holding two of the requested roles appears once.
pub async fn find_by_roles(pool: &PgPool, role_names: &[&str]) -> Result<Vec<UserRef>, AppError> {
    #[derive(sqlx::FromRow)]
    struct Row {
        id: i64,
        display_name: String,
        role_name: String,
    }

    let names: Vec<String> = role_names.iter().map(|r| r.to_string()).collect();
    let rows = sqlx::query_as::<_, Row>(
        "SELECT u.id, u.label AS display_name, role_e.name AS role_name \
         FROM entities u \
         JOIN relations r_role ON r_role.source_id = u.id \
             AND r_role.relation_type_id = ( \
                 SELECT id FROM entities WHERE entity_type = 'relation_type' AND name = 'has_role') \
         JOIN entities role_e ON r_role.target_id = role_e.id AND role_e.entity_type = 'role' \
         WHERE u.entity_type = 'user' AND u.is_active = true \
           AND role_e.name = ANY($1) \
         ORDER BY u.sort_order, u.id, role_e.name",
    )
    .bind(names)
    .fetch_all(pool)
    .await?;

    let mut users: Vec<UserRef> = Vec::new();
    for row in rows {
        match users.last_mut() {
            Some(last) if last.id == row.id => last.roles.push(row.role_name),
            _ => users.push(UserRef {
                id: row.id,
                display_name: row.display_name,
                roles: vec![row.role_name],
            }),
        }
    }
    Ok(users)
}

/// Create a user entity with its email and password hash. Returns the new id.
pub async fn create(pool: &PgPool, new_user: &NewUser) -> Result<i64, AppError> {
    let mut tx = pool.begin().await?;
    let id = entity::create(&mut *tx, "user", &new_user.username, &new_user.display_name).await?;
    entity::set_property(&mut *tx, id, "password", &new_user.password).await?;
    if !new_user.email.is_empty() {
        entity::set_property(&mut *tx, id, "email", &new_user.email).await?;
    }
    tx.commit().await?;
    Ok(id)
}

/// Replace a user's password hash.
pub async fn update_password(pool: &PgPool, user_id: i64, password_hash: &str) -> Result<(), AppError> {
    entity::set_property(pool, user_id, "password", password_hash).await?;
    Ok(())
}

/// Assign a role (by role name) to a user. Unknown role names are `NotFound`.
pub async fn assign_role(pool: &PgPool, user_id: i64, role_name: &str) -> Result<(), AppError> {
    let role = entity::find_by_type_and_name(pool, "role", role_name)
        .await?
        .ok_or(AppError::NotFound)?;
    relation::create(pool, "has_role", user_id, role.id).await?;
    Ok(())
}
