use sqlx::PgPool;

use crate::composer::leaders::BISHOPRIC_ROLES;
use crate::composer::ReferenceData;
use crate::errors::AppError;
use crate::models::{hymn, member, organization, user};

/// Load every lookup table the program composer needs.
pub async fn load(pool: &PgPool) -> Result<ReferenceData, AppError> {
    let role_names: Vec<&str> = BISHOPRIC_ROLES.iter().map(|(role, _)| *role).collect();
    let (users, organizations, hymns, members) = tokio::try_join!(
        user::find_by_roles(pool, &role_names),
        organization::find_all(pool),
        hymn::find_all(pool),
        member::find_all(pool),
    )?;
    Ok(ReferenceData { users, organizations, hymns, members })
}
