use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::require_permission;
use crate::composer::{Composer, LeaderSlot, ReferenceData};
use crate::errors::AppError;
use crate::models::{hymn, member, organization, reference};
use crate::templates_structs::{LeaderOptions, OrganizationOption, SearchQuery};

/// GET /api/v1/hymns?q= - Hymn suggestions by number prefix or title
pub async fn hymns(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let hymns = hymn::find_all(&pool).await?;
    let composer = Composer::new(ReferenceData { hymns, ..ReferenceData::default() });
    Ok(HttpResponse::Ok().json(composer.hymn_suggestions(&query.q)))
}

/// GET /api/v1/members?q= - Member name suggestions
pub async fn members(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let members = member::find_all(&pool).await?;
    let composer = Composer::new(ReferenceData { members, ..ReferenceData::default() });
    Ok(HttpResponse::Ok().json(composer.member_suggestions(&query.q)))
}

/// GET /api/v1/bishopric - Bishopric roster and leader slot options
pub async fn bishopric(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let composer = Composer::new(reference::load(&pool).await?);
    Ok(HttpResponse::Ok().json(LeaderOptions {
        bishopric: composer.roster().members().to_vec(),
        presider: LeaderSlot::Presider.descriptor(),
        director: LeaderSlot::Director.descriptor(),
    }))
}

/// GET /api/v1/organizations - Organizations offered for releases and sustainments
pub async fn organizations(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let organizations = organization::find_all(&pool).await?;
    let composer = Composer::new(ReferenceData { organizations, ..ReferenceData::default() });
    let options: Vec<OrganizationOption> = composer
        .organizations()
        .for_calling_changes()
        .into_iter()
        .map(|org| OrganizationOption {
            id: org.id,
            label: org.label.clone(),
            organization_type: org.organization_type.clone(),
            callings: composer.callings_for(org.id),
        })
        .collect();
    Ok(HttpResponse::Ok().json(options))
}

/// GET /api/v1/organizations/{id}/callings - Calling vocabulary for one organization
///
/// Unknown organizations answer with free text rather than 404.
pub async fn callings(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let organizations = organization::find_all(&pool).await?;
    let composer = Composer::new(ReferenceData { organizations, ..ReferenceData::default() });
    Ok(HttpResponse::Ok().json(composer.callings_for(path.into_inner())))
}
