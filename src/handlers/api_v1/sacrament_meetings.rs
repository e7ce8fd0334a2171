use actix_session::Session;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::session::{get_user_id, require_permission};
use crate::composer::{Composer, ComposerMode, LeaderSlot};
use crate::errors::AppError;
use crate::models::{reference, sacrament_meeting};
use crate::templates_structs::{
    ComposerStateResponse, CreatedResponse, FormEventRequest, FormRequest, LeaderOptions,
    PageQuery, PaginatedResponse,
};

fn state_response(composer: &Composer) -> ComposerStateResponse {
    let mode = composer.mode();
    ComposerStateResponse {
        mode: mode.as_str(),
        editing_id: mode.editing_id(),
        form: composer.form().clone(),
        leaders: LeaderOptions {
            bishopric: composer.roster().members().to_vec(),
            presider: LeaderSlot::Presider.descriptor(),
            director: LeaderSlot::Director.descriptor(),
        },
    }
}

/// Permission needed to work on a form in the given mode.
fn form_permission(mode: ComposerMode) -> &'static str {
    match mode {
        ComposerMode::Creating => "sacrament.create",
        ComposerMode::Editing(_) => "sacrament.edit",
    }
}

async fn composer_for(pool: &PgPool) -> Result<Composer, AppError> {
    Ok(Composer::new(reference::load(pool).await?))
}

/// GET /api/v1/sacrament-meetings - List programs, newest first
/// Query params: page (default 1), per_page (default 25, max 100)
pub async fn list(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let (page, per_page) = (query.page(), query.per_page());
    let (items, total) = sacrament_meeting::find_page(&pool, page, per_page).await?;

    Ok(HttpResponse::Ok().json(PaginatedResponse { items, page, per_page, total }))
}

/// GET /api/v1/sacrament-meetings/{id}
pub async fn read(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let program = sacrament_meeting::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(program))
}

/// POST /api/v1/sacrament-meetings - Assemble the submitted form and store it
pub async fn create(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<FormRequest>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.create")?;

    let mut composer = composer_for(&pool).await?;
    composer.resume(ComposerMode::Creating, body.into_inner().form);
    let program = composer.assemble().map_err(AppError::Validation)?;

    let id = sacrament_meeting::create(&pool, &program).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let _ = crate::audit::log(
        &pool,
        user_id,
        "sacrament_meeting.created",
        "sacrament_meeting",
        id,
        serde_json::json!({ "date": program.date.to_string() }),
    )
    .await;

    Ok(HttpResponse::Created().json(CreatedResponse { id }))
}

/// PUT /api/v1/sacrament-meetings/{id} - Replace a program with the submitted form
pub async fn update(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
    body: web::Json<FormRequest>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.edit")?;

    let id = path.into_inner();
    let mut composer = composer_for(&pool).await?;
    composer.resume(ComposerMode::Editing(id), body.into_inner().form);
    let program = composer.assemble().map_err(AppError::Validation)?;

    sacrament_meeting::update(&pool, id, &program).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let _ = crate::audit::log(
        &pool,
        user_id,
        "sacrament_meeting.updated",
        "sacrament_meeting",
        id,
        serde_json::json!({ "date": program.date.to_string() }),
    )
    .await;

    let stored = sacrament_meeting::find_by_id(&pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(stored))
}

/// DELETE /api/v1/sacrament-meetings/{id}
pub async fn delete(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.delete")?;

    let id = path.into_inner();
    sacrament_meeting::delete(&pool, id).await?;

    let user_id = get_user_id(&session).unwrap_or(0);
    let _ = crate::audit::log(
        &pool,
        user_id,
        "sacrament_meeting.deleted",
        "sacrament_meeting",
        id,
        serde_json::json!({}),
    )
    .await;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/sacrament-meetings/form - Blank form for a new program
pub async fn new_form(
    pool: web::Data<PgPool>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.create")?;

    let mut composer = composer_for(&pool).await?;
    composer.open_create();
    Ok(HttpResponse::Ok().json(state_response(&composer)))
}

/// GET /api/v1/sacrament-meetings/{id}/form - Form state derived from a stored program
pub async fn edit_form(
    pool: web::Data<PgPool>,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.edit")?;

    let stored = sacrament_meeting::find_by_id(&pool, path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;
    let mut composer = composer_for(&pool).await?;
    composer.open_edit(&stored);
    Ok(HttpResponse::Ok().json(state_response(&composer)))
}

/// POST /api/v1/sacrament-meetings/form/events - Apply one interaction to a form
pub async fn apply_event(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<FormEventRequest>,
) -> Result<HttpResponse, AppError> {
    let FormEventRequest { editing_id, form, event } = body.into_inner();
    let mode = ComposerMode::from_editing_id(editing_id);
    require_permission(&session, form_permission(mode))?;

    let mut composer = composer_for(&pool).await?;
    composer.resume(mode, form);
    composer.apply(event);
    Ok(HttpResponse::Ok().json(state_response(&composer)))
}

/// POST /api/v1/sacrament-meetings/preview - Assemble without saving
pub async fn preview(
    pool: web::Data<PgPool>,
    session: Session,
    body: web::Json<FormRequest>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "sacrament.list")?;

    let mut composer = composer_for(&pool).await?;
    composer.resume(ComposerMode::Creating, body.into_inner().form);
    let program = composer.assemble().map_err(AppError::Validation)?;
    Ok(HttpResponse::Ok().json(program))
}
