use actix_session::Session;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::session::{get_user_id, sign_in, Permissions};
use crate::auth::{csrf, password, rate_limit::RateLimiter};
use crate::errors::{AppError, render};
use crate::models::{permission, user};
use crate::templates_structs::LoginTemplate;

/// Where a signed-in user lands.
pub const HOME_PATH: &str = "/api/v1/sacrament-meetings";

const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
const TOO_MANY_ATTEMPTS: &str = "Demasiados intentos fallidos. Inténtelo más tarde.";

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn login_form(session: &Session, error: Option<&str>) -> Result<HttpResponse, AppError> {
    let tmpl = LoginTemplate {
        error: error.map(String::from),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

pub async fn login_page(session: Session) -> Result<HttpResponse, AppError> {
    if get_user_id(&session).is_some() {
        return Ok(redirect(HOME_PATH));
    }
    login_form(&session, None)
}

pub async fn login_submit(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate limit before touching the database.
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED));
    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failures");
        return login_form(&session, Some(TOO_MANY_ATTEMPTS));
    }

    let found = user::find_by_username(&pool, form.username.trim()).await?;
    let verified = match &found {
        Some(u) => password::verify_password(&form.password, &u.password).unwrap_or(false),
        None => false,
    };

    match found {
        Some(u) if verified => {
            limiter.clear(ip);
            let perms = Permissions(permission::find_codes_by_user_id(&pool, u.id).await?);
            sign_in(&session, u.id, &u.username, &perms)?;
            let _ = crate::audit::log(&pool, u.id, "user.login", "user", u.id, serde_json::json!({})).await;
            Ok(redirect(HOME_PATH))
        }
        _ => {
            limiter.record_failure(ip);
            login_form(&session, Some(INVALID_CREDENTIALS))
        }
    }
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/login"))
}
