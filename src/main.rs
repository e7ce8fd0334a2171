use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use ward_admin::auth::rate_limit::RateLimiter;
use ward_admin::config::AppConfig;
use ward_admin::{audit, auth, db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        log::error!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    let pool = db::init_pool(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;
    db::run_migrations(&pool)
        .await
        .map_err(std::io::Error::other)?;

    // Seed roles, organizations, hymns and the admin user into an empty database
    let admin_hash = auth::password::hash_password(&config.admin_password)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    db::seed_reference(&pool, &admin_hash)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    if let Err(e) = audit::cleanup_old_entries(&pool, config.audit_retention_days).await {
        log::warn!("Audit cleanup failed: {e}");
    }

    let secret_key = match &config.session_key {
        Some(bytes) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(bytes.as_slice())
        }
        None => Key::generate(),
    };
    let limiter = web::Data::new(RateLimiter::default());
    let cookie_secure = config.cookie_secure;

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(limiter.clone())
            // Public routes
            .route("/login", web::get().to(handlers::auth_handlers::login_page))
            .route("/login", web::post().to(handlers::auth_handlers::login_submit))
            .route("/", web::get().to(|| async {
                actix_web::HttpResponse::SeeOther()
                    .insert_header(("Location", handlers::auth_handlers::HOME_PATH))
                    .finish()
            }))
            // Protected routes
            .service(
                web::scope("")
                    .wrap(middleware::from_fn(auth::middleware::require_auth))
                    .route("/logout", web::post().to(handlers::auth_handlers::logout))
                    .service(web::scope("/api/v1").configure(handlers::api_v1::configure))
            )
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(&config.bind_addr)?
    .run()
    .await
}
