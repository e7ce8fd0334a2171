pub mod reference;
pub mod sacrament_meetings;

use actix_web::{
    web, Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::templates_structs::ApiErrorResponse;

/// CSRF protection for REST API mutation endpoints.
///
/// Rejects POST/PUT/DELETE requests without `Content-Type: application/json`.
/// A cross-origin form post cannot carry a JSON content type with cookies.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = ApiErrorResponse {
                error: "Content-Type must be application/json for mutation requests".to_string(),
                details: None,
            };
            let response = HttpResponse::BadRequest().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Literal segments before /{id}.
    cfg.service(
        web::scope("/sacrament-meetings")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(sacrament_meetings::list))
            .route("", web::post().to(sacrament_meetings::create))
            .route("/form", web::get().to(sacrament_meetings::new_form))
            .route("/form/events", web::post().to(sacrament_meetings::apply_event))
            .route("/preview", web::post().to(sacrament_meetings::preview))
            .route("/{id}", web::get().to(sacrament_meetings::read))
            .route("/{id}", web::put().to(sacrament_meetings::update))
            .route("/{id}", web::delete().to(sacrament_meetings::delete))
            .route("/{id}/form", web::get().to(sacrament_meetings::edit_form))
    );
    cfg.route("/hymns", web::get().to(reference::hymns));
    cfg.route("/members", web::get().to(reference::members));
    cfg.route("/bishopric", web::get().to(reference::bishopric));
    cfg.route("/organizations", web::get().to(reference::organizations));
    cfg.route("/organizations/{id}/callings", web::get().to(reference::callings));
}
