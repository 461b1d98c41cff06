use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use super::store_error_response;
use crate::render;
use crate::AppState;

#[derive(Deserialize)]
struct DetailsQuery {
    title: Option<String>,
}

/// Point lookup by exact title, JSON in/out.
async fn get_qr_details(
    data: web::Data<AppState>,
    query: web::Query<DetailsQuery>,
) -> impl Responder {
    let title = match query.title.as_deref() {
        Some(t) => t,
        None => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing title parameter"
            }));
        }
    };

    match data.store.get(title) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Title not found"
        })),
        Err(e) => store_error_response("Failed to read record", e),
    }
}

/// Replace location/use/category of one record. The title never changes.
async fn update_qr_details(
    data: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    // All four fields must be present as strings before the store is
    // touched at all.
    let field = |name: &str| body.get(name).and_then(|v| v.as_str());
    let (title, location, use_, category) = match (
        field("title"),
        field("location"),
        field("use"),
        field("category"),
    ) {
        (Some(t), Some(l), Some(u), Some(c)) => (t, l, u, c),
        _ => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Missing one or more required fields"
            }));
        }
    };

    match data.store.update(title, location, use_, category) {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Details updated successfully"
        })),
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Title not found"
        })),
        Err(e) => store_error_response("Failed to update record", e),
    }
}

/// Static editor page driving the two JSON endpoints above.
async fn edit_qr() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render::EDIT_PAGE)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/get_qr_details").route(web::get().to(get_qr_details)));
    cfg.service(web::resource("/update_qr_details").route(web::post().to(update_qr_details)));
    cfg.service(web::resource("/edit_qr").route(web::get().to(edit_qr)));
}
