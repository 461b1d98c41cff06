use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::sheet::SheetItem;
use crate::AppState;

#[derive(Deserialize)]
struct SheetRequest {
    #[serde(default)]
    data: Vec<SheetItem>,
}

/// Compose the QR sheet for the posted codes. Runs synchronously to
/// completion; any failure drops the whole batch.
async fn generate_sheet(
    data: web::Data<AppState>,
    body: web::Json<SheetRequest>,
) -> impl Responder {
    match data.sheet.generate(&body.data) {
        Ok(png) => HttpResponse::Ok().content_type("image/png").body(png),
        Err(e) => {
            log::error!("Sheet generation failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate_sheet").route(web::post().to(generate_sheet)));
}
