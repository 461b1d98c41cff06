use actix_web::{web, HttpResponse, Responder};

use crate::render;
use crate::AppState;

/// HTML detail page a scanned QR tile lands on. Codes arrive in
/// arbitrary case, so the lookup is folded to upper case.
async fn view_code(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let code = path.into_inner();

    match data.store.get_by_code(&code) {
        Ok(Some(record)) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render::detail_page(&record)),
        Ok(None) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(render::not_found_page(&code)),
        Err(e) => {
            log::error!("Failed to look up code {}: {}", code, e);
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body("<h3>Internal server error</h3>")
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/view/{code}").route(web::get().to(view_code)));
}
