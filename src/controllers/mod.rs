pub mod health;
pub mod records;
pub mod sheet;
pub mod view;

use actix_web::HttpResponse;

use crate::store::StoreError;

/// Map a store failure to its HTTP response. Invalid field values are the
/// client's fault; anything else is an internal error whose detail goes
/// to the log, not the client.
pub(crate) fn store_error_response(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::InvalidField(msg) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": msg
        })),
        err => {
            log::error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Storage error"
            }))
        }
    }
}
