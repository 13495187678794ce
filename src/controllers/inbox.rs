//! Read-only inbox listing. The collection is seeded at startup and never
//! mutated over HTTP.

use actix_web::{web, HttpResponse, Responder};
use serde_json::Value;

use crate::store::Collection;
use crate::AppState;

async fn list_inbox(data: web::Data<AppState>) -> impl Responder {
    match data.store.list_all(Collection::Inbox).await {
        Ok(records) => {
            let emails: Vec<Value> = records.into_iter().map(|r| r.doc).collect();
            HttpResponse::Ok().json(emails)
        }
        Err(e) => {
            log::error!("Failed to list inbox: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/inbox").route(web::get().to(list_inbox)));
}
