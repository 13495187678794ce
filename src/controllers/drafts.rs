use actix_web::{web, HttpResponse, Responder};

use crate::models::Draft;
use crate::AppState;

async fn list_drafts(data: web::Data<AppState>) -> impl Responder {
    match data.drafts.list().await {
        Ok(drafts) => HttpResponse::Ok().json(drafts),
        Err(e) => {
            log::error!("Failed to list drafts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn save_draft(data: web::Data<AppState>, body: web::Json<Draft>) -> impl Responder {
    match data.drafts.create(body.into_inner()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Draft saved"
        })),
        Err(e) => {
            log::error!("Failed to save draft: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn delete_draft(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.drafts.delete(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Draft deleted"
        })),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Draft not found"
        })),
        Err(e) => {
            log::error!("Failed to delete draft {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/drafts")
            .route("", web::get().to(list_drafts))
            .route("", web::post().to(save_draft))
            .route("/{id}", web::delete().to(delete_draft)),
    );
}
