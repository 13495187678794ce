use actix_web::{web, HttpResponse, Responder};

use crate::models::Prompts;
use crate::AppState;

async fn get_prompts(data: web::Data<AppState>) -> impl Responder {
    match data.prompts.get().await {
        Ok(prompts) => HttpResponse::Ok().json(prompts),
        Err(e) => {
            log::error!("Failed to load prompts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn save_prompts(data: web::Data<AppState>, body: web::Json<Prompts>) -> impl Responder {
    match data.prompts.replace(body.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Prompts updated"
        })),
        Err(e) => {
            log::error!("Failed to save prompts: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/prompts")
            .route(web::get().to(get_prompts))
            .route(web::post().to(save_prompts)),
    );
}
