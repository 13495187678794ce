use actix_web::{web, HttpResponse, Responder};

use crate::models::AgentResult;
use crate::AppState;

async fn list_results(data: web::Data<AppState>) -> impl Responder {
    match data.agent_results.list().await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => {
            log::error!("Failed to list agent results: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn save_result(data: web::Data<AppState>, body: web::Json<AgentResult>) -> impl Responder {
    match data.agent_results.create(body.into_inner()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Agent result saved"
        })),
        Err(e) => {
            log::error!("Failed to save agent result: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn delete_result(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.agent_results.delete(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Agent result deleted"
        })),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Agent result not found"
        })),
        Err(e) => {
            log::error!("Failed to delete agent result {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/agent-results")
            .route("", web::get().to(list_results))
            .route("", web::post().to(save_result))
            .route("/{id}", web::delete().to(delete_result)),
    );
}
