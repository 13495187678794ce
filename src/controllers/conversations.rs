use actix_web::{web, HttpResponse, Responder};

use crate::models::Conversation;
use crate::AppState;

async fn list_conversations(data: web::Data<AppState>) -> impl Responder {
    match data.conversations.list().await {
        Ok(conversations) => HttpResponse::Ok().json(conversations),
        Err(e) => {
            log::error!("Failed to list conversations: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// Upsert: an `id` that resolves to a stored conversation updates it in
/// place; anything else creates a new one. The response carries the saved
/// document so the client learns the assigned id on first save.
async fn save_conversation(
    data: web::Data<AppState>,
    body: web::Json<Conversation>,
) -> impl Responder {
    match data.conversations.save(body.into_inner()).await {
        Ok(conversation) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Conversation saved",
            "conversation": conversation
        })),
        Err(e) => {
            log::error!("Failed to save conversation: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

async fn delete_conversation(data: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match data.conversations.delete(&id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Conversation deleted"
        })),
        Err(e) if e.is_not_found() => HttpResponse::NotFound().json(serde_json::json!({
            "message": "Conversation not found"
        })),
        Err(e) => {
            log::error!("Failed to delete conversation {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .route("", web::get().to(list_conversations))
            .route("", web::post().to(save_conversation))
            .route("/{id}", web::delete().to(delete_conversation)),
    );
}
