use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod ai;
mod config;
mod controllers;
mod error;
mod models;
mod store;

use ai::GeminiClient;
use config::{Config, StoreBackend};
use store::agent_results::AgentResults;
use store::conversations::Conversations;
use store::drafts::Drafts;
use store::prompts::PromptsStore;
use store::{Collection, FileStore, RecordStore, SqliteStore};

pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub drafts: Drafts,
    pub agent_results: AgentResults,
    pub conversations: Conversations,
    pub prompts: PromptsStore,
    pub llm: Arc<GeminiClient>,
}

/// Load the inbox collection from the seed file, once. The inbox is read-only
/// over HTTP, so a non-empty collection means seeding already happened.
async fn seed_inbox(store: &Arc<dyn RecordStore>, seed_path: &str) {
    let existing = match store.list_all(Collection::Inbox).await {
        Ok(records) => records,
        Err(e) => {
            log::error!("Cannot check inbox collection: {}", e);
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }

    let bytes = match tokio::fs::read(seed_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("No inbox seed at {}: {}", seed_path, e);
            return;
        }
    };

    let emails: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
        Ok(emails) => emails,
        Err(e) => {
            log::error!("Inbox seed {} is not a JSON array: {}", seed_path, e);
            return;
        }
    };

    let mut seeded = 0usize;
    for email in emails {
        match store.insert(Collection::Inbox, email).await {
            Ok(_) => seeded += 1,
            Err(e) => log::error!("Failed to seed inbox email: {}", e),
        }
    }
    log::info!("Seeded {} inbox emails from {}", seeded, seed_path);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let port = config.port;

    let store: Arc<dyn RecordStore> = match config.store_backend {
        StoreBackend::Sqlite => {
            log::info!("Using SQLite store at {}", config.database_url);
            if let Some(parent) = std::path::Path::new(&config.database_url).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Arc::new(SqliteStore::new(&config.database_url).expect("Failed to open database"))
        }
        StoreBackend::File => {
            log::info!("Using flat-file store in {}", config.data_dir);
            Arc::new(FileStore::new(&config.data_dir).expect("Failed to open data directory"))
        }
    };

    seed_inbox(&store, &config.inbox_seed).await;

    let llm = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    if config.gemini_api_key.is_none() {
        log::warn!("GEMINI_API_KEY not set; agent routes will answer with LLM ERROR");
    }

    log::info!("Starting mailbot server on port {}", port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                store: Arc::clone(&store),
                drafts: Drafts::new(Arc::clone(&store)),
                agent_results: AgentResults::new(Arc::clone(&store)),
                conversations: Conversations::new(Arc::clone(&store)),
                prompts: PromptsStore::new(Arc::clone(&store)),
                llm: Arc::clone(&llm),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config)
            .configure(controllers::inbox::config)
            .configure(controllers::prompts::config)
            .configure(controllers::agent::config)
            .configure(controllers::drafts::config)
            .configure(controllers::agent_results::config)
            .configure(controllers::conversations::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
