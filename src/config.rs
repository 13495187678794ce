use std::env;

/// Which persistence backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    File,
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub data_dir: String,
    pub inbox_seed: String,
    pub gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("file") => StoreBackend::File,
            Err(_) | Ok("sqlite") => StoreBackend::Sqlite,
            Ok(other) => panic!("STORE_BACKEND must be 'sqlite' or 'file', got {other:?}"),
        };

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            store_backend,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./data/mailbot.db".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            inbox_seed: env::var("INBOX_SEED").unwrap_or_else(|_| "./data/inbox.json".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok(),
        }
    }
}
