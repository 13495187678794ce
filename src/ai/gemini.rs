//! Gemini REST client.
//!
//! The agent routes treat this as an opaque text-in/text-out function: any
//! failure (missing key, transport error, refusal) comes back as a plain
//! string prefixed `LLM ERROR:` instead of an error type, and no call is
//! retried. Callers never parse the result.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        GeminiClient {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    /// Run one completion. Returns the model's text, or a string prefixed
    /// `LLM ERROR:` describing what went wrong.
    pub async fn run(&self, system_prompt: &str, user_prompt: &str) -> String {
        match self.generate(system_prompt, user_prompt).await {
            Ok(text) => text,
            Err(message) => format!("LLM ERROR: {}", message),
        }
    }

    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "GEMINI_API_KEY is not set".to_string())?;

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );
        let request = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system_prompt.to_string() }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: user_prompt.to_string() }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Gemini API returned {}: {}", status, body));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| e.to_string())?;
        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err("Gemini returned no candidates".to_string());
        }
        Ok(text)
    }
}
