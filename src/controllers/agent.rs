//! The two agent routes: ask about one email, or ask about the whole inbox.
//!
//! Both assemble a prompt, make a single LLM call, and return the text as-is.
//! A failed call comes back as an `LLM ERROR: ...` string inside a 200
//! response; the client renders it like any other answer.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::Value;

use crate::models::Email;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct AgentQuery {
    email: Email,
    #[serde(rename = "userQuery")]
    user_query: String,
}

#[derive(Debug, Deserialize)]
struct InboxAgentQuery {
    inbox: Vec<Email>,
    #[serde(rename = "userQuery")]
    user_query: String,
}

async fn run_agent(data: web::Data<AppState>, body: web::Json<AgentQuery>) -> impl Responder {
    let prompts = match data.prompts.get().await {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to load prompts for agent call: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    let system_prompt = format!(
        "\nYou are an intelligent Email Productivity Agent.\n\
         ALL actions must strictly follow these user-defined prompts:\n\n\
         - Categorization: {}\n\
         - Action Item Extraction: {}\n\
         - Auto Reply Drafting: {}\n\n\
         Return clean text only.",
        prompts.categorization, prompts.action_item, prompts.auto_reply
    );

    let user_prompt = format!(
        "\nEMAIL CONTENT:\n{}\n\nUSER REQUEST:\n{}\n",
        body.email.body, body.user_query
    );

    let result = data.llm.run(&system_prompt, &user_prompt).await;
    HttpResponse::Ok().json(serde_json::json!({ "result": result }))
}

const INBOX_AGENT_SYSTEM_PROMPT: &str = "\
You are an intelligent Inbox Analysis Agent that can analyze an entire inbox of emails.

Your capabilities:
- Analyze patterns across all emails
- Find emails by sender, date, content, or category
- Summarize inbox contents
- Identify urgent or important emails
- Group emails by topics or senders
- Answer questions about email trends and statistics

Rules:
1. Always provide helpful, accurate responses based on the actual email data
2. If no emails match the criteria, clearly state that
3. Be concise but comprehensive
4. Use clear formatting for lists and summaries
5. Include relevant email details (subject, sender, date) when appropriate

Return clean, well-formatted text responses.";

/// Bodies are truncated so a large inbox still fits one prompt.
fn summarize_email(email: &Email) -> Value {
    let mut body: String = email.body.chars().take(200).collect();
    if email.body.chars().count() > 200 {
        body.push_str("...");
    }
    serde_json::json!({
        "id": email.id,
        "subject": email.subject,
        "sender": email.sender,
        "timestamp": email.timestamp,
        "body": body
    })
}

async fn run_inbox_agent(
    data: web::Data<AppState>,
    body: web::Json<InboxAgentQuery>,
) -> impl Responder {
    let summary: Vec<Value> = body.inbox.iter().map(summarize_email).collect();
    let summary_text =
        serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "[]".to_string());

    let user_prompt = format!(
        "\nINBOX SUMMARY ({} emails):\n{}\n\nUSER QUERY: {}\n\n\
         Please analyze the inbox and provide a helpful response to the user's query.",
        body.inbox.len(),
        summary_text,
        body.user_query
    );

    let result = data.llm.run(INBOX_AGENT_SYSTEM_PROMPT, &user_prompt).await;
    HttpResponse::Ok().json(serde_json::json!({ "result": result }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/agent").route(web::post().to(run_agent)));
    cfg.service(web::resource("/inbox-agent").route(web::post().to(run_inbox_agent)));
}
