//! Record types and the per-collection discriminator.
//!
//! Collections hold loosely-typed JSON documents; the typed structs here are
//! the validated views used at the HTTP boundary. Unknown fields are kept via
//! `#[serde(flatten)]` so client extensions round-trip through storage.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator for documents sharing storage, derived from the optional
/// `type` field. Drafts (and seeded inbox emails) carry no tag at all, so the
/// absence of the field is itself a variant rather than a special case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// No `type` field present.
    Untagged,
    AgentResult,
    Conversation,
    InboxConversation,
    /// A `type` value this crate does not know about.
    Other(String),
}

impl RecordKind {
    /// Classify a stored document by its `type` field.
    pub fn of(doc: &Value) -> RecordKind {
        match doc.get("type").and_then(Value::as_str) {
            None => RecordKind::Untagged,
            Some("agent_result") => RecordKind::AgentResult,
            Some("conversation") => RecordKind::Conversation,
            Some("inbox_conversation") => RecordKind::InboxConversation,
            Some(other) => RecordKind::Other(other.to_string()),
        }
    }

    /// Whether the document belongs in the drafts listing.
    pub fn is_draft(&self) -> bool {
        match self {
            RecordKind::Untagged => true,
            RecordKind::AgentResult
            | RecordKind::Conversation
            | RecordKind::InboxConversation
            | RecordKind::Other(_) => false,
        }
    }

    /// Whether the document belongs in the agent-results listing.
    pub fn is_agent_result(&self) -> bool {
        match self {
            RecordKind::AgentResult => true,
            RecordKind::Untagged
            | RecordKind::Conversation
            | RecordKind::InboxConversation
            | RecordKind::Other(_) => false,
        }
    }

    /// Whether the document belongs in the conversations listing.
    pub fn is_conversation(&self) -> bool {
        match self {
            RecordKind::Conversation | RecordKind::InboxConversation => true,
            RecordKind::Untagged | RecordKind::AgentResult | RecordKind::Other(_) => false,
        }
    }
}

/// An email draft. Immutable once created; the only edit path is
/// delete-then-reinsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Draft {
    /// Client-assigned id (typically a `Date.now()` number) or absent, in
    /// which case the store assigns one on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub subject: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn agent_result_tag() -> String {
    "agent_result".to_string()
}

/// A saved answer from the agent, pinned by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default = "agent_result_tag")]
    pub kind: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub query: String,
    #[serde(rename = "emailSubject", default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(rename = "emailSender", default, skip_serializing_if = "Option::is_none")]
    pub email_sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(rename = "originalEmailId", default, skip_serializing_if = "Option::is_none")]
    pub original_email_id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A seeded inbox email. The inbox collection is read-only after seeding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub subject: String,
    pub sender: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The three user-editable prompt strings consumed verbatim by the agent
/// routes. Stored as a singleton document; content is never validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prompts {
    #[serde(default)]
    pub categorization: String,
    #[serde(default)]
    pub action_item: String,
    #[serde(default)]
    pub auto_reply: String,
}
