//! Conversation and message types for the agent chat history.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who produced a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Agent,
    Error,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Agent => "agent",
            MessageRole::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(MessageRole::User),
            "agent" => Some(MessageRole::Agent),
            "error" => Some(MessageRole::Error),
            _ => None,
        }
    }
}

/// Context a conversation is anchored to: one email, or the whole inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Conversation,
    InboxConversation,
}

impl ConversationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationKind::Conversation => "conversation",
            ConversationKind::InboxConversation => "inbox_conversation",
        }
    }
}

impl Default for ConversationKind {
    fn default() -> Self {
        ConversationKind::Conversation
    }
}

/// One turn in a conversation. `timestamp` arrives from clients as an RFC 3339
/// string, an epoch-milliseconds number, or not at all; the merge engine
/// rewrites it to a canonical RFC 3339 string before the message is ever
/// returned to a caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    /// The user query an agent message answered, if the client recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// A multi-turn exchange with the agent, persisted as one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// String or number; absent until first save assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default)]
    pub kind: ConversationKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(rename = "emailId", default, skip_serializing_if = "Option::is_none")]
    pub email_id: Option<Value>,
    #[serde(rename = "emailSubject", default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
    #[serde(rename = "emailSender", default, skip_serializing_if = "Option::is_none")]
    pub email_sender: Option<String>,
    /// Timestamp of the latest exchange; drives the listing order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_role_round_trip() {
        for role in [MessageRole::User, MessageRole::Agent, MessageRole::Error] {
            assert_eq!(MessageRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(MessageRole::from_str("system"), None);
    }

    #[test]
    fn conversation_deserializes_wire_shape() {
        let conv: Conversation = serde_json::from_value(json!({
            "id": 1700000000000i64,
            "type": "inbox_conversation",
            "title": "Inbox Chat",
            "messages": [
                {"type": "user", "content": "hi", "timestamp": "2024-01-01T10:00:00Z"},
                {"type": "agent", "content": "hello", "query": "hi"}
            ],
            "timestamp": "2024-01-01T10:00:05Z"
        }))
        .unwrap();
        assert_eq!(conv.kind, ConversationKind::InboxConversation);
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[1].role, MessageRole::Agent);
        assert!(conv.messages[1].timestamp.is_none());
    }

    #[test]
    fn kind_defaults_to_single_email_conversation() {
        let conv: Conversation =
            serde_json::from_value(json!({"title": "Chat", "messages": []})).unwrap();
        assert_eq!(conv.kind, ConversationKind::Conversation);
    }
}
