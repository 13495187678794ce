pub mod conversation;
pub mod record;

pub use conversation::{ChatMessage, Conversation};
pub use record::{AgentResult, Draft, Email, Prompts, RecordKind};
