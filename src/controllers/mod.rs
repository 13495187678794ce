pub mod agent;
#[cfg(test)]
mod api_tests;
pub mod agent_results;
pub mod conversations;
pub mod drafts;
pub mod health;
pub mod inbox;
pub mod prompts;
