use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::ConversationId;
use super::ConversationSummary;
use super::Message;

/// A message ready to be dispatched to the service, produced once the session
/// has accepted the pending input and applied the optimistic append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserPrompt {
    pub conversation: ConversationId,
    pub text: String,
}

impl UserPrompt {
    pub fn new(conversation: ConversationId, text: &str) -> UserPrompt {
        return UserPrompt {
            conversation,
            text: text.to_string(),
        };
    }
}

/// The remote collaborator. Four request/response operations; anything beyond
/// success or failure of each call is the service's business.
#[async_trait]
pub trait ChatService {
    /// Returns every conversation belonging to the configured user, newest
    /// last, with whatever preview text the service keeps for each.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>>;

    /// Asks the service for a fresh conversation and returns its id.
    async fn create_conversation(&self) -> Result<ConversationId>;

    /// Returns the full ordered history of one conversation. An empty vec is
    /// a valid history.
    async fn fetch_history(&self, conversation: &ConversationId) -> Result<Vec<Message>>;

    /// Sends one user message and returns the assistant's reply text.
    async fn send_message(&self, prompt: &UserPrompt) -> Result<String>;
}

pub type ServiceHandle = Arc<dyn ChatService + Send + Sync>;
