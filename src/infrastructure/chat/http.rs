#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::ChatService;
use crate::domain::models::ConversationId;
use crate::domain::models::ConversationSummary;
use crate::domain::models::Message;
use crate::domain::models::UserPrompt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserRequest {
    user: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ChatEntry {
    chat_id: ConversationId,
    last: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct UserChatsResponse {
    #[serde(default)]
    chats: Vec<ChatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NewChatResponse {
    chat_id: ConversationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryRequest {
    chat_id: ConversationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryEntry {
    sender: String,
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SendRequest {
    chat_id: ConversationId,
    user: String,
    message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SendResponse {
    ai_response: String,
}

impl HistoryEntry {
    fn into_message(self) -> Message {
        // The service marks its own messages with sender "ai".
        let author = if self.sender == "user" {
            Author::User
        } else {
            Author::Assistant
        };

        return Message::new(author, &self.text);
    }
}

pub struct HttpChatService {
    url: String,
    user: String,
}

impl Default for HttpChatService {
    fn default() -> HttpChatService {
        return HttpChatService {
            url: Config::get(ConfigKey::ServerUrl),
            user: Config::get(ConfigKey::Username),
        };
    }
}

#[async_trait]
impl ChatService for HttpChatService {
    #[allow(clippy::implicit_return)]
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        let res = reqwest::Client::new()
            .post(format!("{url}/user_chats/", url = self.url))
            .json(&UserRequest {
                user: self.user.to_string(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to list conversations");
            bail!("Failed to list conversations");
        }

        let body = res.json::<UserChatsResponse>().await?;
        tracing::debug!(count = body.chats.len(), "conversation list response");

        let conversations = body
            .chats
            .into_iter()
            .map(|chat| {
                return ConversationSummary {
                    id: chat.chat_id,
                    preview: chat.last,
                };
            })
            .collect();

        return Ok(conversations);
    }

    #[allow(clippy::implicit_return)]
    async fn create_conversation(&self) -> Result<ConversationId> {
        let res = reqwest::Client::new()
            .post(format!("{url}/new_chat/", url = self.url))
            .json(&UserRequest {
                user: self.user.to_string(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to create conversation");
            bail!("Failed to create conversation");
        }

        let body = res.json::<NewChatResponse>().await?;

        return Ok(body.chat_id);
    }

    #[allow(clippy::implicit_return)]
    async fn fetch_history(&self, conversation: &ConversationId) -> Result<Vec<Message>> {
        let res = reqwest::Client::new()
            .post(format!("{url}/history/", url = self.url))
            .json(&HistoryRequest {
                chat_id: conversation.clone(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to fetch history");
            bail!("Failed to fetch history");
        }

        let body = res.json::<HistoryResponse>().await?;
        tracing::debug!(count = body.history.len(), "history response");

        let messages = body
            .history
            .into_iter()
            .map(|entry| {
                return entry.into_message();
            })
            .collect();

        return Ok(messages);
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&self, prompt: &UserPrompt) -> Result<String> {
        let res = reqwest::Client::new()
            .post(format!("{url}/chat/", url = self.url))
            .json(&SendRequest {
                chat_id: prompt.conversation.clone(),
                user: self.user.to_string(),
                message: prompt.text.to_string(),
            })
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(status = res.status().as_u16(), "Failed to send message");
            bail!("Failed to send message");
        }

        let body = res.json::<SendResponse>().await?;

        return Ok(body.ai_response);
    }
}
