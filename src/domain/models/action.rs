use super::ConversationId;
use super::UserPrompt;

pub enum Action {
    CreateConversation(),
    OpenConversation(ConversationId),
    RefreshConversations(),
    SendPrompt(UserPrompt),
}
