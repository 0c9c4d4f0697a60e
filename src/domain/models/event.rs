use tui_textarea::Input;

use super::ConversationId;
use super::ConversationSummary;
use super::Message;

pub enum Event {
    ConversationCreated(ConversationId),
    ConversationCreateFailed(String),
    ConversationList(Vec<ConversationSummary>),
    HistoryLoaded(ConversationId, Vec<Message>),
    HistoryLoadFailed(ConversationId, String),
    PromptReply(ConversationId, Message),
    PromptFailed(ConversationId),
    KeyboardCharInput(Input),
    KeyboardCTRLB(),
    KeyboardCTRLC(),
    KeyboardCTRLN(),
    KeyboardCTRLO(),
    KeyboardEnter(),
    KeyboardPaste(String),
    SidebarSelectDown(),
    SidebarSelectUp(),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
