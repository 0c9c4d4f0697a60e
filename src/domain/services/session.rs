#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use super::Scroll;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Author;
use crate::domain::models::ConversationId;
use crate::domain::models::ConversationSummary;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::UserPrompt;

/// Fixed reply shown in place of the assistant response when a send fails.
/// The optimistic user entry stays put either way.
pub const SEND_FAILED_MARKER: &str = "⚠️ Server not responding";

/// All client-visible conversation state, owned by the UI task. Every
/// transition is a synchronous method so no observer ever sees a partial
/// update; responses from in-flight requests are applied through the
/// `apply_*` methods, each of which guards against results that arrive after
/// the conversation they belong to stopped being the relevant one.
pub struct SessionState {
    pub active_conversation: Option<ConversationId>,
    pub conversations: Vec<ConversationSummary>,
    pub messages: Vec<Message>,
    pub notice: Option<String>,
    pub pending_input: String,
    pub scroll: Scroll,
    pub selected_conversation: usize,
    pub sidebar_visible: bool,
    awaiting_replies: usize,
    collapse_on_apply: bool,
    last_known_height: u16,
    last_known_width: u16,
    messages_dirty: bool,
    pending_open: Option<ConversationId>,
}

impl SessionState {
    pub fn new() -> SessionState {
        return SessionState {
            active_conversation: None,
            conversations: vec![],
            messages: vec![],
            notice: None,
            pending_input: "".to_string(),
            scroll: Scroll::default(),
            selected_conversation: 0,
            sidebar_visible: true,
            awaiting_replies: 0,
            collapse_on_apply: false,
            last_known_height: 0,
            last_known_width: 0,
            messages_dirty: false,
            pending_open: None,
        };
    }

    /// Wholesale replacement of the sidebar cache. The list is advisory for
    /// display only and never validates the active conversation.
    pub fn replace_conversations(&mut self, conversations: Vec<ConversationSummary>) {
        self.conversations = conversations;
        if self.selected_conversation >= self.conversations.len() {
            self.selected_conversation = self.conversations.len().saturating_sub(1);
        }
    }

    /// Marks a conversation as the target of an open request. The narrow
    /// viewport classification is captured here, at the moment of the call,
    /// not when the history arrives.
    pub fn request_open(&mut self, conversation: ConversationId) {
        self.collapse_on_apply = self.is_narrow();
        self.pending_open = Some(conversation);
    }

    pub fn request_create(&mut self) {
        self.collapse_on_apply = self.is_narrow();
        // A create supersedes any open still waiting on its history.
        self.pending_open = None;
    }

    /// Applies a fetched history. Discards it when the open it answers has
    /// been superseded by a later open or create, so a slow fetch can never
    /// leak another conversation's messages into the current one.
    pub fn apply_history(&mut self, conversation: &ConversationId, history: Vec<Message>) -> bool {
        if self.pending_open.as_ref() != Some(conversation) {
            return false;
        }

        self.pending_open = None;
        self.active_conversation = Some(conversation.clone());
        self.messages = history;
        self.notice = None;
        self.messages_dirty = true;
        self.collapse_sidebar_if_flagged();

        return true;
    }

    /// A failed open leaves the previous conversation fully intact and
    /// surfaces the failure instead.
    pub fn apply_open_failure(&mut self, conversation: &ConversationId, err: &str) -> bool {
        if self.pending_open.as_ref() != Some(conversation) {
            return false;
        }

        self.pending_open = None;
        self.notice = Some(format!("Couldn't open that conversation: {err}"));

        return true;
    }

    pub fn apply_created(&mut self, conversation: ConversationId) {
        self.pending_open = None;
        self.active_conversation = Some(conversation);
        self.messages = vec![];
        self.notice = None;
        self.messages_dirty = true;
        self.collapse_sidebar_if_flagged();
    }

    pub fn apply_create_failure(&mut self, err: &str) {
        self.notice = Some(format!("Couldn't start a new conversation: {err}"));
    }

    /// Steps one and two of a send: trim and validate the pending input,
    /// clear it, and append the user entry before any network round trip. A
    /// blank input or a session with no active conversation is a no-op that
    /// leaves every field untouched.
    pub fn submit_pending(&mut self) -> Option<UserPrompt> {
        let text = self.pending_input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let conversation = self.active_conversation.clone()?;

        self.pending_input.clear();
        self.messages.push(Message::new(Author::User, &text));
        self.awaiting_replies += 1;
        self.messages_dirty = true;

        return Some(UserPrompt::new(conversation, &text));
    }

    /// Appends an assistant reply, unless the user has moved on to a
    /// different conversation since the send.
    pub fn apply_reply(&mut self, conversation: &ConversationId, message: Message) -> bool {
        self.awaiting_replies = self.awaiting_replies.saturating_sub(1);
        if self.active_conversation.as_ref() != Some(conversation) {
            return false;
        }

        self.messages.push(message);
        self.messages_dirty = true;

        return true;
    }

    pub fn apply_reply_failure(&mut self, conversation: &ConversationId) -> bool {
        self.awaiting_replies = self.awaiting_replies.saturating_sub(1);
        if self.active_conversation.as_ref() != Some(conversation) {
            return false;
        }

        self.messages.push(Message::new_with_type(
            Author::Assistant,
            MessageType::Error,
            SEND_FAILED_MARKER,
        ));
        self.messages_dirty = true;

        return true;
    }

    pub fn waiting_for_reply(&self) -> bool {
        return self.awaiting_replies > 0;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
    }

    pub fn select_previous_conversation(&mut self) {
        self.selected_conversation = self.selected_conversation.saturating_sub(1);
    }

    pub fn select_next_conversation(&mut self) {
        if self.selected_conversation + 1 < self.conversations.len() {
            self.selected_conversation += 1;
        }
    }

    pub fn selected_summary(&self) -> Option<&ConversationSummary> {
        return self.conversations.get(self.selected_conversation);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
    }

    /// Called once per frame with the rendered line count of the messages
    /// pane. Jumps to the bottom whenever the message list changed since the
    /// previous frame.
    pub fn sync_scroll(&mut self, line_count: u16, viewport_height: u16) {
        self.scroll.set_state(line_count, viewport_height);
        if self.messages_dirty {
            self.scroll.last();
            self.messages_dirty = false;
        }
    }

    fn is_narrow(&self) -> bool {
        let breakpoint = Config::get(ConfigKey::SidebarBreakpoint)
            .parse::<u16>()
            .unwrap_or(80);

        return self.last_known_width < breakpoint;
    }

    fn collapse_sidebar_if_flagged(&mut self) {
        if self.collapse_on_apply {
            self.sidebar_visible = false;
            self.collapse_on_apply = false;
        }
    }
}
