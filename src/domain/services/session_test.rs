use ratatui::prelude::Rect;

use super::SessionState;
use super::SEND_FAILED_MARKER;
use crate::domain::models::Author;
use crate::domain::models::ConversationId;
use crate::domain::models::ConversationSummary;
use crate::domain::models::Message;
use crate::domain::models::MessageType;

fn summary(id: &str, preview: &str) -> ConversationSummary {
    return ConversationSummary {
        id: ConversationId::new(id),
        preview: Some(preview.to_string()),
    };
}

fn wide_session() -> SessionState {
    let mut session = SessionState::new();
    session.set_rect(Rect::new(0, 0, 120, 40));
    return session;
}

fn opened_session(id: &str, history: Vec<Message>) -> SessionState {
    let mut session = wide_session();
    session.request_open(ConversationId::new(id));
    assert!(session.apply_history(&ConversationId::new(id), history));
    return session;
}

#[test]
fn it_starts_with_no_active_conversation() {
    let session = SessionState::new();
    assert_eq!(session.active_conversation, None);
    assert!(session.messages.is_empty());
    assert!(session.conversations.is_empty());
    assert!(session.sidebar_visible);
}

#[test]
fn it_replaces_the_conversation_list_wholesale() {
    let mut session = wide_session();
    session.replace_conversations(vec![summary("1", "hello"), summary("2", "bye")]);
    assert_eq!(session.conversations.len(), 2);
    assert_eq!(session.conversations[0].id, ConversationId::new("1"));

    session.replace_conversations(vec![summary("3", "new")]);
    assert_eq!(session.conversations.len(), 1);
    assert_eq!(session.conversations[0].id, ConversationId::new("3"));
}

#[test]
fn it_clamps_the_selection_when_the_list_shrinks() {
    let mut session = wide_session();
    session.replace_conversations(vec![
        summary("1", "a"),
        summary("2", "b"),
        summary("3", "c"),
    ]);
    session.select_next_conversation();
    session.select_next_conversation();
    assert_eq!(session.selected_conversation, 2);

    session.replace_conversations(vec![summary("1", "a")]);
    assert_eq!(session.selected_conversation, 0);
}

#[test]
fn it_opens_a_conversation_with_its_history() {
    let mut session = wide_session();
    session.replace_conversations(vec![summary("1", "hello"), summary("2", "bye")]);

    session.request_open(ConversationId::new("2"));
    let applied = session.apply_history(
        &ConversationId::new("2"),
        vec![Message::new(Author::User, "bye")],
    );

    assert!(applied);
    assert_eq!(session.active_conversation, Some(ConversationId::new("2")));
    assert_eq!(session.messages, vec![Message::new(Author::User, "bye")]);
}

#[test]
fn it_replaces_messages_on_every_open() {
    let mut session = opened_session("1", vec![Message::new(Author::User, "old")]);

    session.request_open(ConversationId::new("2"));
    session.apply_history(
        &ConversationId::new("2"),
        vec![
            Message::new(Author::User, "hi"),
            Message::new(Author::Assistant, "hello!"),
        ],
    );

    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].text, "hi");
    assert_eq!(session.active_conversation, Some(ConversationId::new("2")));
}

#[test]
fn it_discards_history_for_a_superseded_open() {
    let mut session = wide_session();
    session.request_open(ConversationId::new("1"));
    session.request_open(ConversationId::new("2"));

    let applied = session.apply_history(
        &ConversationId::new("1"),
        vec![Message::new(Author::User, "stale")],
    );

    assert!(!applied);
    assert_eq!(session.active_conversation, None);
    assert!(session.messages.is_empty());

    assert!(session.apply_history(&ConversationId::new("2"), vec![]));
    assert_eq!(session.active_conversation, Some(ConversationId::new("2")));
}

#[test]
fn it_keeps_the_previous_conversation_on_open_failure() {
    let mut session = opened_session("1", vec![Message::new(Author::User, "hi")]);

    session.request_open(ConversationId::new("2"));
    let applied = session.apply_open_failure(&ConversationId::new("2"), "connection refused");

    assert!(applied);
    assert_eq!(session.active_conversation, Some(ConversationId::new("1")));
    assert_eq!(session.messages.len(), 1);
    assert!(session.notice.is_some());

    // A history arriving after the failure was reported is long stale.
    assert!(!session.apply_history(&ConversationId::new("2"), vec![]));
}

#[test]
fn it_creates_a_fresh_empty_conversation() {
    let mut session = opened_session("1", vec![Message::new(Author::User, "hi")]);

    session.request_create();
    session.apply_created(ConversationId::new("9"));

    assert_eq!(session.active_conversation, Some(ConversationId::new("9")));
    assert!(session.messages.is_empty());
    assert_eq!(session.notice, None);
}

#[test]
fn it_leaves_state_intact_on_create_failure() {
    let mut session = opened_session("1", vec![Message::new(Author::User, "hi")]);

    session.request_create();
    session.apply_create_failure("connection refused");

    assert_eq!(session.active_conversation, Some(ConversationId::new("1")));
    assert_eq!(session.messages.len(), 1);
    assert!(session.notice.is_some());
}

#[test]
fn it_discards_history_superseded_by_a_create() {
    let mut session = wide_session();
    session.request_open(ConversationId::new("1"));
    session.request_create();

    let applied = session.apply_history(
        &ConversationId::new("1"),
        vec![Message::new(Author::User, "stale")],
    );

    assert!(!applied);
    assert!(session.messages.is_empty());
}

#[test]
fn it_ignores_blank_input() {
    let mut session = opened_session("1", vec![]);

    session.pending_input = "".to_string();
    assert!(session.submit_pending().is_none());

    session.pending_input = "   ".to_string();
    assert!(session.submit_pending().is_none());
    assert_eq!(session.pending_input, "   ");
    assert!(session.messages.is_empty());
    assert!(!session.waiting_for_reply());
}

#[test]
fn it_ignores_input_with_no_active_conversation() {
    let mut session = wide_session();
    session.pending_input = "hi".to_string();

    assert!(session.submit_pending().is_none());
    assert_eq!(session.pending_input, "hi");
    assert!(session.messages.is_empty());
}

#[test]
fn it_appends_the_user_entry_before_any_reply() {
    let mut session = opened_session("1", vec![]);
    session.pending_input = "  hi  ".to_string();

    let prompt = session.submit_pending().unwrap();

    assert_eq!(prompt.conversation, ConversationId::new("1"));
    assert_eq!(prompt.text, "hi");
    assert_eq!(session.pending_input, "");
    assert_eq!(session.messages, vec![Message::new(Author::User, "hi")]);
    assert!(session.waiting_for_reply());
}

#[test]
fn it_appends_the_reply_after_the_user_entry() {
    let mut session = opened_session("1", vec![]);
    session.pending_input = "hi".to_string();
    session.submit_pending().unwrap();

    let applied = session.apply_reply(
        &ConversationId::new("1"),
        Message::new(Author::Assistant, "hello!"),
    );

    assert!(applied);
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0].author, Author::User);
    assert_eq!(session.messages[1].author, Author::Assistant);
    assert_eq!(session.messages[1].text, "hello!");
    assert!(!session.waiting_for_reply());
}

#[test]
fn it_substitutes_the_marker_on_send_failure() {
    let mut session = opened_session("1", vec![]);
    session.pending_input = "hi".to_string();
    session.submit_pending().unwrap();

    let applied = session.apply_reply_failure(&ConversationId::new("1"));

    assert!(applied);
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.messages[0], Message::new(Author::User, "hi"));
    assert_eq!(session.messages[1].text, SEND_FAILED_MARKER);
    assert_eq!(session.messages[1].message_type(), MessageType::Error);
}

#[test]
fn it_discards_replies_for_an_inactive_conversation() {
    let mut session = opened_session("1", vec![]);
    session.pending_input = "hi".to_string();
    session.submit_pending().unwrap();

    session.request_open(ConversationId::new("2"));
    session.apply_history(
        &ConversationId::new("2"),
        vec![Message::new(Author::User, "bye")],
    );

    let applied = session.apply_reply(
        &ConversationId::new("1"),
        Message::new(Author::Assistant, "late"),
    );

    assert!(!applied);
    assert_eq!(session.messages, vec![Message::new(Author::User, "bye")]);
    assert!(!session.waiting_for_reply());
}

#[test]
fn it_collapses_the_sidebar_on_narrow_viewports() {
    let mut session = SessionState::new();
    session.set_rect(Rect::new(0, 0, 40, 20));

    session.request_open(ConversationId::new("1"));
    session.apply_history(&ConversationId::new("1"), vec![]);

    assert!(!session.sidebar_visible);
}

#[test]
fn it_keeps_the_sidebar_on_wide_viewports() {
    let mut session = wide_session();

    session.request_open(ConversationId::new("1"));
    session.apply_history(&ConversationId::new("1"), vec![]);

    assert!(session.sidebar_visible);
}

#[test]
fn it_classifies_the_viewport_when_the_open_is_requested() {
    let mut session = SessionState::new();
    session.set_rect(Rect::new(0, 0, 40, 20));
    session.request_open(ConversationId::new("1"));

    // Resizing after the decision does not retroactively change it.
    session.set_rect(Rect::new(0, 0, 120, 40));
    session.apply_history(&ConversationId::new("1"), vec![]);

    assert!(!session.sidebar_visible);
}

#[test]
fn it_toggles_the_sidebar() {
    let mut session = wide_session();
    assert!(session.sidebar_visible);
    session.toggle_sidebar();
    assert!(!session.sidebar_visible);
    session.toggle_sidebar();
    assert!(session.sidebar_visible);
}

#[test]
fn it_moves_the_sidebar_selection_within_bounds() {
    let mut session = wide_session();
    session.replace_conversations(vec![summary("1", "a"), summary("2", "b")]);

    session.select_previous_conversation();
    assert_eq!(session.selected_conversation, 0);

    session.select_next_conversation();
    assert_eq!(session.selected_conversation, 1);
    session.select_next_conversation();
    assert_eq!(session.selected_conversation, 1);

    assert_eq!(
        session.selected_summary().unwrap().id,
        ConversationId::new("2")
    );
}
