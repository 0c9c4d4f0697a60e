/// Wire fixtures matching the Lyra chat service's response shapes, shared
/// between the HTTP client tests.
pub fn chats_json_fixture() -> &'static str {
    return r#"
{
  "chats": [
    { "chat_id": 1, "last": "hello" },
    { "chat_id": 2 }
  ]
}
"#
    .trim();
}

pub fn history_json_fixture() -> &'static str {
    return r#"
{
  "history": [
    { "sender": "user", "text": "hi" },
    { "sender": "ai", "text": "hello there" }
  ]
}
"#
    .trim();
}
