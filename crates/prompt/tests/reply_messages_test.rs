//! Tests for generation-request assembly in the `prompt` crate.

use prompt::{
    build_reply_messages, clean_reply, format_quote, format_quote_context, ChatMessage,
    MessageRole, DEFAULT_PERSONA_PROMPT, NO_QUOTES_NOTE, SECTION_CURRENT, SECTION_QUOTES,
};

#[test]
fn format_quote_includes_character() {
    assert_eq!(
        format_quote("Winter is coming.", "Ned Stark"),
        "\"Winter is coming.\" (Ned Stark)"
    );
}

#[test]
fn format_quote_without_character() {
    assert_eq!(format_quote("  Valar morghulis. ", " "), "\"Valar morghulis.\"");
}

#[test]
fn quote_context_lists_quotes_before_current_message() {
    let out = format_quote_context(
        ["\"Winter is coming.\" (Ned Stark)", "\"Burn them all.\" (Aerys II)"],
        "It is so cold",
    );
    let quotes_at = out.find(SECTION_QUOTES).unwrap();
    let current_at = out.find(SECTION_CURRENT).unwrap();
    assert!(quotes_at < current_at);
    assert!(out.contains("- \"Winter is coming.\" (Ned Stark)\n"));
    assert!(out.ends_with("It is so cold"));
    assert!(!out.contains(NO_QUOTES_NOTE));
}

#[test]
fn quote_context_without_quotes_asks_for_mystery() {
    let out = format_quote_context(Vec::<String>::new(), "asdfgh");
    assert!(out.contains(NO_QUOTES_NOTE));
    assert!(out.ends_with("asdfgh"));
}

#[test]
fn reply_messages_order_persona_history_current() {
    let history = vec![
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Winter is coming."),
    ];
    let messages = build_reply_messages(
        Some(DEFAULT_PERSONA_PROMPT),
        ["\"Hold the door.\" (Hodor)"],
        &history,
        "What should I do?",
    );

    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].role, MessageRole::System);
    assert_eq!(messages[0].content, DEFAULT_PERSONA_PROMPT);
    assert_eq!(messages[1], history[0]);
    assert_eq!(messages[2], history[1]);
    assert_eq!(messages[3].role, MessageRole::User);
    assert!(messages[3].content.contains("Hold the door."));
    assert!(messages[3].content.ends_with("What should I do?"));
}

#[test]
fn reply_messages_skip_system_entries_in_history() {
    let history = vec![ChatMessage::system("old instruction"), ChatMessage::user("Hi")];
    let messages = build_reply_messages(None, Vec::<String>::new(), &history, "Hello");
    assert_eq!(messages.len(), 2);
    assert!(messages.iter().all(|m| m.content != "old instruction"));
}

#[test]
fn blank_persona_is_omitted() {
    let messages = build_reply_messages(Some("  "), Vec::<String>::new(), &[], "Hello");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
}

#[test]
fn clean_reply_strips_wrapping_quotes() {
    assert_eq!(clean_reply("  \"Winter is coming.\"\n"), "Winter is coming.");
    assert_eq!(clean_reply("plain"), "plain");
    assert_eq!(clean_reply("\"\""), "");
}

#[test]
fn chat_message_serializes_lowercase_role() {
    let json = serde_json::to_string(&ChatMessage::assistant("Hodor")).unwrap();
    assert_eq!(json, r#"{"role":"assistant","content":"Hodor"}"#);
    let back: ChatMessage = serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
    assert_eq!(back, ChatMessage::user("hi"));
}
