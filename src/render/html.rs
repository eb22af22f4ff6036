//! HTML rendering of sessions
//!
//! Produces the message bubbles the browser client used, wrapped in a
//! standalone transcript document for `sessions export`. All text
//! passes through [`escape_html`].

use crate::render::{escape_html, format_list_time, format_message_time};
use crate::session::{Message, Role, Session};

/// Render one message bubble
pub fn message_bubble(message: &Message) -> String {
    let badge = match message.role {
        Role::Assistant => format!(r#"<span class="role-badge">{}</span>"#, message.role.header()),
        Role::User => format!("<span>{}</span>", message.role.header()),
    };

    format!(
        r#"<div class="message {role}">
  <div class="message-content">
    <div class="message-header">{badge}</div>
    <div class="message-text">{text}</div>
    <div class="message-footer"><span>{time}</span></div>
  </div>
</div>"#,
        role = message.role,
        badge = badge,
        text = escape_html(&message.content),
        time = escape_html(&format_message_time(&message.timestamp)),
    )
}

/// Render a complete standalone transcript of `session`
pub fn transcript(session: &Session) -> String {
    let body = if session.messages.is_empty() {
        r#"<p class="empty">No messages yet</p>"#.to_string()
    } else {
        session
            .messages
            .iter()
            .map(message_bubble)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<header>
  <h1>{title}</h1>
  <p class="subtitle">Last updated: {updated}</p>
</header>
<main class="messages">
{body}
</main>
</body>
</html>
"#,
        title = escape_html(&session.title),
        updated = escape_html(&format_list_time(&session.updated_at)),
        body = body,
    )
}
