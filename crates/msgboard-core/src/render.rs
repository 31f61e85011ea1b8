//! HTML rendering of messages with their reaction grid.
//!
//! Every user-supplied string goes through [`escape_html`]. Reaction names and
//! emoji come from the catalog and are trusted.

use std::fmt::Write;

use crate::format::format_timestamp;
use crate::html::escape_html;
use crate::message::Message;
use crate::reactions::{Reaction, ReactionCatalog};

/// Render one message as an HTML fragment.
pub fn render_message(message: &Message, catalog: &ReactionCatalog) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"message\">\n");
    html.push_str("  <div class=\"message-decoration\"></div>\n");
    html.push_str("  <div>\n");
    let _ = writeln!(
        html,
        "    <div class=\"message-content\">{}</div>",
        escape_html(&message.content)
    );

    html.push_str("    <div class=\"reactions-container\">\n");
    for row in catalog.rows() {
        let _ = writeln!(
            html,
            "      <div class=\"reactions reactions-row\">{}</div>",
            render_reaction_row(message, row)
        );
    }
    html.push_str("    </div>\n");

    let _ = writeln!(
        html,
        "    <div class=\"message-footer\"><span>{}</span><span>{}</span></div>",
        escape_html(&message.author),
        format_timestamp(&message.timestamp)
    );
    html.push_str("  </div>\n");
    html.push_str("</div>\n");

    html
}

fn render_reaction_row(message: &Message, row: &[Reaction]) -> String {
    let message_id = escape_html(&message.id);

    row.iter()
        .map(|reaction| {
            format!(
                "<button class=\"reaction-button\" data-reaction=\"{}\" data-message-id=\"{}\">\
                 <span class=\"reaction-emoji\">{}</span>\
                 <span class=\"reaction-count\">{}</span></button>",
                reaction.name,
                message_id,
                reaction.emoji,
                message.reaction_count(reaction.name)
            )
        })
        .collect()
}

/// Render the whole message container, messages in the order given.
pub fn render_board(messages: &[Message], catalog: &ReactionCatalog) -> String {
    let mut html = String::from("<div id=\"messages\">\n");
    for message in messages {
        html.push_str(&render_message(message, catalog));
    }
    html.push_str("</div>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn message_with(reactions: &[(&str, u64)]) -> Message {
        Message {
            id: "m1".to_string(),
            content: "<b>hi</b> & bye".to_string(),
            author: "O'Brien".to_string(),
            timestamp: "2024-01-05T14:07:33".to_string(),
            repository: "local".to_string(),
            reactions: reactions
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            github_url: None,
        }
    }

    /// (reaction name, count text) for each button, in document order
    fn button_counts(html: &str) -> Vec<(String, String)> {
        html.split("<button ")
            .skip(1)
            .map(|button| {
                let name = button
                    .split("data-reaction=\"")
                    .nth(1)
                    .and_then(|s| s.split('"').next())
                    .unwrap()
                    .to_string();
                let count = button
                    .split("<span class=\"reaction-count\">")
                    .nth(1)
                    .and_then(|s| s.split('<').next())
                    .unwrap()
                    .to_string();
                (name, count)
            })
            .collect()
    }

    #[test]
    fn test_heart_count_shown_others_zero() {
        let catalog = ReactionCatalog::default();
        let html = render_message(&message_with(&[("heart", 3)]), &catalog);
        let counts = button_counts(&html);

        assert_eq!(counts.len(), 24);
        for (name, count) in counts {
            if name == "heart" {
                assert_eq!(count, "3");
            } else {
                assert_eq!(count, "0", "{name}");
            }
        }
    }

    #[test]
    fn test_unknown_reactions_are_not_rendered() {
        let catalog = ReactionCatalog::default();
        let html = render_message(&message_with(&[("not_in_catalog", 9)]), &catalog);
        assert!(!html.contains("not_in_catalog"));
        assert!(button_counts(&html).iter().all(|(_, count)| count == "0"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let catalog = ReactionCatalog::default();
        let mut message = message_with(&[]);
        message.id = "\"><script>".to_string();
        let html = render_message(&message, &catalog);

        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt; &amp; bye"));
        assert!(html.contains("<span>O&#039;Brien</span>"));
        assert!(html.contains("data-message-id=\"&quot;&gt;&lt;script&gt;\""));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_two_reaction_rows_and_footer() {
        let catalog = ReactionCatalog::default();
        let html = render_message(&message_with(&[]), &catalog);
        assert_eq!(html.matches("reactions reactions-row").count(), 2);
        assert!(html.contains("<span>Jan 5, 2024, 02:07 PM</span>"));
    }

    #[test]
    fn test_board_keeps_server_order() {
        let catalog = ReactionCatalog::default();
        let mut first = message_with(&[]);
        first.content = "first".to_string();
        let mut second = message_with(&[]);
        second.content = "second".to_string();

        let html = render_board(&[first, second], &catalog);
        assert!(html.starts_with("<div id=\"messages\">"));
        let a = html.find("first").unwrap();
        let b = html.find("second").unwrap();
        assert!(a < b);
    }
}
