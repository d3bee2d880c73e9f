//! Plain-text message saver

use std::io::Write;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use super::MessageSaver;
use crate::models::Message;

/// Writes messages as human-readable blocks, oldest first
///
/// Records are stable-sorted by timestamp (equal timestamps keep their input
/// order), then written as six-line blocks separated by a 40-dash rule.
#[derive(Debug, Default)]
pub struct TextSaver;

impl TextSaver {
    pub fn new() -> Self {
        Self
    }
}

impl MessageSaver for TextSaver {
    fn write_messages<W: Write>(&self, writer: &mut W, messages: &[Message]) -> Result<()> {
        let mut sorted: Vec<&Message> = messages.iter().collect();
        sorted.sort_by_key(|m| m.timestamp);

        for message in sorted {
            writeln!(writer, "ID: {}", message.id)?;
            writeln!(writer, "Date: {}", message.timestamp.to_rfc3339())?;
            writeln!(writer, "Channel: {}", message.channel)?;
            writeln!(writer, "Topic: {}", message.topic)?;
            writeln!(writer, "Author: {}", message.sender)?;
            writeln!(writer, "Content:\n{}", sanitize_content(&message.content))?;
            writeln!(writer, "\n{}\n", "-".repeat(40))?;
        }

        Ok(())
    }
}

/// Strip markup tags, then decode HTML character entities
///
/// Tag stripping is non-greedy bracket matching with no nesting awareness.
/// `&amp;` decodes last, so `&amp;lt;` yields `&lt;` (one pass, like a real
/// entity decoder) instead of `<`. Only the six entities Zulip's renderer
/// commonly emits are decoded; other named or numeric entities (e.g.
/// `&#8212;`) pass through untouched. Best-effort cleanup, not an HTML
/// parser.
pub fn sanitize_content(content: &str) -> String {
    let stripped = tag_regex().replace_all(content, "");
    stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}
