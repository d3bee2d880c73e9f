//! CSV message saver

use std::io::Write;

use anyhow::Result;

use super::MessageSaver;
use crate::models::Message;

/// Column labels for the header row
const HEADER: [&str; 6] = ["ID", "Date", "Channel", "Topic", "Author", "Content"];

/// Writes messages as comma-separated rows in input order
///
/// Content goes out verbatim, markup included. Quoting keeps embedded
/// delimiters, quotes and newlines round-trippable.
#[derive(Debug, Default)]
pub struct CsvSaver;

impl CsvSaver {
    pub fn new() -> Self {
        Self
    }

    /// Escape a field value for CSV
    fn escape_field(value: &str) -> String {
        let needs_quoting = value.contains(',')
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r');

        if needs_quoting {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    /// Write a CSV row
    fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> Result<()> {
        let line: Vec<String> = fields.iter().map(|f| Self::escape_field(f)).collect();
        writeln!(writer, "{}", line.join(","))?;
        Ok(())
    }
}

impl MessageSaver for CsvSaver {
    fn write_messages<W: Write>(&self, writer: &mut W, messages: &[Message]) -> Result<()> {
        Self::write_row(writer, &HEADER)?;

        for message in messages {
            let id = message.id.to_string();
            let date = message.timestamp.to_rfc3339();
            Self::write_row(
                writer,
                &[
                    &id,
                    &date,
                    &message.channel,
                    &message.topic,
                    &message.sender,
                    &message.content,
                ],
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_message(id: u64, content: &str) -> Message {
        Message {
            id,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).single().unwrap(),
            channel: "general".to_string(),
            topic: "intro".to_string(),
            sender: "Ada Lovelace".to_string(),
            content: content.to_string(),
        }
    }

    fn save_to_string(messages: &[Message]) -> String {
        let mut buf = Vec::new();
        CsvSaver::new().write_messages(&mut buf, messages).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Minimal CSV reader for round-trip checks
    ///
    /// Handles quoted fields spanning multiple lines, so newline content is
    /// representable.
    fn parse_records(text: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut chars = text.chars().peekable();
        let mut quoted = false;

        while let Some(c) = chars.next() {
            match c {
                '"' if quoted => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        quoted = false;
                    }
                }
                '"' if field.is_empty() => quoted = true,
                ',' if !quoted => fields.push(std::mem::take(&mut field)),
                '\n' if !quoted => {
                    fields.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut fields));
                }
                c => field.push(c),
            }
        }
        if !field.is_empty() || !fields.is_empty() {
            fields.push(field);
            records.push(fields);
        }
        records
    }

    #[test]
    fn test_empty_input_yields_header_only() {
        assert_eq!(save_to_string(&[]), "ID,Date,Channel,Topic,Author,Content\n");
    }

    #[test]
    fn test_plain_row() {
        let output = save_to_string(&[make_message(1, "hello")]);
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("ID,Date,Channel,Topic,Author,Content"));
        assert_eq!(
            lines.next(),
            Some("1,2023-11-14T22:13:20+00:00,general,intro,Ada Lovelace,hello")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_quoting_round_trips_commas_and_quotes() {
        let content = r#"He said, "hi""#;
        let output = save_to_string(&[make_message(1, content)]);

        let records = parse_records(&output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].len(), 6);
        assert_eq!(records[1][5], content);
    }

    #[test]
    fn test_quoting_round_trips_embedded_newlines() {
        let content = "line1\nline2\rline3, \"quoted\"";
        let output = save_to_string(&[make_message(1, content), make_message(2, "plain")]);

        let records = parse_records(&output);
        assert_eq!(records.len(), 3);
        assert_eq!(records[1][0], "1");
        assert_eq!(records[1][5], content);
        assert_eq!(records[2][5], "plain");
    }

    #[test]
    fn test_rows_keep_input_order() {
        let output = save_to_string(&[make_message(3, "c"), make_message(1, "a")]);
        let ids: Vec<&str> = output
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
