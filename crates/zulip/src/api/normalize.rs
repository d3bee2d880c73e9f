//! Zulip API response normalization
//!
//! Converts raw message items to domain models.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use super::wire::RawMessage;
use crate::models::Message;

/// Normalize a raw API message item to a Message
///
/// Every wire field maps to exactly one domain field. The only failure is an
/// out-of-range timestamp; there is no partial-skip policy, the caller aborts
/// on the first failed item.
pub fn normalize_message(raw: RawMessage) -> Result<Message> {
    let timestamp = Utc
        .timestamp_opt(raw.timestamp, 0)
        .single()
        .with_context(|| {
            format!(
                "Message {} has an out-of-range timestamp: {}",
                raw.id, raw.timestamp
            )
        })?;

    Ok(Message {
        id: raw.id,
        timestamp,
        channel: raw.display_recipient,
        topic: raw.subject,
        sender: raw.sender_full_name,
        content: raw.content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_raw(id: u64, timestamp: i64) -> RawMessage {
        RawMessage {
            id,
            timestamp,
            display_recipient: "general".to_string(),
            subject: "intro".to_string(),
            sender_full_name: "Ada Lovelace".to_string(),
            content: "<p>hello</p>".to_string(),
        }
    }

    #[test]
    fn test_normalize_maps_every_field() {
        let message = normalize_message(make_raw(42, 1_700_000_000)).unwrap();

        assert_eq!(message.id, 42);
        assert_eq!(message.timestamp.timestamp(), 1_700_000_000);
        assert_eq!(message.channel, "general");
        assert_eq!(message.topic, "intro");
        assert_eq!(message.sender, "Ada Lovelace");
        assert_eq!(message.content, "<p>hello</p>");
    }

    #[test]
    fn test_normalize_is_total_over_valid_items() {
        let records: Vec<Message> = (0..10)
            .map(|i| normalize_message(make_raw(i, 1_700_000_000 + i as i64)).unwrap())
            .collect();

        assert_eq!(records.len(), 10);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.id, i as u64);
        }
    }

    #[test]
    fn test_normalize_rejects_out_of_range_timestamp() {
        assert!(normalize_message(make_raw(1, i64::MAX)).is_err());
    }
}
