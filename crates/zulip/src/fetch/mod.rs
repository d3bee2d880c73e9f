//! Fetch strategies and their filter/paging configuration
//!
//! A `FetchMode` names which messages a run retrieves and builds the narrow
//! clauses for it; `FetchConfig` carries the full filter/anchor/paging
//! parameters; `MessageFetcher` pairs a config with a message source and runs
//! the single bounded request.

use std::fmt;

use anyhow::Result;
use serde::{Serialize, Serializer};

use crate::api::{MessageSource, wire::GetMessagesResponse};

/// Maximum messages requested before the anchor in a single fetch
///
/// There is no pagination loop; one bounded request is the whole contract.
/// When more messages match than this ceiling, the older ones are silently
/// not retrieved.
pub const MAX_FETCH_MESSAGES: u32 = 5000;

/// Reference point a fetch counts backward/forward from
///
/// Either a named sentinel or an explicit message ID. The wire format keeps
/// the distinction: sentinels serialize to their string tag, `MessageId` to
/// the raw integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Newest,
    FirstUnread,
    Oldest,
    MessageId(u64),
}

impl Serialize for Anchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Anchor::MessageId(id) => serializer.serialize_u64(*id),
            Anchor::Newest => serializer.serialize_str("newest"),
            Anchor::FirstUnread => serializer.serialize_str("first_unread"),
            Anchor::Oldest => serializer.serialize_str("oldest"),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Newest => f.write_str("newest"),
            Anchor::FirstUnread => f.write_str("first_unread"),
            Anchor::Oldest => f.write_str("oldest"),
            Anchor::MessageId(id) => write!(f, "{}", id),
        }
    }
}

/// One (operator, operand) filter restricting which messages a fetch returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrowClause {
    pub operator: String,
    pub operand: String,
}

impl NarrowClause {
    pub fn new(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self {
            operator: operator.into(),
            operand: operand.into(),
        }
    }
}

/// Filter, anchor and paging parameters for one fetch
///
/// Narrow clauses keep their construction order; some servers evaluate
/// filters order-sensitively. Immutable once built.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub narrow: Vec<NarrowClause>,
    pub anchor: Anchor,
    pub num_before: u32,
    pub num_after: u32,
}

impl FetchConfig {
    /// Map this configuration to its wire image
    ///
    /// Narrow semantics are not validated here; that is the server's job.
    pub fn to_request(&self) -> GetMessagesRequest {
        GetMessagesRequest {
            anchor: self.anchor,
            num_before: self.num_before,
            num_after: self.num_after,
            narrow: self.narrow.clone(),
        }
    }
}

/// Wire image of a `FetchConfig`, sent as the messages request
#[derive(Debug, Clone, Serialize)]
pub struct GetMessagesRequest {
    pub anchor: Anchor,
    pub num_before: u32,
    pub num_after: u32,
    pub narrow: Vec<NarrowClause>,
}

/// Which messages a run retrieves
///
/// A new fetch mode is a new variant plus its narrow builder; the fetcher and
/// config logic stay untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchMode {
    /// All unread messages, newest-anchored
    Unread,
    /// All messages in one stream topic
    Topic { stream: String, topic: String },
}

impl FetchMode {
    /// Build the narrow clauses for this mode
    fn narrow(&self) -> Vec<NarrowClause> {
        match self {
            FetchMode::Unread => vec![NarrowClause::new("is", "unread")],
            FetchMode::Topic { stream, topic } => vec![
                NarrowClause::new("stream", stream.clone()),
                NarrowClause::new("topic", topic.clone()),
            ],
        }
    }

    /// Build the fetch configuration for this mode
    ///
    /// Both modes anchor at the newest message and count backward up to
    /// [`MAX_FETCH_MESSAGES`].
    pub fn to_config(&self) -> FetchConfig {
        FetchConfig {
            narrow: self.narrow(),
            anchor: Anchor::Newest,
            num_before: MAX_FETCH_MESSAGES,
            num_after: 0,
        }
    }
}

/// Pairs a message source with the configuration built from a fetch mode
pub struct MessageFetcher<'a> {
    source: &'a dyn MessageSource,
    config: FetchConfig,
}

impl<'a> MessageFetcher<'a> {
    pub fn new(source: &'a dyn MessageSource, mode: &FetchMode) -> Self {
        Self {
            source,
            config: mode.to_config(),
        }
    }

    /// Run the single bounded request, returning the raw response unmodified
    pub fn fetch_messages(&self) -> Result<GetMessagesResponse> {
        self.source.get_messages(&self.config.to_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anchor_sentinels_serialize_to_strings() {
        assert_eq!(serde_json::to_value(Anchor::Newest).unwrap(), json!("newest"));
        assert_eq!(
            serde_json::to_value(Anchor::FirstUnread).unwrap(),
            json!("first_unread")
        );
        assert_eq!(serde_json::to_value(Anchor::Oldest).unwrap(), json!("oldest"));
    }

    #[test]
    fn test_anchor_message_id_serializes_to_integer() {
        assert_eq!(serde_json::to_value(Anchor::MessageId(123)).unwrap(), json!(123));
    }

    #[test]
    fn test_anchor_display_matches_wire_tokens() {
        assert_eq!(Anchor::Newest.to_string(), "newest");
        assert_eq!(Anchor::FirstUnread.to_string(), "first_unread");
        assert_eq!(Anchor::Oldest.to_string(), "oldest");
        assert_eq!(Anchor::MessageId(123).to_string(), "123");
    }

    #[test]
    fn test_unread_mode_request_shape() {
        let request = FetchMode::Unread.to_config().to_request();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "anchor": "newest",
                "num_before": 5000,
                "num_after": 0,
                "narrow": [{"operator": "is", "operand": "unread"}],
            })
        );
    }

    #[test]
    fn test_topic_mode_narrow_order() {
        let mode = FetchMode::Topic {
            stream: "general".to_string(),
            topic: "intro".to_string(),
        };
        let config = mode.to_config();

        assert_eq!(
            config.narrow,
            vec![
                NarrowClause::new("stream", "general"),
                NarrowClause::new("topic", "intro"),
            ]
        );
        assert_eq!(config.anchor, Anchor::Newest);
        assert_eq!(config.num_before, MAX_FETCH_MESSAGES);
        assert_eq!(config.num_after, 0);
    }

    #[test]
    fn test_request_preserves_narrow_order() {
        let mode = FetchMode::Topic {
            stream: "general".to_string(),
            topic: "intro".to_string(),
        };
        let request = mode.to_config().to_request();

        assert_eq!(
            serde_json::to_value(&request.narrow).unwrap(),
            json!([
                {"operator": "stream", "operand": "general"},
                {"operator": "topic", "operand": "intro"},
            ])
        );
    }
}
