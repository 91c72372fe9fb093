//! Wire-neutral push message model.
//!
//! Mirrors the shapes mobile push backends accept: a single-target message
//! carries one device token, a multicast message fans the same body out to
//! a token list. Delivery clients map these onto their vendor's request
//! types.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delivery priority hint passed through to the push backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagePriority {
    #[default]
    Normal,
    High,
}

/// Visible notification content (title and body shown on the device).
///
/// Data-only messages omit this entirely and let the receiving app decide
/// what, if anything, to display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PushContent {
    pub title: String,
    pub body: String,
    /// Optional image URL rendered alongside the notification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PushContent {
    /// Create content with a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image_url: None,
        }
    }
}

/// Message addressed to a single device token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PushMessage {
    /// Destination device registration token.
    pub token: String,
    /// Opaque key/value payload handled by the receiving app.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    /// Visible content; `None` for data-only messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<PushContent>,
    #[serde(default)]
    pub priority: MessagePriority,
    /// Time-to-live after which the backend drops an undelivered message.
    #[serde(default, with = "ttl_seconds", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
}

impl PushMessage {
    /// Create a data-only message for one device token.
    pub fn to_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    /// Attach visible notification content.
    #[must_use]
    pub fn with_notification(mut self, content: PushContent) -> Self {
        self.notification = Some(content);
        self
    }

    /// Add one data key/value pair.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the message time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the delivery priority.
    #[must_use]
    pub fn with_priority(mut self, priority: MessagePriority) -> Self {
        self.priority = priority;
        self
    }
}

/// Message fanned out to a set of device tokens.
///
/// The body, data, priority, and TTL are shared across the whole
/// destination set.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MulticastMessage {
    /// Destination device registration tokens.
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<PushContent>,
    #[serde(default)]
    pub priority: MessagePriority,
    #[serde(default, with = "ttl_seconds", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<Duration>,
}

impl MulticastMessage {
    /// Create a data-only message for a token set.
    pub fn to_tokens(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            ..Self::default()
        }
    }

    /// Attach visible notification content.
    #[must_use]
    pub fn with_notification(mut self, content: PushContent) -> Self {
        self.notification = Some(content);
        self
    }

    /// Add one data key/value pair.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Set the message time-to-live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the delivery priority.
    #[must_use]
    pub fn with_priority(mut self, priority: MessagePriority) -> Self {
        self.priority = priority;
        self
    }

    /// Number of destination tokens.
    pub fn recipient_count(&self) -> usize {
        self.tokens.len()
    }
}

/// TTL serialized as whole seconds, the unit push backends use.
mod ttl_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ttl: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ttl {
            Some(ttl) => serializer.serialize_some(&ttl.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs: Option<u64> = Option::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_token_defaults() {
        let message = PushMessage::to_token("device-1");
        assert_eq!(message.token, "device-1");
        assert!(message.data.is_empty());
        assert!(message.notification.is_none());
        assert_eq!(message.priority, MessagePriority::Normal);
        assert!(message.ttl.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let message = PushMessage::to_token("device-1")
            .with_notification(PushContent::new("Incoming call", "Alice is calling"))
            .with_data("call_id", "c-42")
            .with_ttl(Duration::from_secs(300))
            .with_priority(MessagePriority::High);

        assert_eq!(message.data.get("call_id").map(String::as_str), Some("c-42"));
        assert_eq!(message.notification.as_ref().map(|n| n.title.as_str()), Some("Incoming call"));
        assert_eq!(message.ttl, Some(Duration::from_secs(300)));
        assert_eq!(message.priority, MessagePriority::High);
    }

    #[test]
    fn test_ttl_serialized_as_seconds() {
        let message = PushMessage::to_token("device-1").with_ttl(Duration::from_secs(300));
        let value = serde_json::to_value(&message).expect("serialize");
        assert_eq!(value["ttl"], 300);

        let back: PushMessage = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back.ttl, Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_multicast_recipient_count() {
        let message = MulticastMessage::to_tokens(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(message.recipient_count(), 3);
    }
}
