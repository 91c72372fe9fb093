//! Media-room access grants.
//!
//! Call notifications name a room; when the receiving device joins, the
//! application mints a signed access token for it. Token signing lives
//! with the media provider's SDK behind [`RoomGrantIssuer`]; the grant
//! model here lets callers build and validate one without the SDK.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Default validity window for issued tokens.
pub const DEFAULT_GRANT_VALIDITY: Duration = Duration::from_secs(6 * 60 * 60);

/// Error type for grant construction and issuance.
#[derive(Debug, Error)]
pub enum GrantError {
    #[error("Grant has no room name")]
    MissingRoom,

    #[error("Grant has no participant identity")]
    MissingIdentity,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Capability grant for one participant joining one room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomGrant {
    /// Room the participant may join.
    pub room: String,
    /// Stable participant identity, typically the user record id.
    pub identity: String,
    /// Human-readable name shown to peers in the room.
    pub display_name: String,
    /// Opaque application metadata attached to the participant.
    pub metadata: String,
    pub can_publish: bool,
    pub can_subscribe: bool,
    /// Whether the participant may administer the room.
    pub room_admin: bool,
    /// Validity window of the issued token.
    pub valid_for: Duration,
}

impl RoomGrant {
    /// Grant for joining `room` as `identity`: publish and subscribe
    /// enabled, no admin rights, default validity.
    pub fn join(room: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            identity: identity.into(),
            display_name: String::new(),
            metadata: String::new(),
            can_publish: true,
            can_subscribe: true,
            room_admin: false,
            valid_for: DEFAULT_GRANT_VALIDITY,
        }
    }

    /// Set the name shown to peers.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Attach application metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Override the validity window.
    #[must_use]
    pub fn with_validity(mut self, valid_for: Duration) -> Self {
        self.valid_for = valid_for;
        self
    }

    /// Check the grant is issuable.
    pub fn validate(&self) -> Result<(), GrantError> {
        if self.room.is_empty() {
            return Err(GrantError::MissingRoom);
        }
        if self.identity.is_empty() {
            return Err(GrantError::MissingIdentity);
        }
        Ok(())
    }

    /// Render the JWT-style claims an issuer signs, anchored at
    /// `issued_at`. A validity window too large to represent clamps the
    /// expiry to the maximum timestamp.
    pub fn claims(&self, issued_at: DateTime<Utc>) -> serde_json::Value {
        let lifetime_secs = i64::try_from(self.valid_for.as_secs()).unwrap_or(i64::MAX);
        let expires_at = chrono::Duration::try_seconds(lifetime_secs)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        json!({
            "sub": self.identity,
            "name": self.display_name,
            "metadata": self.metadata,
            "nbf": issued_at.timestamp(),
            "exp": expires_at.timestamp(),
            "video": {
                "room": self.room,
                "roomJoin": true,
                "roomAdmin": self.room_admin,
                "canPublish": self.can_publish,
                "canSubscribe": self.can_subscribe,
            },
        })
    }
}

/// Mints signed access tokens from grants.
///
/// Implementations wrap the media provider's token SDK. Signing is local
/// key material, not a network call, so the trait is synchronous.
pub trait RoomGrantIssuer: Send + Sync {
    /// Sign `grant`, returning the token the client presents when
    /// joining the room.
    fn issue(&self, grant: &RoomGrant) -> Result<String, GrantError>;
}
