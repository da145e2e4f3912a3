//! Messages exchanged over the spectator WebSocket itself.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Messages a spectator may send over the socket.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpectatorInboundMessage {
    /// Application-level keepalive; answered with a pong frame.
    Ping,
    /// Chat line to relay to the room.
    Chat {
        /// Message text.
        message: String,
    },
    /// Request the current room state snapshot.
    GetState,
    /// Request the room's recent broadcast history.
    GetEvents,
    /// Anything this build does not understand; ignored.
    #[serde(other)]
    Unknown,
}

impl SpectatorInboundMessage {
    /// Parse a text frame, mapping malformed JSON to `Unknown`.
    pub fn from_json_str(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or(SpectatorInboundMessage::Unknown)
    }
}

/// First message pushed to a freshly connected spectator.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConnectionEstablished {
    /// Tag for client dispatch.
    pub r#type: &'static str,
    /// Game room joined.
    pub game_id: i64,
    /// The connecting user's id.
    pub user_id: i64,
    /// The connecting user's display handle.
    pub username: String,
    /// Server-assigned connection identifier.
    pub connection_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_messages() {
        assert_eq!(
            SpectatorInboundMessage::from_json_str(r#"{"type":"ping"}"#),
            SpectatorInboundMessage::Ping
        );
        assert_eq!(
            SpectatorInboundMessage::from_json_str(r#"{"type":"chat","message":"hi"}"#),
            SpectatorInboundMessage::Chat {
                message: "hi".into()
            }
        );
        assert_eq!(
            SpectatorInboundMessage::from_json_str(r#"{"type":"get_state"}"#),
            SpectatorInboundMessage::GetState
        );
    }

    #[test]
    fn unknown_and_malformed_input_degrade_to_unknown() {
        assert_eq!(
            SpectatorInboundMessage::from_json_str(r#"{"type":"dance"}"#),
            SpectatorInboundMessage::Unknown
        );
        assert_eq!(
            SpectatorInboundMessage::from_json_str("not json"),
            SpectatorInboundMessage::Unknown
        );
    }
}
