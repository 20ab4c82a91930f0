//! Frame — newline-delimited JSON codec for the game protocol.
//!
//! ARCHITECTURE
//! ============
//! Every message on the wire is one JSON object followed by `\n`. Clients
//! send `ClientAction`s tagged by `action`; the server answers each with a
//! `success` or `error` reply and fans board changes out as `update`
//! messages tagged by their own `action`.
//!
//! DESIGN
//! ======
//! - Decoding is two-stage. Bytes that are not JSON at all are
//!   `CodecError::Malformed` and the caller drops them. JSON that does not
//!   match an action shape becomes `Inbound::Invalid` so the requester
//!   still gets an `error` reply.
//! - Outbound messages are encoded once into a shared `Outbound` buffer,
//!   newline included, and cloned by reference to each recipient.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::game::{Coord, Player, Score};

// =============================================================================
// TYPES
// =============================================================================

/// One encoded, newline-terminated message ready for the socket.
pub type Outbound = Arc<[u8]>;

pub const FRAME_DELIMITER: u8 = b'\n';

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed frame: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Grepable error code for structured error replies.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Fields shared by every square-targeted action and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SquareAction {
    pub x: i64,
    pub y: i64,
    pub player: Player,
}

impl SquareAction {
    #[must_use]
    pub fn new(coord: Coord, player: Player) -> Self {
        Self { x: coord.x, y: coord.y, player }
    }

    #[must_use]
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Client → server requests. Every variant rejects unknown fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", deny_unknown_fields)]
pub enum ClientAction {
    NewClient {},
    ClaimSquare(SquareAction),
    LockSquare(SquareAction),
    UnlockSquare(SquareAction),
}

impl ClientAction {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewClient {} => "new-client",
            Self::ClaimSquare(_) => "claim-square",
            Self::LockSquare(_) => "lock-square",
            Self::UnlockSquare(_) => "unlock-square",
        }
    }
}

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Action(ClientAction),
    /// Valid JSON that is not a known action. Carries the decode reason.
    Invalid(String),
}

/// Server → all clients board and milestone events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Event {
    ClaimSquare(SquareAction),
    LockSquare(SquareAction),
    UnlockSquare(SquareAction),
    GameStart,
    GameEnd { scores: Vec<Score> },
}

/// Everything the server writes to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Success {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        player: Option<Player>,
    },
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
    },
    Update(Event),
}

// =============================================================================
// CONSTRUCTORS
// =============================================================================

impl ServerMessage {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success { message: message.into(), player: None }
    }

    pub fn success_with_player(message: impl Into<String>, player: Player) -> Self {
        Self::Success { message: message.into(), player: Some(player) }
    }

    /// Plain error reply without a code.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into(), code: None }
    }

    /// Structured error reply from a typed error.
    #[must_use]
    pub fn error_from(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self::Error { message: err.to_string(), code: Some(err.error_code().to_string()) }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

// =============================================================================
// CODEC
// =============================================================================

/// Encode any message as one newline-terminated frame.
///
/// # Errors
///
/// Returns `CodecError::Encode` if serialization fails.
pub fn encode_message<T: Serialize + ?Sized>(message: &T) -> Result<Outbound, CodecError> {
    let mut bytes = serde_json::to_vec(message).map_err(CodecError::Encode)?;
    bytes.push(FRAME_DELIMITER);
    Ok(Outbound::from(bytes))
}

/// Decode one frame (without its delimiter) into an inbound action.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the bytes are not JSON.
pub fn decode_frame(bytes: &[u8]) -> Result<Inbound, CodecError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(CodecError::Malformed)?;
    Ok(match serde_json::from_value::<ClientAction>(value) {
        Ok(action) => Inbound::Action(action),
        Err(e) => Inbound::Invalid(e.to_string()),
    })
}

/// Decode one frame into a strictly typed message, as the client side does.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the bytes do not match `T`.
pub fn decode_message<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Malformed)
}

/// True for segments that carry no frame (empty or whitespace only).
#[must_use]
pub fn is_blank(segment: &[u8]) -> bool {
    segment.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod tests;
