//! Game model — players, squares, and the board that owns them.
//!
//! DESIGN
//! ======
//! All contested state lives in `Square`, a three-state machine
//! (open → locked → claimed). The `Board` resolves coordinates and
//! delegates to squares; it never re-checks square invariants itself.
//! Every failure is a `GameError`, which the controller turns into an
//! `error` reply. Nothing in this module performs I/O.

pub mod board;
pub mod player;
pub mod square;

pub use board::{Board, Coord, Score};
pub use player::{PALETTE, Player, PlayerId};
pub use square::{Square, SquareState};

use crate::frame::ErrorCode;

// =============================================================================
// ERRORS
// =============================================================================

/// Closed set of failure categories surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The frame was valid JSON but not a known action shape.
    InvalidAction,
    /// A coordinate fell outside the board.
    OutOfBounds,
    /// A square-state invariant rejected the request.
    Conflict,
    /// Player registration or lookup failed.
    Registration,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("couldn't find the game square at {x}, {y} on a {rows}x{cols} board")]
    OutOfBounds { x: i64, y: i64, rows: usize, cols: usize },
    #[error("that square has already been claimed")]
    AlreadyClaimed,
    #[error("that square is locked by player {0}")]
    LockedByOther(PlayerId),
    #[error("player {requester} cannot unlock a square it has not locked")]
    NotLockHolder { requester: PlayerId },
    #[error("this connection is already registered as player {0}")]
    AlreadyRegistered(PlayerId),
    #[error("no player color left for player {0}")]
    PaletteExhausted(usize),
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
}

impl GameError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAction(_) => ErrorKind::InvalidAction,
            Self::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            Self::AlreadyClaimed | Self::LockedByOther(_) | Self::NotLockHolder { .. } => ErrorKind::Conflict,
            Self::AlreadyRegistered(_) | Self::PaletteExhausted(_) | Self::UnknownPlayer(_) => {
                ErrorKind::Registration
            }
        }
    }
}

impl ErrorCode for GameError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAction(_) => "E_INVALID_ACTION",
            Self::OutOfBounds { .. } => "E_OUT_OF_BOUNDS",
            Self::AlreadyClaimed => "E_ALREADY_CLAIMED",
            Self::LockedByOther(_) => "E_LOCKED",
            Self::NotLockHolder { .. } => "E_NOT_LOCK_HOLDER",
            Self::AlreadyRegistered(_) => "E_ALREADY_REGISTERED",
            Self::PaletteExhausted(_) => "E_SERVER_FULL",
            Self::UnknownPlayer(_) => "E_UNKNOWN_PLAYER",
        }
    }
}
