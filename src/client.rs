//! Game client — async TCP client that mirrors the server's board.
//!
//! DESIGN
//! ======
//! The client speaks the same newline-delimited JSON as the server. Every
//! `update` it reads is applied to a local `Board` before being handed to
//! the caller, so `board()` always reflects the events seen so far.
//! `login` may read updates (e.g. `game-start`) before its own reply; those
//! are queued and returned by the next `next_message` calls.

use std::collections::VecDeque;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Split};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, warn};

use crate::frame::{
    ClientAction, CodecError, Event, FRAME_DELIMITER, ServerMessage, SquareAction, decode_message, encode_message,
    is_blank,
};
use crate::game::{Board, Coord, Player};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("connection closed by server")]
    Closed,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("server rejected request: {0}")]
    Rejected(String),
}

pub struct GameClient {
    segments: Split<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
    board: Board,
    pending: VecDeque<ServerMessage>,
}

impl GameClient {
    /// Connect to a server whose board is `rows` × `cols`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Io` if the connection cannot be established.
    pub async fn connect(addr: impl ToSocketAddrs, rows: usize, cols: usize) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            segments: BufReader::new(read_half).split(FRAME_DELIMITER),
            writer,
            board: Board::new(rows, cols),
            pending: VecDeque::new(),
        })
    }

    /// Local mirror of the board, as of the last message read.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Register as a new player and return the assignment.
    ///
    /// # Errors
    ///
    /// `Rejected` if the server answers with an error.
    pub async fn login(&mut self) -> Result<Player, ClientError> {
        self.send(&ClientAction::NewClient {}).await?;
        loop {
            match self.read_message().await? {
                ServerMessage::Success { player: Some(player), .. } => return Ok(player),
                ServerMessage::Error { message, .. } => return Err(ClientError::Rejected(message)),
                other => self.pending.push_back(other),
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    pub async fn claim_square(&mut self, player: &Player, coord: Coord) -> Result<(), ClientError> {
        self.send(&ClientAction::ClaimSquare(SquareAction::new(coord, player.clone()))).await
    }

    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    pub async fn lock_square(&mut self, player: &Player, coord: Coord) -> Result<(), ClientError> {
        self.send(&ClientAction::LockSquare(SquareAction::new(coord, player.clone()))).await
    }

    /// # Errors
    ///
    /// Returns an error if the frame cannot be written.
    pub async fn unlock_square(&mut self, player: &Player, coord: Coord) -> Result<(), ClientError> {
        self.send(&ClientAction::UnlockSquare(SquareAction::new(coord, player.clone()))).await
    }

    /// Send one action frame.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the socket write fails.
    pub async fn send(&mut self, action: &ClientAction) -> Result<(), ClientError> {
        let bytes = encode_message(action)?;
        self.writer.write_all(&bytes).await?;
        debug!(action = action.name(), "client: sent action");
        Ok(())
    }

    /// Next reply or update from the server.
    ///
    /// # Errors
    ///
    /// `Closed` on EOF, `Codec` if the server sends something unreadable.
    pub async fn next_message(&mut self) -> Result<ServerMessage, ClientError> {
        if let Some(message) = self.pending.pop_front() {
            return Ok(message);
        }
        self.read_message().await
    }

    async fn read_message(&mut self) -> Result<ServerMessage, ClientError> {
        loop {
            let Some(segment) = self.segments.next_segment().await? else {
                return Err(ClientError::Closed);
            };
            if is_blank(&segment) {
                continue;
            }

            let message: ServerMessage = decode_message(&segment)?;
            if let ServerMessage::Update(event) = &message {
                self.apply(event);
            }
            return Ok(message);
        }
    }

    fn apply(&mut self, event: &Event) {
        let result = match event {
            Event::ClaimSquare(s) => self.board.claim_square(s.coord(), &s.player),
            Event::LockSquare(s) => self.board.lock_square(s.coord(), &s.player),
            Event::UnlockSquare(s) => self.board.unlock_square(s.coord(), &s.player),
            Event::GameStart | Event::GameEnd { .. } => Ok(()),
        };
        if let Err(e) = result {
            warn!(error = %e, ?event, "client: mirror board rejected server update");
        }
    }
}
