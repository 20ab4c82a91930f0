//! Server — session registry, board ownership, and broadcast fan-out.
//!
//! ARCHITECTURE
//! ============
//! `GameState` holds the board, the registered sessions, and the target
//! player count. `Server` is a cheap `Clone` handle wrapping it in an
//! `Arc<Mutex<..>>`; every inbound frame is dispatched while holding that
//! mutex, so frames are applied one at a time across all connections and
//! square conflicts resolve first-come-first-served.
//!
//! DESIGN
//! ======
//! - Player ids are the registry size at registration time, so they are
//!   dense from 0 in join order.
//! - Registered sessions are never removed. A disconnected player keeps
//!   its slot and its claims; broadcasts to it fail and are logged.
//! - Broadcast encodes once and enqueues to every registered session with
//!   `try_send`, so it never waits on a recipient while the state mutex is
//!   held. A full or closed queue fails that recipient only; the others
//!   still get the frame and nothing is retried.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{Mutex, MutexGuard, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::controller::Controller;
use crate::frame::{CodecError, Inbound, Outbound, ServerMessage, encode_message};
use crate::game::{Board, GameError, Player};
use crate::session::{self, Session};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BroadcastError {
    #[error(transparent)]
    Encode(#[from] CodecError),
    #[error("broadcast undelivered to {failed} of {total} sessions")]
    Undelivered { failed: usize, total: usize },
}

// =============================================================================
// GAME STATE
// =============================================================================

/// A session that has been assigned a player.
struct RegisteredSession {
    session_id: Uuid,
    player: Player,
    tx: mpsc::Sender<Outbound>,
}

pub struct GameState {
    board: Board,
    sessions: Vec<RegisteredSession>,
    expected_players: usize,
}

impl GameState {
    #[must_use]
    pub fn new(board: Board, expected_players: usize) -> Self {
        Self { board, sessions: Vec::new(), expected_players }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    #[must_use]
    pub fn expected_players(&self) -> usize {
        self.expected_players
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.sessions.len()
    }

    /// Assign the next player to `session` and add it to the registry.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the session already has a player,
    /// `PaletteExhausted` once every color is taken.
    pub fn register_client(&mut self, session: &mut Session) -> Result<Player, GameError> {
        if let Some(existing) = session.player() {
            return Err(GameError::AlreadyRegistered(existing.id));
        }

        let player = Player::for_slot(self.sessions.len())?;
        session.set_player(player.clone());
        self.sessions.push(RegisteredSession {
            session_id: session.id(),
            player: player.clone(),
            tx: session.sender(),
        });

        info!(
            session_id = %session.id(),
            peer = %session.peer(),
            player_id = player.id,
            color = %player.color,
            joined = self.sessions.len(),
            expected = self.expected_players,
            "player registered"
        );
        Ok(player)
    }

    /// True only when the registry size equals the target exactly.
    #[must_use]
    pub fn all_players_joined(&self) -> bool {
        self.sessions.len() == self.expected_players
    }

    /// Resolve a client-supplied player reference to the registered record.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPlayer` if no session registered with that id.
    pub fn resolve_player(&self, reference: &Player) -> Result<Player, GameError> {
        self.sessions
            .iter()
            .find(|s| s.player == *reference)
            .map(|s| s.player.clone())
            .ok_or(GameError::UnknownPlayer(reference.id))
    }

    /// Send `message` to every registered session. Returns the recipient count.
    ///
    /// # Errors
    ///
    /// `Undelivered` if any recipient's outbound queue is full or closed.
    pub fn broadcast(&self, message: &ServerMessage) -> Result<usize, BroadcastError> {
        let bytes = encode_message(message)?;
        let total = self.sessions.len();

        let mut failed = 0;
        for s in &self.sessions {
            match s.tx.try_send(Arc::clone(&bytes)) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    failed += 1;
                    warn!(session_id = %s.session_id, player_id = s.player.id, "broadcast: recipient queue full; dropping frame");
                }
                Err(TrySendError::Closed(_)) => {
                    failed += 1;
                    warn!(session_id = %s.session_id, player_id = s.player.id, "broadcast: recipient unreachable");
                }
            }
        }

        if failed > 0 {
            return Err(BroadcastError::Undelivered { failed, total });
        }
        Ok(total)
    }
}

// =============================================================================
// SERVER
// =============================================================================

/// Shared handle to one game. Clone is cheap; all clones see the same state.
#[derive(Clone)]
pub struct Server {
    state: Arc<Mutex<GameState>>,
    controller: Controller,
}

impl Server {
    #[must_use]
    pub fn new(rows: usize, cols: usize, expected_players: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(GameState::new(Board::new(rows, cols), expected_players))),
            controller: Controller,
        }
    }

    /// Lock the game state for inspection.
    pub async fn state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().await
    }

    /// Apply one inbound frame: run the controller, deliver its broadcasts
    /// in order, and return the reply for the requester.
    pub async fn dispatch(&self, session: &mut Session, inbound: Inbound) -> ServerMessage {
        let mut state = self.state.lock().await;
        let outcome = self.controller.handle(&mut state, session, inbound);

        for event in outcome.broadcasts {
            let message = ServerMessage::Update(event);
            if let Err(e) = state.broadcast(&message) {
                debug!(session_id = %session.id(), error = %e, "broadcast incomplete");
            }
        }

        outcome.reply
    }

    /// Accept connections forever, one session task per connection.
    pub async fn serve(&self, listener: TcpListener) {
        loop {
            match listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%addr, error = %e, "failed to set TCP_NODELAY");
                    }
                    tokio::spawn(session::run_session(self.clone(), stream, addr.to_string()));
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "server_test.rs"]
mod tests;
