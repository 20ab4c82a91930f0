//! Session — one accepted connection.
//!
//! LIFECYCLE
//! =========
//! 1. Accept → spawn a writer task draining this session's outbound queue
//! 2. Read `\n`-delimited segments → decode → `Server::dispatch` → queue reply
//! 3. EOF or read error → tell the writer to flush what is queued and stop
//!
//! Segments are handled strictly in arrival order. Blank segments are
//! skipped; segments that are not JSON are logged and dropped without
//! closing the connection. A frame split across reads is reassembled by
//! the buffered reader.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::frame::{FRAME_DELIMITER, Outbound, decode_frame, encode_message, is_blank};
use crate::game::Player;
use crate::server::Server;

/// Outbound queue depth per connection.
pub const OUTBOUND_CAPACITY: usize = 256;

// =============================================================================
// SESSION
// =============================================================================

/// Per-connection identity and outbound queue. Carries a player once the
/// connection has sent `new-client`.
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    peer: String,
    player: Option<Player>,
    tx: mpsc::Sender<Outbound>,
}

impl Session {
    pub fn new(peer: impl Into<String>, tx: mpsc::Sender<Outbound>) -> Self {
        Self { id: Uuid::new_v4(), peer: peer.into(), player: None, tx }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn peer(&self) -> &str {
        &self.peer
    }

    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub(crate) fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    /// Clone of the outbound queue, for the registry's broadcasts.
    #[must_use]
    pub fn sender(&self) -> mpsc::Sender<Outbound> {
        self.tx.clone()
    }
}

// =============================================================================
// CONNECTION
// =============================================================================

/// Drive one connection until the peer closes it.
pub async fn run_session<S>(server: Server, stream: S, peer: String)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read_half, write_half) = tokio::io::split(stream);
    let (tx, rx) = mpsc::channel::<Outbound>(OUTBOUND_CAPACITY);
    let (close_tx, close_rx) = oneshot::channel();

    let mut session = Session::new(peer, tx);
    let writer = tokio::spawn(write_loop(write_half, rx, close_rx, session.id()));
    info!(session_id = %session.id(), peer = %session.peer(), "connection accepted");

    let mut segments = BufReader::new(read_half).split(FRAME_DELIMITER);
    loop {
        match segments.next_segment().await {
            Ok(Some(segment)) => handle_segment(&server, &mut session, &segment).await,
            Ok(None) => break,
            Err(e) => {
                warn!(session_id = %session.id(), error = %e, "read failed");
                break;
            }
        }
    }

    let _ = close_tx.send(());
    if let Err(e) = writer.await {
        warn!(session_id = %session.id(), error = %e, "writer task failed");
    }
    info!(
        session_id = %session.id(),
        peer = %session.peer(),
        player_id = session.player().map(|p| p.id),
        "connection closed"
    );
}

async fn handle_segment(server: &Server, session: &mut Session, segment: &[u8]) {
    if is_blank(segment) {
        return;
    }

    let inbound = match decode_frame(segment) {
        Ok(inbound) => inbound,
        Err(e) => {
            warn!(
                session_id = %session.id(),
                error = %e,
                frame = %String::from_utf8_lossy(segment),
                "dropping malformed frame"
            );
            return;
        }
    };

    let reply = server.dispatch(session, inbound).await;
    match encode_message(&reply) {
        Ok(bytes) => {
            if session.tx.send(bytes).await.is_err() {
                warn!(session_id = %session.id(), "reply dropped; writer closed");
            }
        }
        Err(e) => error!(session_id = %session.id(), error = %e, "failed to encode reply"),
    }
}

/// Drain the outbound queue into the socket. On `close`, flush whatever is
/// already queued and shut the write half down.
async fn write_loop<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<Outbound>,
    mut close: oneshot::Receiver<()>,
    session_id: Uuid,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            biased;
            message = rx.recv() => {
                let Some(bytes) = message else { break };
                if let Err(e) = writer.write_all(&bytes).await {
                    warn!(%session_id, error = %e, "write failed");
                    return;
                }
            }
            _ = &mut close => {
                while let Ok(bytes) = rx.try_recv() {
                    if writer.write_all(&bytes).await.is_err() {
                        return;
                    }
                }
                break;
            }
        }
    }

    if let Err(e) = writer.shutdown().await {
        debug!(%session_id, error = %e, "shutdown after close failed");
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
