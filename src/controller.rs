//! Controller — protocol dispatch over decoded client actions.
//!
//! DESIGN
//! ======
//! Handlers are pure game logic: they validate, mutate `GameState`, and
//! return an `Outcome`. They never write to a socket. `Server::dispatch`
//! owns delivery: broadcasts go to every registered session, the reply
//! goes back to the requester only.
//!
//! Every `GameError` is caught here and becomes an `error` reply with no
//! broadcast, so no request can take down its session or the server.

use tracing::{debug, info, warn};

use crate::frame::{ClientAction, Event, Inbound, ServerMessage, SquareAction};
use crate::game::GameError;
use crate::server::GameState;
use crate::session::Session;

// =============================================================================
// OUTCOME
// =============================================================================

/// What a handled request produces: one reply for the requester and zero or
/// more events for every registered session, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: ServerMessage,
    pub broadcasts: Vec<Event>,
}

impl Outcome {
    #[must_use]
    pub fn reply(reply: ServerMessage) -> Self {
        Self { reply, broadcasts: Vec::new() }
    }

    #[must_use]
    pub fn with_broadcast(mut self, event: Event) -> Self {
        self.broadcasts.push(event);
        self
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Controller;

impl Controller {
    /// Handle one inbound frame from `session`.
    pub fn handle(&self, game: &mut GameState, session: &mut Session, inbound: Inbound) -> Outcome {
        let result = match inbound {
            Inbound::Action(action) => {
                debug!(session_id = %session.id(), action = action.name(), "dispatching action");
                match action {
                    ClientAction::NewClient {} => handle_new_client(game, session),
                    ClientAction::ClaimSquare(square) => handle_claim_square(game, square),
                    ClientAction::LockSquare(square) => handle_lock_square(game, square),
                    ClientAction::UnlockSquare(square) => handle_unlock_square(game, square),
                }
            }
            Inbound::Invalid(reason) => Err(GameError::InvalidAction(reason)),
        };

        result.unwrap_or_else(|e| {
            warn!(session_id = %session.id(), error = %e, "request rejected");
            Outcome::reply(ServerMessage::error_from(&e))
        })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn handle_new_client(game: &mut GameState, session: &mut Session) -> Result<Outcome, GameError> {
    let player = game.register_client(session)?;
    let outcome = Outcome::reply(ServerMessage::success_with_player("Successfully connected new player", player));

    if game.all_players_joined() {
        info!(players = game.player_count(), "all players joined; starting game");
        return Ok(outcome.with_broadcast(Event::GameStart));
    }
    Ok(outcome)
}

fn handle_claim_square(game: &mut GameState, square: SquareAction) -> Result<Outcome, GameError> {
    let player = game.resolve_player(&square.player)?;
    let coord = square.coord();
    game.board_mut().claim_square(coord, &player)?;
    info!(x = coord.x, y = coord.y, player_id = player.id, "square claimed");

    let mut outcome = Outcome::reply(ServerMessage::success("Square successfully claimed"))
        .with_broadcast(Event::ClaimSquare(SquareAction::new(coord, player)));

    if game.board().is_complete() {
        let scores = game.board().compute_scores();
        info!(?scores, "board complete; game over");
        outcome = outcome.with_broadcast(Event::GameEnd { scores });
    }
    Ok(outcome)
}

fn handle_lock_square(game: &mut GameState, square: SquareAction) -> Result<Outcome, GameError> {
    let player = game.resolve_player(&square.player)?;
    let coord = square.coord();
    game.board_mut().lock_square(coord, &player)?;
    debug!(x = coord.x, y = coord.y, player_id = player.id, "square locked");

    Ok(Outcome::reply(ServerMessage::success("Square successfully locked"))
        .with_broadcast(Event::LockSquare(SquareAction::new(coord, player))))
}

fn handle_unlock_square(game: &mut GameState, square: SquareAction) -> Result<Outcome, GameError> {
    let player = game.resolve_player(&square.player)?;
    let coord = square.coord();
    game.board_mut().unlock_square(coord, &player)?;
    debug!(x = coord.x, y = coord.y, player_id = player.id, "square unlocked");

    Ok(Outcome::reply(ServerMessage::success("Square successfully unlocked"))
        .with_broadcast(Event::UnlockSquare(SquareAction::new(coord, player))))
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
