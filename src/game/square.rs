//! Square — the unit of contested state.
//!
//! DESIGN
//! ======
//! A square is `Open`, `LockedBy(p)`, or `ClaimedBy(p)`. A lock is a
//! reservation one player holds while painting; a claim is terminal.
//! Re-locking by the holder is a no-op, and the holder may claim straight
//! out of its own lock. Once claimed, every mutation fails with
//! `AlreadyClaimed` and the claimant never changes.

use super::{GameError, Player};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SquareState {
    #[default]
    Open,
    LockedBy(Player),
    ClaimedBy(Player),
}

#[derive(Debug, Clone, Default)]
pub struct Square {
    state: SquareState,
}

impl Square {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SquareState {
        &self.state
    }

    /// Reserve the square for `requester`.
    ///
    /// # Errors
    ///
    /// `AlreadyClaimed` if claimed, `LockedByOther` if another player holds the lock.
    pub fn lock(&mut self, requester: &Player) -> Result<(), GameError> {
        match &self.state {
            SquareState::ClaimedBy(_) => Err(GameError::AlreadyClaimed),
            SquareState::LockedBy(holder) if holder != requester => Err(GameError::LockedByOther(holder.id)),
            SquareState::LockedBy(_) => Ok(()),
            SquareState::Open => {
                self.state = SquareState::LockedBy(requester.clone());
                Ok(())
            }
        }
    }

    /// Release a reservation held by `requester`.
    ///
    /// # Errors
    ///
    /// `AlreadyClaimed` if claimed, `NotLockHolder` unless locked by `requester`.
    pub fn unlock(&mut self, requester: &Player) -> Result<(), GameError> {
        match &self.state {
            SquareState::ClaimedBy(_) => Err(GameError::AlreadyClaimed),
            SquareState::LockedBy(holder) if holder == requester => {
                self.state = SquareState::Open;
                Ok(())
            }
            SquareState::LockedBy(_) | SquareState::Open => Err(GameError::NotLockHolder { requester: requester.id }),
        }
    }

    /// Permanently assign the square to `requester`.
    ///
    /// # Errors
    ///
    /// `AlreadyClaimed` if claimed, `LockedByOther` if another player holds the lock.
    pub fn claim(&mut self, requester: &Player) -> Result<(), GameError> {
        match &self.state {
            SquareState::ClaimedBy(_) => Err(GameError::AlreadyClaimed),
            SquareState::LockedBy(holder) if holder != requester => Err(GameError::LockedByOther(holder.id)),
            SquareState::LockedBy(_) | SquareState::Open => {
                self.state = SquareState::ClaimedBy(requester.clone());
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_claimed(&self) -> bool {
        matches!(self.state, SquareState::ClaimedBy(_))
    }

    #[must_use]
    pub fn claimant(&self) -> Option<&Player> {
        match &self.state {
            SquareState::ClaimedBy(player) => Some(player),
            _ => None,
        }
    }

    #[must_use]
    pub fn locked_by(&self) -> Option<&Player> {
        match &self.state {
            SquareState::LockedBy(player) => Some(player),
            _ => None,
        }
    }

    /// True when some player other than `player` holds the lock.
    #[must_use]
    pub fn is_locked_for_other_than(&self, player: &Player) -> bool {
        self.locked_by().is_some_and(|holder| holder != player)
    }
}

#[cfg(test)]
#[path = "square_test.rs"]
mod tests;
