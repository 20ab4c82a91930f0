//! Player identity.

use serde::{Deserialize, Serialize};

use super::GameError;

pub type PlayerId = u32;

/// Display colors handed out in registration order. Also the hard cap on
/// how many players one server can seat.
pub const PALETTE: [&str; 5] = ["red", "green", "blue", "gold", "orange"];

/// A registered player. Equality is by `id` only; `color` is presentation.
///
/// Clients usually echo back just `{"id": n}`, so `color` defaults to empty
/// on decode and the server substitutes the registered record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub color: String,
}

impl Player {
    /// Create the player for registration slot `index`, coloring it from
    /// the palette.
    ///
    /// # Errors
    ///
    /// Returns `PaletteExhausted` when `index` is past the end of the palette.
    pub fn for_slot(index: usize) -> Result<Self, GameError> {
        let color = PALETTE.get(index).ok_or(GameError::PaletteExhausted(index))?;
        let id = PlayerId::try_from(index).map_err(|_| GameError::PaletteExhausted(index))?;
        Ok(Self { id, color: (*color).to_string() })
    }

    /// A bare reference carrying only the id, as clients send it.
    #[must_use]
    pub fn with_id(id: PlayerId) -> Self {
        Self { id, color: String::new() }
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_palette_order() {
        for (index, color) in PALETTE.iter().enumerate() {
            let player = Player::for_slot(index).unwrap();
            assert_eq!(player.id as usize, index);
            assert_eq!(player.color, *color);
        }
    }

    #[test]
    fn slot_past_palette_is_rejected() {
        assert_eq!(Player::for_slot(PALETTE.len()), Err(GameError::PaletteExhausted(PALETTE.len())));
    }

    #[test]
    fn equality_ignores_color() {
        let registered = Player::for_slot(1).unwrap();
        assert_eq!(registered, Player::with_id(1));
        assert_ne!(registered, Player::with_id(2));
    }

    #[test]
    fn decodes_id_only_reference() {
        let player: Player = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(player.id, 3);
        assert!(player.color.is_empty());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(serde_json::from_str::<Player>(r#"{"id": 0, "admin": true}"#).is_err());
    }
}
