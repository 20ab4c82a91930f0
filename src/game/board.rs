//! Board — fixed grid of squares plus the aggregate queries over it.
//!
//! DESIGN
//! ======
//! Squares are stored row-major in one `Vec`; `x` is the column and `y`
//! the row. Dimensions are fixed at construction. Coordinates arrive
//! signed from the wire so that negative values surface as `OutOfBounds`
//! rather than a decode failure.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{GameError, Player, PlayerId, Square};

/// Per-player claimed-square count, serialized as `[player, count]`.
pub type Score = (Player, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    #[must_use]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    squares: Vec<Square>,
}

impl Board {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols, squares: vec![Square::new(); rows * cols] }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Look up a square.
    ///
    /// # Errors
    ///
    /// Returns `OutOfBounds` if `coord` is outside the grid.
    pub fn square(&self, coord: Coord) -> Result<&Square, GameError> {
        let index = self.index(coord)?;
        Ok(&self.squares[index])
    }

    /// # Errors
    ///
    /// `OutOfBounds`, or the square's conflict error.
    pub fn claim_square(&mut self, coord: Coord, player: &Player) -> Result<(), GameError> {
        self.square_mut(coord)?.claim(player)
    }

    /// # Errors
    ///
    /// `OutOfBounds`, or the square's conflict error.
    pub fn lock_square(&mut self, coord: Coord, player: &Player) -> Result<(), GameError> {
        self.square_mut(coord)?.lock(player)
    }

    /// # Errors
    ///
    /// `OutOfBounds`, or the square's conflict error.
    pub fn unlock_square(&mut self, coord: Coord, player: &Player) -> Result<(), GameError> {
        self.square_mut(coord)?.unlock(player)
    }

    /// True once every square has been claimed, by anyone.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.squares.iter().all(Square::is_claimed)
    }

    /// Claimed-square counts per player, highest first.
    ///
    /// Ties keep the order in which players first appear scanning the board
    /// row-major. Players with no claims are omitted.
    #[must_use]
    pub fn compute_scores(&self) -> Vec<Score> {
        let mut scores: Vec<Score> = Vec::new();
        let mut slots: HashMap<PlayerId, usize> = HashMap::new();

        for claimant in self.squares.iter().filter_map(Square::claimant) {
            match slots.get(&claimant.id) {
                Some(&slot) => scores[slot].1 += 1,
                None => {
                    slots.insert(claimant.id, scores.len());
                    scores.push((claimant.clone(), 1));
                }
            }
        }

        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
    }

    fn square_mut(&mut self, coord: Coord) -> Result<&mut Square, GameError> {
        let index = self.index(coord)?;
        Ok(&mut self.squares[index])
    }

    fn index(&self, coord: Coord) -> Result<usize, GameError> {
        let out_of_bounds = || GameError::OutOfBounds { x: coord.x, y: coord.y, rows: self.rows, cols: self.cols };
        let x = usize::try_from(coord.x).map_err(|_| out_of_bounds())?;
        let y = usize::try_from(coord.y).map_err(|_| out_of_bounds())?;
        if x >= self.cols || y >= self.rows {
            return Err(out_of_bounds());
        }
        Ok(y * self.cols + x)
    }
}

#[cfg(test)]
#[path = "board_test.rs"]
mod tests;
