//! Board cells.

use chess_core::{File, Rank, Square};
use serde::{Deserialize, Serialize};

use crate::PieceId;

/// One square of the board and its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    square: Square,
    occupant: Option<PieceId>,
}

impl Cell {
    pub(crate) const fn new(square: Square) -> Self {
        Cell {
            square,
            occupant: None,
        }
    }

    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    /// The column letter, a to h.
    #[inline]
    pub fn file(&self) -> File {
        self.square.file()
    }

    /// The row, 1 to 8.
    #[inline]
    pub fn rank(&self) -> Rank {
        self.square.rank()
    }

    #[inline]
    pub fn occupant(&self) -> Option<PieceId> {
        self.occupant
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<PieceId>) {
        self.occupant = occupant;
    }
}
