//! Piece instances living on a board.

use std::fmt;

use chess_core::{Color, PieceKind, Square};
use serde::{Deserialize, Serialize};

/// Handle to a piece in a board's piece arena.
///
/// Ids are stable for the lifetime of the board: captured pieces keep their
/// id and are only flagged dead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(u8);

impl PieceId {
    #[inline]
    pub(crate) const fn new(index: u8) -> Self {
        PieceId(index)
    }

    /// Returns the arena index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PieceId({})", self.0)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece on (or formerly on) the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    color: Color,
    kind: PieceKind,
    square: Square,
    moved: bool,
    alive: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, color: Color, kind: PieceKind, square: Square) -> Self {
        Piece {
            id,
            color,
            kind,
            square,
            moved: false,
            alive: true,
        }
    }

    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// The square the piece stands on, or stood on when it was captured.
    #[inline]
    pub fn square(&self) -> Square {
        self.square
    }

    /// True once the piece has made a move. Castling and the pawn double
    /// step depend on it.
    #[inline]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Returns true if `other` belongs to the opponent.
    #[inline]
    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.color != other.color
    }

    /// Forward sign for pawn deltas: +1 for White, -1 for Black.
    #[inline]
    pub(crate) fn forward(&self) -> i8 {
        self.color.pawn_direction()
    }

    pub(crate) fn set_square(&mut self, square: Square) {
        self.square = square;
    }

    pub(crate) fn set_moved(&mut self, moved: bool) {
        self.moved = moved;
    }

    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.color, self.kind, self.square)
    }
}
