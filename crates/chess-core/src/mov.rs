//! Move representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PieceKind, Square};

/// Tag for moves that need more than a plain relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveFlag {
    /// Relocation, possibly capturing on the destination.
    #[default]
    Normal,
    /// King two files towards the h-rook, rook jumps over it (O-O).
    CastleKingside,
    /// King two files towards the a-rook, rook jumps over it (O-O-O).
    CastleQueenside,
    /// Pawn captures the pawn beside it that just made a double step.
    EnPassant,
    /// Pawn reached the far rank and was replaced.
    Promotion,
}

/// A move as a pair of coordinates plus its special tag.
///
/// This is the flattened form of a legal move set entry; the board keeps
/// richer records in its history.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
    /// Kind the pawn becomes, for promotions only.
    pub promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a move with the given flag and no promotion.
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move {
            from,
            to,
            flag,
            promotion: None,
        }
    }

    /// Creates a promotion move to the given kind.
    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            flag: MoveFlag::Promotion,
            promotion: Some(kind),
        }
    }

    /// Returns the coordinate-pair notation (e.g., "e2e4", "e7e8q").
    pub fn to_coordinates(self) -> String {
        match self.promotion {
            Some(kind) => format!(
                "{}{}{}",
                self.from,
                self.to,
                kind.to_fen_char(crate::Color::Black)
            ),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self.to_coordinates(), self.flag)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_coordinates())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{File, Rank};

    #[test]
    fn coordinates() {
        let e2 = Square::new(File::E, Rank::R2);
        let e4 = Square::new(File::E, Rank::R4);
        assert_eq!(Move::new(e2, e4, MoveFlag::Normal).to_coordinates(), "e2e4");

        let e7 = Square::new(File::E, Rank::R7);
        let promo = Move::promoting(e7, Square::E8, PieceKind::Knight);
        assert_eq!(promo.to_coordinates(), "e7e8n");
        assert_eq!(promo.flag, MoveFlag::Promotion);
    }

    #[test]
    fn debug_display() {
        let m = Move::new(Square::E1, Square::G1, MoveFlag::CastleKingside);
        assert_eq!(format!("{}", m), "e1g1");
        assert_eq!(format!("{:?}", m), "Move(e1g1, CastleKingside)");
    }
}
