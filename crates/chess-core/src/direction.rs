//! Direction tags used by the movement templates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MoveFlag;

/// A named direction in a piece's movement template.
///
/// Deltas are (file, rank) with rank growing towards Black. Pawn deltas are
/// written for White and flipped by the caller for Black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,

    NorthNorthEast,
    EastNorthEast,
    EastSouthEast,
    SouthSouthEast,
    SouthSouthWest,
    WestSouthWest,
    WestNorthWest,
    NorthNorthWest,

    Forward,
    DoubleStep,
    CaptureWest,
    CaptureEast,

    CastleKingside,
    CastleQueenside,
}

impl Direction {
    /// Returns the (file, rank) delta of one step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),

            Direction::NorthNorthEast => (1, 2),
            Direction::EastNorthEast => (2, 1),
            Direction::EastSouthEast => (2, -1),
            Direction::SouthSouthEast => (1, -2),
            Direction::SouthSouthWest => (-1, -2),
            Direction::WestSouthWest => (-2, -1),
            Direction::WestNorthWest => (-2, 1),
            Direction::NorthNorthWest => (-1, 2),

            Direction::Forward => (0, 1),
            Direction::DoubleStep => (0, 2),
            Direction::CaptureWest => (-1, 1),
            Direction::CaptureEast => (1, 1),

            Direction::CastleKingside => (2, 0),
            Direction::CastleQueenside => (-2, 0),
        }
    }

    /// Returns true for the two castling directions.
    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self, Direction::CastleKingside | Direction::CastleQueenside)
    }

    /// Returns true for the pawn's diagonal capture directions.
    #[inline]
    pub const fn is_pawn_capture(self) -> bool {
        matches!(self, Direction::CaptureWest | Direction::CaptureEast)
    }

    /// Returns the move flag a move in this direction carries before any
    /// en passant or promotion refinement.
    pub const fn flag(self) -> MoveFlag {
        match self {
            Direction::CastleKingside => MoveFlag::CastleKingside,
            Direction::CastleQueenside => MoveFlag::CastleQueenside,
            _ => MoveFlag::Normal,
        }
    }

    /// Short snake_case name, as shown to players.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::NorthEast => "north_east",
            Direction::East => "east",
            Direction::SouthEast => "south_east",
            Direction::South => "south",
            Direction::SouthWest => "south_west",
            Direction::West => "west",
            Direction::NorthWest => "north_west",
            Direction::NorthNorthEast => "north_north_east",
            Direction::EastNorthEast => "east_north_east",
            Direction::EastSouthEast => "east_south_east",
            Direction::SouthSouthEast => "south_south_east",
            Direction::SouthSouthWest => "south_south_west",
            Direction::WestSouthWest => "west_south_west",
            Direction::WestNorthWest => "west_north_west",
            Direction::NorthNorthWest => "north_north_west",
            Direction::Forward => "forward",
            Direction::DoubleStep => "initial",
            Direction::CaptureWest => "capture_west",
            Direction::CaptureEast => "capture_east",
            Direction::CastleKingside => "castle_king",
            Direction::CastleQueenside => "castle_queen",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
