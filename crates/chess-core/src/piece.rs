//! Chess piece kinds and their movement templates.

use serde::{Deserialize, Serialize};

use crate::{Color, Direction};

/// The six kinds of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

static PAWN_TEMPLATE: [Direction; 4] = [
    Direction::Forward,
    Direction::DoubleStep,
    Direction::CaptureWest,
    Direction::CaptureEast,
];

static KNIGHT_TEMPLATE: [Direction; 8] = [
    Direction::NorthNorthEast,
    Direction::EastNorthEast,
    Direction::EastSouthEast,
    Direction::SouthSouthEast,
    Direction::SouthSouthWest,
    Direction::WestSouthWest,
    Direction::WestNorthWest,
    Direction::NorthNorthWest,
];

static BISHOP_TEMPLATE: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

static ROOK_TEMPLATE: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

static QUEEN_TEMPLATE: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

static KING_TEMPLATE: [Direction; 10] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
    Direction::CastleKingside,
    Direction::CastleQueenside,
];

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// The kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    /// Returns the index of this kind (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the static movement template: every direction this kind
    /// can ever move in.
    pub fn template(self) -> &'static [Direction] {
        match self {
            PieceKind::Pawn => &PAWN_TEMPLATE,
            PieceKind::Knight => &KNIGHT_TEMPLATE,
            PieceKind::Bishop => &BISHOP_TEMPLATE,
            PieceKind::Rook => &ROOK_TEMPLATE,
            PieceKind::Queen => &QUEEN_TEMPLATE,
            PieceKind::King => &KING_TEMPLATE,
        }
    }

    /// Returns true if this kind slides along its directions (bishop, rook, queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Maximum number of steps taken along one direction.
    #[inline]
    pub const fn max_steps(self) -> i8 {
        if self.is_slider() {
            7
        } else {
            1
        }
    }

    /// Returns true if a pawn may promote to this kind.
    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }

    /// Returns the FEN character for this kind with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a kind and color.
    pub const fn from_fen_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some((kind, color))
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::Pawn => "Pawn",
            PieceKind::Knight => "Knight",
            PieceKind::Bishop => "Bishop",
            PieceKind::Rook => "Rook",
            PieceKind::Queen => "Queen",
            PieceKind::King => "King",
        };
        write!(f, "{}", name)
    }
}
