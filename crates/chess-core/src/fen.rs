//! FEN (Forsyth-Edwards Notation) position parsing.
//!
//! Only the parts of a FEN record that describe the board are interpreted:
//! piece placement, side to move, castling availability and the en passant
//! target. The move clocks are optional and, when present, only checked for
//! being numbers.

use thiserror::Error;

use crate::{Color, File, PieceKind, Rank, Square};

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move clock: {0}")]
    InvalidClock(String),
}

/// Castling availability as written in the third FEN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingAvailability {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingAvailability {
    /// Returns the kingside availability for a color.
    pub const fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    /// Returns the queenside availability for a color.
    pub const fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }
}

/// A parsed FEN position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Every occupied square, in FEN reading order (a8 to h1).
    pub placement: Vec<(Square, PieceKind, Color)>,
    pub active_color: Color,
    pub castling: CastlingAvailability,
    pub en_passant: Option<Square>,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let placement = Self::parse_placement(fields[0])?;

        let active_color = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(fields[2])?;
        let en_passant = Self::parse_en_passant(fields[3])?;

        for clock in &fields[4..] {
            clock
                .parse::<u32>()
                .map_err(|_| FenError::InvalidClock(clock.to_string()))?;
        }

        Ok(Fen {
            placement,
            active_color,
            castling,
            en_passant,
        })
    }

    fn parse_placement(field: &str) -> Result<Vec<(Square, PieceKind, Color)>, FenError> {
        let rows: Vec<&str> = field.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                rows.len()
            )));
        }

        let mut placement = Vec::new();
        for (row, text) in rows.iter().enumerate() {
            let rank = Rank::ALL[7 - row];
            let mut file = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) || file + skip as u8 > 8 {
                        return Err(FenError::InvalidPiecePlacement(format!(
                            "rank {} is too long",
                            rank
                        )));
                    }
                    file += skip as u8;
                } else if let Some((kind, color)) = PieceKind::from_fen_char(c) {
                    let on_board = File::from_index(file).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!("rank {} is too long", rank))
                    })?;
                    placement.push((Square::new(on_board, rank), kind, color));
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c, rank
                    )));
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank, file
                )));
            }
        }
        Ok(placement)
    }

    fn parse_castling(field: &str) -> Result<CastlingAvailability, FenError> {
        let mut rights = CastlingAvailability::default();
        if field == "-" {
            return Ok(rights);
        }
        for c in field.chars() {
            match c {
                'K' => rights.white_kingside = true,
                'Q' => rights.white_queenside = true,
                'k' => rights.black_kingside = true,
                'q' => rights.black_queenside = true,
                _ => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            }
        }
        Ok(rights)
    }

    fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
        if field == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(field) {
            Some(sq) if sq.rank() == Rank::R3 || sq.rank() == Rank::R6 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
        }
    }
}
