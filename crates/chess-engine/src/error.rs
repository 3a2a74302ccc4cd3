//! Error types for board operations.

use chess_core::{Color, FenError, Square};
use thiserror::Error;

use crate::PieceId;

/// Errors reported by the board and the move generator.
///
/// `OutOfBoundsCoordinate`, `IllegalMoveRequested`, `EmptyMoveHistory` and
/// the promotion errors are recoverable: the board is left untouched and the
/// caller may ask again. `MissingKing` and `Corrupted` describe a board that
/// no longer satisfies its structural invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("coordinate '{0}' is not on the board")]
    OutOfBoundsCoordinate(String),

    #[error("illegal move from {from} to {to}")]
    IllegalMoveRequested { from: Square, to: Square },

    #[error("no move to undo")]
    EmptyMoveHistory,

    #[error("cannot promote to {0}: choose a queen, rook, bishop or knight")]
    AmbiguousPromotionChoice(String),

    #[error("the last move did not bring a pawn to its final rank")]
    PromotionUnavailable,

    #[error("no piece on {0}")]
    NoPieceAt(Square),

    #[error("{0} is already occupied")]
    SquareOccupied(Square),

    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),

    #[error("piece {0} has been captured")]
    CapturedPiece(PieceId),

    #[error("{0} has no king on the board")]
    MissingKing(Color),

    #[error("board invariant violated: {0}")]
    Corrupted(String),

    #[error(transparent)]
    Fen(#[from] FenError),
}
