//! Attack detection for check and castling safety.
//!
//! Attacks use the same templates as move generation, walked in attack
//! mode: castling directions are skipped and pawns only strike along their
//! capture diagonals, whether or not anything stands there.

use chess_core::{Color, Direction, PieceKind, Square};

use super::step_delta;
use crate::{Board, BoardError, Piece};

/// Returns true if any living piece of color `by` attacks `square`.
pub fn is_square_attacked(board: &Board, square: Square, by: Color) -> bool {
    board.living(by).any(|piece| attacks(board, piece, square))
}

/// True iff the king of `color` stands on a square the opponent attacks.
pub fn king_in_check(board: &Board, color: Color) -> Result<bool, BoardError> {
    let king = board.king(color)?;
    Ok(is_square_attacked(board, king.square(), color.opposite()))
}

fn attacks(board: &Board, piece: &Piece, square: Square) -> bool {
    piece
        .kind()
        .template()
        .iter()
        .filter(|d| strikes_along(piece.kind(), **d))
        .any(|&direction| {
            let (df, dr) = step_delta(piece, direction);
            for step in 1..=piece.kind().max_steps() {
                let Some(target) = piece.square().offset(df * step, dr * step) else {
                    return false;
                };
                if target == square {
                    return true;
                }
                if !board.cell(target).is_empty() {
                    return false;
                }
            }
            false
        })
}

fn strikes_along(kind: PieceKind, direction: Direction) -> bool {
    match kind {
        PieceKind::Pawn => direction.is_pawn_capture(),
        _ => !direction.is_castle(),
    }
}
