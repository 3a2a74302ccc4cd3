//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Moves are played on the board and undone again, so a completed run also
//! exercises the undo path.

use chess_core::Color;

use super::{legal_plies, Ply};
use crate::{Board, BoardError};

/// Counts the leaf nodes `depth` plies below the current position, with
/// `color` to move.
pub fn perft(board: &mut Board, color: Color, depth: u32) -> Result<u64, BoardError> {
    if depth == 0 {
        return Ok(1);
    }

    let plies = legal_plies(board, color)?;
    if depth == 1 {
        return Ok(plies.len() as u64);
    }

    let mut nodes = 0u64;
    for ply in &plies {
        play(board, ply)?;
        nodes += perft(board, color.opposite(), depth - 1)?;
        board.undo_last_move()?;
    }
    Ok(nodes)
}

/// Perft with divide: the node count below each root move, sorted by move.
/// Useful for finding which move has an incorrect count.
pub fn perft_divide(
    board: &mut Board,
    color: Color,
    depth: u32,
) -> Result<Vec<(String, u64)>, BoardError> {
    let plies = legal_plies(board, color)?;
    let mut results = Vec::with_capacity(plies.len());

    for ply in &plies {
        play(board, ply)?;
        let nodes = if depth > 1 {
            perft(board, color.opposite(), depth - 1)?
        } else {
            1
        };
        board.undo_last_move()?;
        results.push((ply.mv.to_coordinates(), nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

fn play(board: &mut Board, ply: &Ply) -> Result<(), BoardError> {
    board.apply(ply.piece, ply.mv.to, ply.direction)?;
    if let Some(kind) = ply.mv.promotion {
        board.promote_pawn(kind)?;
    }
    Ok(())
}
