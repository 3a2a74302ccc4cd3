//! Move generation.
//!
//! Candidates come from each piece's static movement template
//! ([`PieceKind::template`]). Pseudo-legal generation walks every direction
//! until it leaves the board or hits an occupant; legality verification then
//! plays each candidate on a throwaway copy of the board and drops those that
//! leave the mover's king attacked.

mod attacks;
pub mod perft;

use std::collections::BTreeMap;

use chess_core::{Color, Direction, Move, MoveFlag, PieceKind, Square};

use crate::special::{self, CastleSide};
use crate::{Board, BoardError, Piece, PieceId};

pub use attacks::{is_square_attacked, king_in_check};

/// Reachable squares of one piece, grouped by direction.
///
/// Within a direction squares are ordered by distance from the piece.
/// Directions with no reachable square are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSet {
    piece: PieceId,
    from: Square,
    directions: BTreeMap<Direction, Vec<Square>>,
}

impl MoveSet {
    fn new(piece: PieceId, from: Square) -> Self {
        MoveSet {
            piece,
            from,
            directions: BTreeMap::new(),
        }
    }

    fn push(&mut self, direction: Direction, square: Square) {
        self.directions.entry(direction).or_default().push(square);
    }

    /// The piece these moves belong to.
    pub fn piece(&self) -> PieceId {
        self.piece
    }

    /// The square the piece moves from.
    pub fn from(&self) -> Square {
        self.from
    }

    /// The squares reachable in one direction.
    pub fn get(&self, direction: Direction) -> &[Square] {
        self.directions
            .get(&direction)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates over the non-empty directions and their squares.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &[Square])> {
        self.directions
            .iter()
            .map(|(direction, squares)| (*direction, squares.as_slice()))
    }

    /// All reachable squares, direction by direction.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        self.directions.values().flatten().copied()
    }

    pub fn contains(&self, square: Square) -> bool {
        self.direction_to(square).is_some()
    }

    /// The direction a reachable square lies in.
    pub fn direction_to(&self, square: Square) -> Option<Direction> {
        self.directions
            .iter()
            .find(|(_, squares)| squares.contains(&square))
            .map(|(direction, _)| *direction)
    }

    /// Total number of reachable squares.
    pub fn len(&self) -> usize {
        self.directions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }
}

/// Generates the pseudo-legal moves of a living piece.
///
/// Each direction of the template is walked up to seven steps for sliders
/// and one step otherwise. A step off the board ends the direction; so does
/// any occupied square, after it has been offered as a capture if it holds
/// an enemy.
pub fn generate_moves(board: &Board, id: PieceId) -> Result<MoveSet, BoardError> {
    let piece = board.living_piece(id)?;
    let mut moves = MoveSet::new(id, piece.square());

    for &direction in piece.kind().template() {
        let (df, dr) = step_delta(piece, direction);
        for step in 1..=piece.kind().max_steps() {
            let Some(target) = piece.square().offset(df * step, dr * step) else {
                break;
            };
            let occupant = board.piece_at(target);
            if keep(board, piece, direction, target, occupant) {
                moves.push(direction, target);
            }
            if occupant.is_some() {
                break;
            }
        }
    }
    Ok(moves)
}

/// Filters candidate moves down to those that leave the mover's king safe.
///
/// Every candidate is played on an independent copy of the board through
/// the same path as a live move, castling rook and en passant victim
/// included, and the copy is then asked whether the king is in check.
pub fn verify_moves(
    board: &Board,
    id: PieceId,
    candidates: &MoveSet,
) -> Result<MoveSet, BoardError> {
    let piece = board.living_piece(id)?;
    let color = piece.color();
    let mut verified = MoveSet::new(id, piece.square());

    for (direction, targets) in candidates.iter() {
        for &target in targets {
            if board
                .piece_at(target)
                .is_some_and(|p| p.kind() == PieceKind::King)
            {
                tracing::trace!(piece = %id, %target, "king capture is never legal");
                continue;
            }
            let mut trial = board.simulation_copy();
            trial.apply(id, target, direction)?;
            if king_in_check(&trial, color)? {
                tracing::trace!(piece = %id, %target, "move exposes own king");
                continue;
            }
            verified.push(direction, target);
        }
    }
    Ok(verified)
}

/// Generates the legal moves of a living piece.
pub fn generate_legal_moves(board: &Board, id: PieceId) -> Result<MoveSet, BoardError> {
    let candidates = generate_moves(board, id)?;
    verify_moves(board, id, &candidates)
}

/// Every legal move of one color, flattened. A pawn move onto the last rank
/// yields one move per promotion choice.
pub fn legal_moves(board: &Board, color: Color) -> Result<Vec<Move>, BoardError> {
    Ok(legal_plies(board, color)?
        .into_iter()
        .map(|ply| ply.mv)
        .collect())
}

/// A legal move together with what the board needs to replay it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ply {
    pub piece: PieceId,
    pub direction: Direction,
    pub mv: Move,
}

pub(crate) fn legal_plies(board: &Board, color: Color) -> Result<Vec<Ply>, BoardError> {
    let mut plies = Vec::new();
    for id in board.living_ids(color) {
        let piece = board.living_piece(id)?;
        let set = generate_legal_moves(board, id)?;
        for (direction, targets) in set.iter() {
            for &to in targets {
                let ply = |mv: Move| Ply {
                    piece: id,
                    direction,
                    mv,
                };
                if special::reaches_last_rank(piece, to) {
                    plies.extend(
                        PieceKind::PROMOTIONS
                            .into_iter()
                            .map(|kind| ply(Move::promoting(piece.square(), to, kind))),
                    );
                } else {
                    let flag = move_flag(direction, board.cell(to).is_empty());
                    plies.push(ply(Move::new(piece.square(), to, flag)));
                }
            }
        }
    }
    Ok(plies)
}

/// The tag a move in `direction` gets. A pawn capture onto an empty square
/// can only be en passant.
pub(crate) fn move_flag(direction: Direction, target_vacant: bool) -> MoveFlag {
    if direction.is_pawn_capture() && target_vacant {
        MoveFlag::EnPassant
    } else {
        direction.flag()
    }
}

/// One step along `direction`, with pawn steps pointing towards the
/// opponent.
pub(crate) fn step_delta(piece: &Piece, direction: Direction) -> (i8, i8) {
    let (df, dr) = direction.delta();
    if piece.kind() == PieceKind::Pawn {
        (df, dr * piece.forward())
    } else {
        (df, dr)
    }
}

fn keep(
    board: &Board,
    piece: &Piece,
    direction: Direction,
    target: Square,
    occupant: Option<&Piece>,
) -> bool {
    match direction {
        Direction::Forward => occupant.is_none(),
        Direction::DoubleStep => occupant.is_none() && special::double_step_allowed(board, piece),
        Direction::CaptureWest | Direction::CaptureEast => match occupant {
            Some(other) => other.is_enemy_of(piece),
            None => special::en_passant_target(board, piece) == Some(target),
        },
        _ => match CastleSide::from_direction(direction) {
            Some(side) => special::can_castle(board, piece, side),
            None => occupant.map_or(true, |other| other.is_enemy_of(piece)),
        },
    }
}
