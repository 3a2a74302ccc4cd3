//! Castling, en passant and promotion.
//!
//! The keep-predicates here are consulted by the move generator; the
//! promotion hook runs on the live board once a pawn has reached its last
//! rank.

use chess_core::{Color, Direction, File, MoveFlag, PieceKind, Square};
use serde::{Deserialize, Serialize};

use crate::history::{MoveRecord, Promotion};
use crate::movegen::is_square_attacked;
use crate::{Board, BoardError, Piece, PieceId};

/// The wing a king castles towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub const fn from_flag(flag: MoveFlag) -> Option<Self> {
        match flag {
            MoveFlag::CastleKingside => Some(CastleSide::Kingside),
            MoveFlag::CastleQueenside => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    pub const fn from_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::CastleKingside => Some(CastleSide::Kingside),
            Direction::CastleQueenside => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// Where the rook starts and where it lands.
    pub fn rook_squares(self, color: Color) -> (Square, Square) {
        let rank = color.back_rank();
        match self {
            CastleSide::Kingside => (Square::new(File::H, rank), Square::new(File::F, rank)),
            CastleSide::Queenside => (Square::new(File::A, rank), Square::new(File::D, rank)),
        }
    }

    /// The squares the king stands on, crosses and lands on. None of them
    /// may be attacked.
    pub fn king_path(self, color: Color) -> [Square; 3] {
        let rank = color.back_rank();
        let files = match self {
            CastleSide::Kingside => [File::E, File::F, File::G],
            CastleSide::Queenside => [File::E, File::D, File::C],
        };
        files.map(|file| Square::new(file, rank))
    }

    /// The squares between king and rook, which must be empty.
    pub fn between(self, color: Color) -> Vec<Square> {
        let files: &[File] = match self {
            CastleSide::Kingside => &[File::F, File::G],
            CastleSide::Queenside => &[File::B, File::C, File::D],
        };
        files
            .iter()
            .map(|&file| Square::new(file, color.back_rank()))
            .collect()
    }
}

/// Whether `king` may castle towards `side` right now.
pub(crate) fn can_castle(board: &Board, king: &Piece, side: CastleSide) -> bool {
    let color = king.color();
    if king.kind() != PieceKind::King
        || king.has_moved()
        || king.square() != Square::new(File::E, color.back_rank())
    {
        return false;
    }

    let (rook_square, _) = side.rook_squares(color);
    let rook_ready = board.piece_at(rook_square).is_some_and(|rook| {
        rook.kind() == PieceKind::Rook && rook.color() == color && !rook.has_moved()
    });
    if !rook_ready {
        return false;
    }

    side.between(color)
        .into_iter()
        .all(|square| board.cell(square).is_empty())
        && side
            .king_path(color)
            .into_iter()
            .all(|square| !is_square_attacked(board, square, color.opposite()))
}

/// Whether an unmoved pawn may advance two squares. The destination itself
/// is checked by the generator.
pub(crate) fn double_step_allowed(board: &Board, pawn: &Piece) -> bool {
    pawn.kind() == PieceKind::Pawn
        && !pawn.has_moved()
        && pawn.square().rank() == pawn.color().pawn_rank()
        && pawn
            .square()
            .offset(0, pawn.forward())
            .is_some_and(|square| board.cell(square).is_empty())
}

/// The square `pawn` may capture onto en passant, if any.
///
/// Only the very last move counts: it must be an enemy pawn's double step
/// that landed right beside this pawn.
pub(crate) fn en_passant_target(board: &Board, pawn: &Piece) -> Option<Square> {
    if pawn.kind() != PieceKind::Pawn {
        return None;
    }
    let last = board.history().last()?;
    let mover = board.piece(last.piece).ok()?;
    let double_step = mover.kind() == PieceKind::Pawn
        && last.flag == MoveFlag::Normal
        && last.from.file() == last.to.file()
        && last.rank_distance() == 2;
    let beside = last.to.rank() == pawn.square().rank()
        && last.to.file().index().abs_diff(pawn.square().file().index()) == 1;

    if double_step && beside && mover.is_enemy_of(pawn) && mover.is_alive() {
        last.from.offset(0, mover.forward())
    } else {
        None
    }
}

/// A pawn moving onto its farthest rank.
pub(crate) fn reaches_last_rank(piece: &Piece, to: Square) -> bool {
    piece.kind() == PieceKind::Pawn && to.rank() == piece.color().promotion_rank()
}

impl Board {
    /// True iff `record` brought a pawn that is still standing there to its
    /// farthest rank, and it has not been promoted yet.
    pub fn promotion_possible(&self, record: &MoveRecord) -> bool {
        record.promotion.is_none()
            && self.piece(record.piece).is_ok_and(|piece| {
                piece.is_alive()
                    && piece.square() == record.to
                    && reaches_last_rank(piece, record.to)
            })
    }

    /// Replaces the pawn that just reached its last rank with a new piece of
    /// `kind`.
    ///
    /// The last history record is retagged as a promotion, so a single
    /// [`Board::undo_last_move`] takes back both the pawn move and the
    /// promotion.
    pub fn promote_pawn(&mut self, kind: PieceKind) -> Result<PieceId, BoardError> {
        if !kind.is_promotion_target() {
            return Err(BoardError::AmbiguousPromotionChoice(kind.to_string()));
        }
        let pawn = match self.history().last_applied() {
            Some(record) if self.promotion_possible(record) => record.piece,
            _ => return Err(BoardError::PromotionUnavailable),
        };

        let promoted = self.verified(|board| {
            let promoted = board.replace_piece(pawn, kind)?;
            if let Some(record) = board.history_mut().last_applied_mut() {
                record.flag = MoveFlag::Promotion;
                record.promotion = Some(Promotion {
                    kind,
                    piece: promoted,
                });
            }
            Ok(promoted)
        })?;
        tracing::debug!(%pawn, %promoted, %kind, "pawn promoted");
        Ok(promoted)
    }

    /// Moves a pawn onto its last rank and promotes it in one step.
    ///
    /// Nothing changes unless both the move and the promotion are valid.
    pub fn move_piece_with_promotion(
        &mut self,
        id: PieceId,
        from: Square,
        to: Square,
        kind: PieceKind,
    ) -> Result<MoveRecord, BoardError> {
        if !kind.is_promotion_target() {
            return Err(BoardError::AmbiguousPromotionChoice(kind.to_string()));
        }
        if !reaches_last_rank(self.living_piece(id)?, to) {
            return Err(BoardError::PromotionUnavailable);
        }
        self.move_piece(id, from, to)?;
        if let Err(err) = self.promote_pawn(kind) {
            self.undo_last_move()?;
            return Err(err);
        }
        self.history()
            .last()
            .cloned()
            .ok_or_else(|| BoardError::Corrupted("promotion left no record".to_string()))
    }
}
