//! Move records and the history stack.

use chess_core::{Move, MoveFlag, PieceKind, Square};
use serde::{Deserialize, Serialize};

use crate::PieceId;

/// A piece removed by a move, and where it stood.
///
/// The square differs from the move's destination only for en passant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub piece: PieceId,
    pub square: Square,
}

/// The rook half of a castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RookShift {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    /// The rook had not moved before castling.
    pub first_move: bool,
}

/// The piece a pawn was replaced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub kind: PieceKind,
    pub piece: PieceId,
}

/// Everything needed to replay or reverse one applied move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub piece: PieceId,
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
    pub captured: Option<Capture>,
    /// The mover had not moved before this move.
    pub first_move: bool,
    pub rook: Option<RookShift>,
    pub promotion: Option<Promotion>,
}

impl MoveRecord {
    pub(crate) fn new(piece: PieceId, from: Square, to: Square, flag: MoveFlag) -> Self {
        MoveRecord {
            piece,
            from,
            to,
            flag,
            captured: None,
            first_move: false,
            rook: None,
            promotion: None,
        }
    }

    /// Number of ranks crossed by the mover.
    pub fn rank_distance(&self) -> u8 {
        self.from.rank().index().abs_diff(self.to.rank().index())
    }

    /// The flattened coordinate form of this record.
    pub fn as_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            flag: self.flag,
            promotion: self.promotion.map(|p| p.kind),
        }
    }
}

/// Stack of applied moves, oldest first.
///
/// A board loaded mid-game may also know the move played just before it
/// was loaded (a FEN en passant target implies one). That move counts as
/// the last move for en passant but cannot be undone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveHistory {
    records: Vec<MoveRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preceding: Option<MoveRecord>,
}

impl MoveHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub(crate) fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    pub(crate) fn set_preceding(&mut self, record: MoveRecord) {
        self.preceding = Some(record);
    }

    pub(crate) fn last_applied_mut(&mut self) -> Option<&mut MoveRecord> {
        self.records.last_mut()
    }

    /// The most recent move, including one that preceded the loaded
    /// position.
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last().or(self.preceding.as_ref())
    }

    /// The most recent move applied on this board: the one
    /// [`Board::undo_last_move`](crate::Board::undo_last_move) reverses.
    pub fn last_applied(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// Number of applied moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter()
    }

    /// A history holding only the last record: all that en passant
    /// eligibility ever looks at.
    pub(crate) fn tail(&self) -> MoveHistory {
        match self.records.last() {
            Some(last) => MoveHistory {
                records: vec![last.clone()],
                preceding: None,
            },
            None => self.clone(),
        }
    }
}
