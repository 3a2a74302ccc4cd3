//! The board: cells, the piece arena, the living-piece registry and the
//! move history.
//!
//! Cells and pieces refer to each other through two independent lookups: a
//! cell stores the [`PieceId`] of its occupant and a piece stores its
//! [`Square`]. Mutations go through a few private helpers that always update
//! both sides together.

use std::collections::BTreeSet;

use chess_core::{Color, Direction, Fen, FenError, File, Move, MoveFlag, PieceKind, Rank, Square};
use serde::{Deserialize, Serialize};

use crate::history::{Capture, MoveHistory, MoveRecord, RookShift};
use crate::special::CastleSide;
use crate::{movegen, BoardError, Cell, MoveSet, Piece, PieceId, RulesConfig};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess board with its full move history.
///
/// `Board` is a plain value: cloning it yields a fully independent copy,
/// which is what move verification and external snapshots rely on.
/// Deserialized boards are checked with [`Board::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    cells: Vec<Cell>,
    pieces: Vec<Piece>,
    living: [BTreeSet<PieceId>; 2],
    history: MoveHistory,
    config: RulesConfig,
}

#[derive(Deserialize)]
struct BoardData {
    cells: Vec<Cell>,
    pieces: Vec<Piece>,
    living: [BTreeSet<PieceId>; 2],
    history: MoveHistory,
    config: RulesConfig,
}

impl TryFrom<BoardData> for Board {
    type Error = BoardError;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        let board = Board {
            cells: data.cells,
            pieces: data.pieces,
            living: data.living,
            history: data.history,
            config: data.config,
        };
        board.check_invariants()?;
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::setup()
    }
}

impl Board {
    /// Creates a board with no pieces.
    pub fn empty() -> Self {
        Self::with_config(RulesConfig::default())
    }

    /// Creates a board with no pieces and the given rules configuration.
    pub fn with_config(config: RulesConfig) -> Self {
        Board {
            cells: Square::all().map(Cell::new).collect(),
            pieces: Vec::with_capacity(32),
            living: [BTreeSet::new(), BTreeSet::new()],
            history: MoveHistory::new(),
            config,
        }
    }

    /// Creates the standard initial position.
    pub fn setup() -> Self {
        Self::setup_with_config(RulesConfig::default())
    }

    /// Alias for [`Board::setup`].
    pub fn standard() -> Self {
        Self::setup()
    }

    /// Creates the standard initial position with the given configuration.
    pub fn setup_with_config(config: RulesConfig) -> Self {
        let mut board = Self::with_config(config);
        let layout = Color::ALL.into_iter().flat_map(|color| {
            let officers = File::ALL
                .into_iter()
                .zip(BACK_RANK)
                .map(move |(file, kind)| (color, kind, Square::new(file, color.back_rank())));
            let pawns = File::ALL
                .into_iter()
                .map(move |file| (color, PieceKind::Pawn, Square::new(file, color.pawn_rank())));
            officers.chain(pawns)
        });
        for (index, (color, kind, square)) in (0u8..).zip(layout) {
            board.insert(PieceId::new(index), color, kind, square);
        }
        board
    }

    /// Builds a board from a FEN record.
    ///
    /// The castling field decides whether kings and corner rooks count as
    /// unmoved. An en passant target records the double step that produced
    /// it as the move preceding the position, so the capture is available on
    /// the first move. That step is not part of the undoable history.
    ///
    /// The resulting board must satisfy [`Board::check_invariants`]; in
    /// particular each color needs exactly one king.
    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        Self::from_fen_with_config(fen, RulesConfig::default())
    }

    /// Like [`Board::from_fen`], with an explicit configuration.
    pub fn from_fen_with_config(fen: &str, config: RulesConfig) -> Result<Self, BoardError> {
        let parsed = Fen::parse(fen)?;
        let mut board = Self::with_config(config);
        for &(square, kind, color) in &parsed.placement {
            board.place(color, kind, square)?;
        }

        for color in Color::ALL {
            let back = color.back_rank();
            let kingside = parsed.castling.kingside(color);
            let queenside = parsed.castling.queenside(color);
            let corners = [
                (File::E, PieceKind::King, kingside || queenside),
                (File::H, PieceKind::Rook, kingside),
                (File::A, PieceKind::Rook, queenside),
            ];
            for (file, kind, may_castle) in corners {
                let found = board
                    .piece_at(Square::new(file, back))
                    .filter(|p| p.kind() == kind && p.color() == color)
                    .map(Piece::id);
                if let Some(id) = found {
                    board.pieces[id.index()].set_moved(!may_castle);
                }
            }
        }

        if let Some(target) = parsed.en_passant {
            board.seed_double_step(target, parsed.active_color)?;
        }
        board.check_invariants()?;
        Ok(board)
    }

    fn seed_double_step(&mut self, target: Square, to_move: Color) -> Result<(), BoardError> {
        let them = to_move.opposite();
        let invalid = || BoardError::Fen(FenError::InvalidEnPassantSquare(target.to_string()));
        let landed = target.offset(0, them.pawn_direction()).ok_or_else(invalid)?;
        let origin = target.offset(0, -them.pawn_direction()).ok_or_else(invalid)?;

        let pawn = self
            .piece_at(landed)
            .filter(|p| p.kind() == PieceKind::Pawn && p.color() == them)
            .map(Piece::id)
            .ok_or_else(invalid)?;
        if !self.cell(origin).is_empty() || !self.cell(target).is_empty() {
            return Err(invalid());
        }

        let mut record = MoveRecord::new(pawn, origin, landed, MoveFlag::Normal);
        record.first_move = true;
        self.history.set_preceding(record);
        Ok(())
    }

    /// Puts a new piece on an empty square.
    ///
    /// Kings, rooks and pawns away from their starting squares are marked as
    /// already moved.
    pub fn place(
        &mut self,
        color: Color,
        kind: PieceKind,
        square: Square,
    ) -> Result<PieceId, BoardError> {
        if !self.cell(square).is_empty() {
            return Err(BoardError::SquareOccupied(square));
        }
        let id = self.spawn(color, kind, square)?;
        let home = match kind {
            PieceKind::Pawn => square.rank() == color.pawn_rank(),
            PieceKind::King => square == Square::new(File::E, color.back_rank()),
            PieceKind::Rook => {
                square.rank() == color.back_rank()
                    && (square.file() == File::A || square.file() == File::H)
            }
            _ => true,
        };
        self.pieces[id.index()].set_moved(!home);
        Ok(id)
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// The cell at a square. Every square has exactly one cell.
    #[inline]
    pub fn cell(&self, square: Square) -> &Cell {
        &self.cells[square.index() as usize]
    }

    /// Looks up a cell by coordinate ("e4"). Malformed or off-board
    /// coordinates give `None`.
    pub fn find_cell(&self, coordinate: &str) -> Option<&Cell> {
        Square::from_algebraic(coordinate).map(|square| self.cell(square))
    }

    /// Like [`Board::find_cell`], reporting absence as an error.
    pub fn cell_at(&self, coordinate: &str) -> Result<&Cell, BoardError> {
        self.find_cell(coordinate)
            .ok_or_else(|| BoardError::OutOfBoundsCoordinate(coordinate.to_string()))
    }

    /// All 64 cells, a1 to h8.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// The cells of one column, rank 1 first.
    pub fn cells_in_file(&self, file: File) -> impl Iterator<Item = &Cell> + '_ {
        Rank::ALL
            .into_iter()
            .map(move |rank| self.cell(Square::new(file, rank)))
    }

    /// The cells of one row, file a first.
    pub fn cells_in_rank(&self, rank: Rank) -> impl Iterator<Item = &Cell> + '_ {
        File::ALL
            .into_iter()
            .map(move |file| self.cell(Square::new(file, rank)))
    }

    /// Any piece ever created on this board, captured or not.
    pub fn piece(&self, id: PieceId) -> Result<&Piece, BoardError> {
        self.pieces
            .get(id.index())
            .ok_or(BoardError::UnknownPiece(id))
    }

    pub(crate) fn living_piece(&self, id: PieceId) -> Result<&Piece, BoardError> {
        let piece = self.piece(id)?;
        if piece.is_alive() {
            Ok(piece)
        } else {
            Err(BoardError::CapturedPiece(id))
        }
    }

    /// The piece standing on a square.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.cell(square)
            .occupant()
            .and_then(|id| self.pieces.get(id.index()))
    }

    /// The living pieces of one color, in id order.
    pub fn living(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.living[color.index()]
            .iter()
            .filter_map(move |id| self.pieces.get(id.index()))
    }

    /// Ids of the living pieces of one color.
    pub fn living_ids(&self, color: Color) -> Vec<PieceId> {
        self.living[color.index()].iter().copied().collect()
    }

    /// The king of the given color.
    pub fn king(&self, color: Color) -> Result<&Piece, BoardError> {
        self.living(color)
            .find(|p| p.kind() == PieceKind::King)
            .ok_or(BoardError::MissingKing(color))
    }

    /// Pseudo-legal moves of a piece, ignoring the safety of its own king.
    pub fn generate_moves(&self, id: PieceId) -> Result<MoveSet, BoardError> {
        movegen::generate_moves(self, id)
    }

    /// Legal moves of a piece, grouped by direction.
    pub fn generate_legal_moves(&self, id: PieceId) -> Result<MoveSet, BoardError> {
        movegen::generate_legal_moves(self, id)
    }

    /// Every legal move of a color as flat coordinate moves. Moves onto the
    /// last rank appear once per promotion choice.
    pub fn legal_moves(&self, color: Color) -> Result<Vec<Move>, BoardError> {
        movegen::legal_moves(self, color)
    }

    /// True iff an enemy piece can reach the king of `color`.
    pub fn king_in_check(&self, color: Color) -> Result<bool, BoardError> {
        movegen::king_in_check(self, color)
    }

    /// True iff any living piece of `color` has a legal move.
    pub fn has_legal_moves(&self, color: Color) -> Result<bool, BoardError> {
        for id in self.living_ids(color) {
            if !self.generate_legal_moves(id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// In check with no legal move.
    pub fn king_in_checkmate(&self, color: Color) -> Result<bool, BoardError> {
        Ok(self.king_in_check(color)? && !self.has_legal_moves(color)?)
    }

    /// Not in check, yet no legal move.
    pub fn king_in_stalemate(&self, color: Color) -> Result<bool, BoardError> {
        Ok(!self.king_in_check(color)? && !self.has_legal_moves(color)?)
    }

    /// Moves a piece from `from` to `to`.
    ///
    /// The destination must be in the piece's legal move set; otherwise
    /// nothing changes and `IllegalMoveRequested` is returned. Castling and
    /// en passant are recognised from the direction the destination lies in.
    pub fn move_piece(
        &mut self,
        id: PieceId,
        from: Square,
        to: Square,
    ) -> Result<MoveRecord, BoardError> {
        let illegal = BoardError::IllegalMoveRequested { from, to };
        if self.living_piece(id)?.square() != from {
            return Err(illegal);
        }
        let direction = self
            .generate_legal_moves(id)?
            .direction_to(to)
            .ok_or(illegal)?;

        let record = self.verified(|board| {
            board.apply(id, to, direction)?;
            board
                .history
                .last_applied()
                .cloned()
                .ok_or_else(|| BoardError::Corrupted("applied move left no record".to_string()))
        })?;
        tracing::debug!(piece = %id, %from, %to, flag = ?record.flag, "move applied");
        Ok(record)
    }

    /// Plays a flattened move, such as one returned by
    /// [`Board::legal_moves`]. Promotion moves promote in the same step.
    pub fn play(&mut self, mv: Move) -> Result<MoveRecord, BoardError> {
        let id = self
            .piece_at(mv.from)
            .map(Piece::id)
            .ok_or(BoardError::NoPieceAt(mv.from))?;
        match mv.promotion {
            Some(kind) => self.move_piece_with_promotion(id, mv.from, mv.to, kind),
            None => self.move_piece(id, mv.from, mv.to),
        }
    }

    /// Reverses the most recent move, including any capture, castling rook,
    /// en passant victim or promotion.
    pub fn undo_last_move(&mut self) -> Result<MoveRecord, BoardError> {
        let record = self
            .history
            .last_applied()
            .cloned()
            .ok_or(BoardError::EmptyMoveHistory)?;
        self.verified(|board| {
            board.reverse(&record)?;
            board.history.pop();
            Ok(())
        })?;
        tracing::debug!(piece = %record.piece, from = %record.from, to = %record.to, "move undone");
        Ok(record)
    }

    /// Applies a move without checking legality. Everything that can fail is
    /// checked before the first mutation.
    pub(crate) fn apply(
        &mut self,
        id: PieceId,
        to: Square,
        direction: Direction,
    ) -> Result<(), BoardError> {
        let mover = self.living_piece(id)?.clone();
        let from = mover.square();
        let target = self.cell(to).occupant();

        let flag = movegen::move_flag(direction, target.is_none());

        let mut record = MoveRecord::new(id, from, to, flag);
        record.first_move = !mover.has_moved();

        let victim_square = if flag == MoveFlag::EnPassant {
            Square::new(to.file(), from.rank())
        } else {
            to
        };
        if let Some(victim) = self.cell(victim_square).occupant() {
            let captured = self.piece(victim)?;
            if !captured.is_enemy_of(&mover) || captured.kind() == PieceKind::King {
                return Err(BoardError::Corrupted(format!(
                    "{} cannot capture {}",
                    mover, captured
                )));
            }
            record.captured = Some(Capture {
                piece: victim,
                square: victim_square,
            });
        } else if flag == MoveFlag::EnPassant {
            return Err(BoardError::Corrupted(format!(
                "no pawn to take en passant on {}",
                victim_square
            )));
        }

        if let Some(side) = CastleSide::from_flag(flag) {
            let (rook_from, rook_to) = side.rook_squares(mover.color());
            let rook = self
                .piece_at(rook_from)
                .filter(|p| p.kind() == PieceKind::Rook && p.color() == mover.color())
                .ok_or_else(|| {
                    BoardError::Corrupted(format!("no rook on {} to castle with", rook_from))
                })?;
            record.rook = Some(RookShift {
                piece: rook.id(),
                from: rook_from,
                to: rook_to,
                first_move: !rook.has_moved(),
            });
        }

        if let Some(capture) = record.captured {
            self.kill(capture.piece, capture.square);
        }
        self.relocate(id, from, to);
        self.pieces[id.index()].set_moved(true);
        if let Some(rook) = record.rook {
            self.relocate(rook.piece, rook.from, rook.to);
            self.pieces[rook.piece.index()].set_moved(true);
        }
        self.history.push(record);
        Ok(())
    }

    fn reverse(&mut self, record: &MoveRecord) -> Result<(), BoardError> {
        self.piece(record.piece)?;
        if let Some(capture) = record.captured {
            self.piece(capture.piece)?;
        }
        if let Some(rook) = record.rook {
            self.piece(rook.piece)?;
        }
        if let Some(promotion) = record.promotion {
            self.piece(promotion.piece)?;
        }

        if let Some(promotion) = record.promotion {
            let color = self.pieces[promotion.piece.index()].color();
            self.living[color.index()].remove(&promotion.piece);
            if promotion.piece.index() + 1 == self.pieces.len() {
                self.pieces.pop();
            } else {
                self.pieces[promotion.piece.index()].set_alive(false);
            }
            self.revive(record.piece, record.to);
        }
        if let Some(rook) = record.rook {
            self.relocate(rook.piece, rook.to, rook.from);
            self.pieces[rook.piece.index()].set_moved(!rook.first_move);
        }
        self.relocate(record.piece, record.to, record.from);
        self.pieces[record.piece.index()].set_moved(!record.first_move);
        if let Some(capture) = record.captured {
            self.revive(capture.piece, capture.square);
        }
        Ok(())
    }

    /// Replaces a living pawn with a new piece of `kind` on the same square.
    pub(crate) fn replace_piece(
        &mut self,
        id: PieceId,
        kind: PieceKind,
    ) -> Result<PieceId, BoardError> {
        let new_id = self.next_id()?;
        let (color, square) = {
            let old = self.living_piece(id)?;
            (old.color(), old.square())
        };
        self.pieces[id.index()].set_alive(false);
        self.living[color.index()].remove(&id);
        self.cells[square.index() as usize].set_occupant(None);

        self.insert(new_id, color, kind, square);
        self.pieces[new_id.index()].set_moved(true);
        Ok(new_id)
    }

    pub(crate) fn history_mut(&mut self) -> &mut MoveHistory {
        &mut self.history
    }

    /// An independent copy for trial moves: same cells and pieces, but only
    /// the last history record.
    pub(crate) fn simulation_copy(&self) -> Board {
        Board {
            cells: self.cells.clone(),
            pieces: self.pieces.clone(),
            living: self.living.clone(),
            history: self.history.tail(),
            config: RulesConfig {
                verify_invariants: false,
                ..self.config
            },
        }
    }

    /// The id the next spawned piece receives. Ids are a single byte.
    fn next_id(&self) -> Result<PieceId, BoardError> {
        u8::try_from(self.pieces.len())
            .map(PieceId::new)
            .map_err(|_| BoardError::Corrupted("piece arena is full".to_string()))
    }

    fn spawn(
        &mut self,
        color: Color,
        kind: PieceKind,
        square: Square,
    ) -> Result<PieceId, BoardError> {
        let id = self.next_id()?;
        self.insert(id, color, kind, square);
        Ok(id)
    }

    fn insert(&mut self, id: PieceId, color: Color, kind: PieceKind, square: Square) {
        self.pieces.push(Piece::new(id, color, kind, square));
        self.cells[square.index() as usize].set_occupant(Some(id));
        self.living[color.index()].insert(id);
    }

    fn relocate(&mut self, id: PieceId, from: Square, to: Square) {
        self.cells[from.index() as usize].set_occupant(None);
        self.cells[to.index() as usize].set_occupant(Some(id));
        self.pieces[id.index()].set_square(to);
    }

    fn kill(&mut self, id: PieceId, square: Square) {
        let color = self.pieces[id.index()].color();
        self.cells[square.index() as usize].set_occupant(None);
        self.pieces[id.index()].set_alive(false);
        self.living[color.index()].remove(&id);
    }

    fn revive(&mut self, id: PieceId, square: Square) {
        let piece = &mut self.pieces[id.index()];
        piece.set_alive(true);
        piece.set_square(square);
        let color = piece.color();
        self.cells[square.index() as usize].set_occupant(Some(id));
        self.living[color.index()].insert(id);
    }

    /// Runs a live change. With `verify_invariants` on, the invariants are
    /// checked afterwards and the board is restored if the change or the
    /// check fails.
    pub(crate) fn verified<T>(
        &mut self,
        change: impl FnOnce(&mut Board) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        if !self.config.verify_invariants {
            return change(self);
        }
        let before = self.clone();
        let result = change(self).and_then(|value| {
            self.check_invariants().map(|()| value).map_err(|err| {
                tracing::warn!(error = %err, "board invariant violated, change rolled back");
                err
            })
        });
        if result.is_err() {
            *self = before;
        }
        result
    }

    /// Verifies the structural invariants: one cell per square, cells and
    /// pieces agreeing on every occupant, the living registry matching the
    /// alive flags, and exactly one king per color.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        let corrupted = |msg: String| -> Result<(), BoardError> { Err(BoardError::Corrupted(msg)) };

        if self.cells.len() != Square::COUNT {
            return corrupted(format!("{} cells instead of 64", self.cells.len()));
        }
        for (index, cell) in self.cells.iter().enumerate() {
            if cell.square().index() as usize != index {
                return corrupted(format!("cell {} holds square {}", index, cell.square()));
            }
            if let Some(id) = cell.occupant() {
                let piece = self.piece(id)?;
                if !piece.is_alive() || piece.square() != cell.square() {
                    return corrupted(format!("{} points at {}", cell.square(), piece));
                }
            }
        }

        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.id().index() != index {
                return corrupted(format!("piece {} stored at slot {}", piece.id(), index));
            }
            let registered = self.living[piece.color().index()].contains(&piece.id());
            if piece.is_alive() != registered {
                return corrupted(format!("{} registry mismatch", piece));
            }
            if piece.is_alive() && self.cell(piece.square()).occupant() != Some(piece.id()) {
                return corrupted(format!("{} is not on its cell", piece));
            }
        }

        for color in Color::ALL {
            for id in &self.living[color.index()] {
                if self.piece(*id)?.color() != color {
                    return corrupted(format!("{} registered as {}", id, color));
                }
            }
            match self.living(color).filter(|p| p.kind() == PieceKind::King).count() {
                0 => return Err(BoardError::MissingKing(color)),
                1 => {}
                n => return corrupted(format!("{} has {} kings", color, n)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn setup_places_thirty_two_pieces() {
        let board = Board::setup();
        assert_eq!(board.living(Color::White).count(), 16);
        assert_eq!(board.living(Color::Black).count(), 16);
        assert_eq!(board.king(Color::White).unwrap().square(), Square::E1);
        assert_eq!(board.king(Color::Black).unwrap().square(), Square::E8);
        assert_eq!(
            board.piece_at(Square::D8).map(|p| (p.kind(), p.color())),
            Some((PieceKind::Queen, Color::Black))
        );
        assert!(board.history().is_empty());
        board.check_invariants().unwrap();
    }

    #[test]
    fn setup_matches_startpos_fen() {
        let setup = Board::setup();
        let parsed = Board::from_fen(Fen::STARTPOS).unwrap();
        for square in Square::all() {
            let describe = |board: &Board| {
                board
                    .piece_at(square)
                    .map(|p| (p.kind(), p.color(), p.has_moved()))
            };
            assert_eq!(describe(&setup), describe(&parsed), "{square}");
        }
    }

    #[test]
    fn find_cell_rejects_off_board() {
        let board = Board::setup();
        assert_eq!(board.find_cell("e2").unwrap().square(), sq("e2"));
        assert!(board.find_cell("e2").unwrap().occupant().is_some());
        assert!(board.find_cell("e4").unwrap().is_empty());
        assert!(board.find_cell("i1").is_none());
        assert!(board.find_cell("a9").is_none());
        assert!(board.find_cell("").is_none());
        assert_eq!(
            board.cell_at("z0").unwrap_err(),
            BoardError::OutOfBoundsCoordinate("z0".to_string())
        );
    }

    #[test]
    fn file_and_rank_views() {
        let board = Board::setup();
        let e_file: Vec<Square> = board.cells_in_file(File::E).map(Cell::square).collect();
        assert_eq!(e_file.len(), 8);
        assert_eq!(e_file[0], Square::E1);
        assert_eq!(e_file[7], Square::E8);

        let second: Vec<&Cell> = board.cells_in_rank(Rank::R2).collect();
        assert!(second.iter().all(|c| !c.is_empty()));
        assert!(board.cells_in_rank(Rank::R4).all(Cell::is_empty));
    }

    #[test]
    fn place_rejects_occupied_square() {
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, Square::E1).unwrap();
        assert_eq!(
            board.place(Color::Black, PieceKind::Queen, Square::E1),
            Err(BoardError::SquareOccupied(Square::E1))
        );
    }

    #[test]
    fn place_marks_displaced_pieces_as_moved() {
        let mut board = Board::empty();
        let king = board.place(Color::White, PieceKind::King, sq("e2")).unwrap();
        let rook = board.place(Color::White, PieceKind::Rook, Square::H1).unwrap();
        let pawn = board.place(Color::Black, PieceKind::Pawn, sq("c5")).unwrap();
        assert!(board.piece(king).unwrap().has_moved());
        assert!(!board.piece(rook).unwrap().has_moved());
        assert!(board.piece(pawn).unwrap().has_moved());
    }

    #[test]
    fn fen_castling_field_sets_moved_flags() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w Kq - 0 1").unwrap();
        let moved = |s: &str| board.piece_at(sq(s)).unwrap().has_moved();
        assert!(!moved("e1"));
        assert!(!moved("h1"));
        assert!(moved("a1"));
        assert!(!moved("e8"));
        assert!(!moved("a8"));
        assert!(moved("h8"));
    }

    #[test]
    fn fen_en_passant_seeds_history() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let last = board.history().last().unwrap();
        assert_eq!((last.from, last.to), (sq("d7"), sq("d5")));
        assert!(board.history().is_empty());
    }

    #[test]
    fn fen_preceding_double_step_cannot_be_undone() {
        let mut board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let before = board.clone();
        assert_eq!(board.undo_last_move(), Err(BoardError::EmptyMoveHistory));
        assert_eq!(board, before);

        let pawn = board.piece_at(sq("e5")).unwrap().id();
        let record = board.move_piece(pawn, sq("e5"), sq("d6")).unwrap();
        assert_eq!(record.flag, MoveFlag::EnPassant);
        board.undo_last_move().unwrap();
        assert_eq!(board, before);
        assert_eq!(board.undo_last_move(), Err(BoardError::EmptyMoveHistory));
    }

    #[test]
    fn fen_needs_one_king_per_color() {
        assert!(matches!(
            Board::from_fen("4k3/8/8/8/8/8/8/K6K w - - 0 1"),
            Err(BoardError::Corrupted(_))
        ));
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(BoardError::MissingKing(Color::White))
        );
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(BoardError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn fen_en_passant_without_pawn_is_rejected() {
        let err = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - d6 0 1").unwrap_err();
        assert!(matches!(
            err,
            BoardError::Fen(FenError::InvalidEnPassantSquare(_))
        ));
    }

    #[test]
    fn move_piece_updates_both_lookups() {
        let mut board = Board::setup();
        let knight = board.piece_at(Square::G1).unwrap().id();
        let record = board.move_piece(knight, Square::G1, sq("f3")).unwrap();
        assert_eq!(record.flag, MoveFlag::Normal);
        assert!(board.cell(Square::G1).is_empty());
        assert_eq!(board.cell(sq("f3")).occupant(), Some(knight));
        assert_eq!(board.piece(knight).unwrap().square(), sq("f3"));
        assert!(board.piece(knight).unwrap().has_moved());
        assert_eq!(board.history().len(), 1);
        board.check_invariants().unwrap();
    }

    #[test]
    fn illegal_move_changes_nothing() {
        let mut board = Board::setup();
        let before = board.clone();
        let pawn = board.piece_at(sq("e2")).unwrap().id();
        assert_eq!(
            board.move_piece(pawn, sq("e2"), sq("e5")),
            Err(BoardError::IllegalMoveRequested {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert_eq!(
            board.move_piece(pawn, sq("d2"), sq("d3")),
            Err(BoardError::IllegalMoveRequested {
                from: sq("d2"),
                to: sq("d3")
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn capture_and_undo() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let before = board.clone();
        let pawn = board.piece_at(sq("e4")).unwrap().id();
        let victim = board.piece_at(sq("d5")).unwrap().id();

        let record = board.move_piece(pawn, sq("e4"), sq("d5")).unwrap();
        assert_eq!(
            record.captured,
            Some(Capture {
                piece: victim,
                square: sq("d5")
            })
        );
        assert!(!board.piece(victim).unwrap().is_alive());
        assert_eq!(board.living(Color::Black).count(), 1);

        board.undo_last_move().unwrap();
        assert_eq!(board, before);
    }

    #[test]
    fn undo_on_empty_history() {
        let mut board = Board::setup();
        assert_eq!(board.undo_last_move(), Err(BoardError::EmptyMoveHistory));
    }

    #[test]
    fn captured_piece_cannot_move() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let pawn = board.piece_at(sq("e4")).unwrap().id();
        let victim = board.piece_at(sq("d5")).unwrap().id();
        board.move_piece(pawn, sq("e4"), sq("d5")).unwrap();
        assert_eq!(
            board.generate_moves(victim),
            Err(BoardError::CapturedPiece(victim))
        );
    }

    #[test]
    fn missing_king_is_reported() {
        let mut board = Board::empty();
        board.place(Color::White, PieceKind::King, Square::E1).unwrap();
        assert_eq!(
            board.king_in_check(Color::Black),
            Err(BoardError::MissingKing(Color::Black))
        );
        assert_eq!(
            board.check_invariants(),
            Err(BoardError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn simulation_copy_keeps_only_last_record() {
        let mut board = Board::setup();
        for (from, to) in [("e2", "e4"), ("e7", "e5"), ("g1", "f3")] {
            let id = board.piece_at(sq(from)).unwrap().id();
            board.move_piece(id, sq(from), sq(to)).unwrap();
        }
        let copy = board.simulation_copy();
        assert_eq!(copy.history().len(), 1);
        assert_eq!(copy.history().last(), board.history().last());
        assert_eq!(copy.cells, board.cells);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut board = Board::setup();
        let pawn = board.piece_at(sq("e2")).unwrap().id();
        board.move_piece(pawn, sq("e2"), sq("e4")).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let restored: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn corrupted_snapshot_is_rejected() {
        let board = Board::setup();
        let mut value = serde_json::to_value(&board).unwrap();
        // Drop a cell: the board no longer covers every square.
        value["cells"].as_array_mut().unwrap().pop();
        assert!(serde_json::from_value::<Board>(value).is_err());
    }

    #[test]
    fn verify_invariants_runs_after_moves() {
        let config = RulesConfig {
            verify_invariants: true,
            ..RulesConfig::default()
        };
        let mut board = Board::setup_with_config(config);
        let pawn = board.piece_at(sq("d2")).unwrap().id();
        board.move_piece(pawn, sq("d2"), sq("d4")).unwrap();
        board.undo_last_move().unwrap();
        assert_eq!(board, Board::setup_with_config(config));
    }

    #[test]
    fn failed_verification_rolls_back() {
        let config = RulesConfig {
            verify_invariants: true,
            ..RulesConfig::default()
        };
        let mut board = Board::setup_with_config(config);
        board.place(Color::White, PieceKind::King, sq("d4")).unwrap();
        let before = board.clone();

        let pawn = board.piece_at(sq("h2")).unwrap().id();
        assert!(matches!(
            board.move_piece(pawn, sq("h2"), sq("h3")),
            Err(BoardError::Corrupted(_))
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn full_arena_refuses_new_pieces() {
        let mut board = Board::from_fen("7k/3P4/8/8/8/8/8/K7 w - - 0 1").unwrap();
        while let Ok(id) = board.next_id() {
            let mut filler = Piece::new(id, Color::White, PieceKind::Knight, Square::A1);
            filler.set_alive(false);
            board.pieces.push(filler);
        }
        assert_eq!(board.pieces.len(), 256);
        let before = board.clone();

        assert!(matches!(
            board.place(Color::Black, PieceKind::Rook, Square::H1),
            Err(BoardError::Corrupted(_))
        ));
        let pawn = board.piece_at(sq("d7")).unwrap().id();
        assert!(matches!(
            board.move_piece_with_promotion(pawn, sq("d7"), Square::D8, PieceKind::Queen),
            Err(BoardError::Corrupted(_))
        ));
        assert_eq!(board, before);
    }
}
