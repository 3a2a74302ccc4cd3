//! Chess rules engine with reversible move application.
//!
//! This crate provides:
//! - [`Board`] - cells, pieces, the living-piece registry and move history
//! - [`MoveSet`] - legal moves of one piece, grouped by direction
//! - Check, checkmate and stalemate detection ([`GameStatus`])
//! - Castling, en passant and promotion ([`CastleSide`], [`Board::promote_pawn`])
//! - Perft for validating the move generator
//!
//! # Architecture
//!
//! Pieces live in an arena owned by the board and are addressed by
//! [`PieceId`]. A [`Cell`] holds the id of its occupant; a [`Piece`] holds
//! its square. Every move is recorded in the [`MoveHistory`] with enough
//! information to reverse it exactly, including captures, the castling rook
//! and promotions.
//!
//! Move generation is two-staged: pseudo-legal moves are produced from each
//! kind's static direction template, then every candidate is played on an
//! independent copy of the board and dropped if it leaves the mover's king
//! in check.
//!
//! # Example
//!
//! ```
//! use chess_core::{Color, Square};
//! use chess_engine::{Board, GameStatus};
//!
//! let mut board = Board::setup();
//! println!("Legal moves from starting position: {}", board.legal_moves(Color::White).unwrap().len());
//!
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! let pawn = board.piece_at(e2).unwrap().id();
//! board.move_piece(pawn, e2, e4).unwrap();
//! assert_eq!(board.status(Color::Black).unwrap(), GameStatus::Ongoing);
//!
//! board.undo_last_move().unwrap();
//! assert_eq!(board, Board::setup());
//! ```

mod board;
mod cell;
mod config;
mod error;
mod history;
pub mod movegen;
mod piece;
mod rules;
mod special;

pub use board::Board;
pub use cell::Cell;
pub use config::{ConfigError, RulesConfig};
pub use error::BoardError;
pub use history::{Capture, MoveHistory, MoveRecord, Promotion, RookShift};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    generate_legal_moves, generate_moves, is_square_attacked, king_in_check, legal_moves,
    verify_moves, MoveSet,
};
pub use piece::{Piece, PieceId};
pub use rules::{GameResult, GameStatus};
pub use special::CastleSide;
