//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine:
//! - [`Color`] for the two players
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`PieceKind`] and [`Direction`] for the static movement templates
//! - [`Move`] and [`MoveFlag`] for flattened moves
//! - FEN position parsing

mod color;
mod direction;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use direction::Direction;
pub use fen::{CastlingAvailability, Fen, FenError};
pub use mov::{Move, MoveFlag};
pub use piece::PieceKind;
pub use square::{File, Rank, Square};
