//! Game status queries built on check and move availability.

use chess_core::Color;
use serde::{Deserialize, Serialize};

use crate::{Board, BoardError};

/// The state of play for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Not in check, with at least one legal move.
    Ongoing,
    /// In check, with at least one legal response.
    Check,
    /// In check with no legal move.
    Checkmate,
    /// Not in check, yet no legal move.
    Stalemate,
}

impl GameStatus {
    /// Returns true if the side to move has no legal move.
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Drawn by stalemate.
    Draw,
}

impl GameResult {
    /// The result when `color` has been checkmated.
    pub const fn loss_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }
}

impl Board {
    /// Classifies the position for `color`, the side to move.
    pub fn status(&self, color: Color) -> Result<GameStatus, BoardError> {
        let in_check = self.king_in_check(color)?;
        let can_move = self.has_legal_moves(color)?;
        Ok(match (in_check, can_move) {
            (false, true) => GameStatus::Ongoing,
            (true, true) => GameStatus::Check,
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
        })
    }

    /// The game result if `color`, the side to move, cannot continue.
    ///
    /// A stalemate counts as a draw only when
    /// [`RulesConfig::stalemate_is_draw`](crate::RulesConfig) is set;
    /// otherwise it leaves the game undecided.
    pub fn outcome(&self, color: Color) -> Result<Option<GameResult>, BoardError> {
        Ok(match self.status(color)? {
            GameStatus::Checkmate => Some(GameResult::loss_for(color)),
            GameStatus::Stalemate if self.config().stalemate_is_draw => Some(GameResult::Draw),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RulesConfig;

    const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";
    const STALEMATE: &str = "7k/5Q2/6K1/8/8/8/8/8 b - - 0 1";

    #[test]
    fn new_game_is_ongoing() {
        let board = Board::setup();
        assert_eq!(board.status(Color::White).unwrap(), GameStatus::Ongoing);
        assert_eq!(board.outcome(Color::White).unwrap(), None);
    }

    #[test]
    fn checkmate_fools_mate() {
        let board = Board::from_fen(FOOLS_MATE).unwrap();
        assert_eq!(board.status(Color::White).unwrap(), GameStatus::Checkmate);
        assert!(board.king_in_checkmate(Color::White).unwrap());
        assert_eq!(
            board.outcome(Color::White).unwrap(),
            Some(GameResult::BlackWins)
        );
    }

    #[test]
    fn check_with_escape() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert_eq!(board.status(Color::White).unwrap(), GameStatus::Check);
        assert!(!board.king_in_checkmate(Color::White).unwrap());
        assert_eq!(board.outcome(Color::White).unwrap(), None);
    }

    #[test]
    fn stalemate() {
        let board = Board::from_fen(STALEMATE).unwrap();
        assert_eq!(board.status(Color::Black).unwrap(), GameStatus::Stalemate);
        assert!(board.king_in_stalemate(Color::Black).unwrap());
        assert!(!board.king_in_checkmate(Color::Black).unwrap());
        assert_eq!(board.outcome(Color::Black).unwrap(), Some(GameResult::Draw));
    }

    #[test]
    fn stalemate_without_draw_rule() {
        let config = RulesConfig {
            stalemate_is_draw: false,
            ..RulesConfig::default()
        };
        let board = Board::from_fen_with_config(STALEMATE, config).unwrap();
        assert!(board.status(Color::Black).unwrap().is_terminal());
        assert_eq!(board.outcome(Color::Black).unwrap(), None);
    }

    #[test]
    fn loss_for() {
        assert_eq!(GameResult::loss_for(Color::White), GameResult::BlackWins);
        assert_eq!(GameResult::loss_for(Color::Black), GameResult::WhiteWins);
    }
}
