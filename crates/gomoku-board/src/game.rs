//! One match: board, turn, and outcome.

use gomoku_protocol::{Color, MatchId};

use crate::Board;

/// Why a move was not applied. The board and turn are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: i64, col: i64 },

    #[error("({row}, {col}) is already occupied")]
    Occupied { row: i64, col: i64 },

    #[error("the match is already finished")]
    Finished,
}

/// An accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub color: Color,
    /// `true` if this stone completed a winning run.
    pub won: bool,
}

/// The state of one match.
///
/// Not synchronized: the owner must serialize access. The room layer
/// does so by keeping each game inside a single room task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: MatchId,
    board: Board,
    turn: Color,
    winner: Option<Color>,
    finished: bool,
}

impl Game {
    /// A fresh match: empty board, Black to move.
    pub fn new(id: MatchId) -> Self {
        Self {
            id,
            board: Board::new(),
            turn: Color::Black,
            winner: None,
            finished: false,
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The color due to move next (or, once finished, the winner's color).
    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Places the current turn's stone at `(row, col)`.
    ///
    /// On a win the winner is recorded and the match finishes with the
    /// turn left on the winner; otherwise the turn passes to the other
    /// color. A rejected move changes nothing.
    pub fn apply_move(&mut self, row: i64, col: i64) -> Result<Placement, MoveRejected> {
        if self.finished {
            return Err(MoveRejected::Finished);
        }
        let (r, c) =
            Board::index(row, col).ok_or(MoveRejected::OutOfBounds { row, col })?;
        if self.board.get(row, col).is_some() {
            return Err(MoveRejected::Occupied { row, col });
        }

        let color = self.turn;
        self.board.set(r, c, color);

        let won = self.check_win(row, col);
        if won {
            self.winner = Some(color);
            self.finished = true;
        } else {
            self.turn = color.opponent();
        }

        Ok(Placement {
            row: r,
            col: c,
            color,
            won,
        })
    }

    /// Returns `true` if the stone at `(row, col)` is part of an unbroken
    /// same-color run of five or more along any of the four axes.
    pub fn check_win(&self, row: i64, col: i64) -> bool {
        self.board.has_run_through(row, col)
    }

    /// Clears the board for a do-over. The match id is kept.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.turn = Color::Black;
        self.winner = None;
        self.finished = false;
    }

    /// Ends the match in `winner`'s favor without touching the board.
    /// Has no effect on a match that is already finished.
    pub fn forfeit(&mut self, winner: Color) {
        if self.finished {
            return;
        }
        self.winner = Some(winner);
        self.finished = true;
    }
}
