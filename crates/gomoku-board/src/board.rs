//! The grid itself.

use gomoku_protocol::{BOARD_SIZE, Color, color_code};

/// The four line axes as (row step, col step): horizontal, vertical,
/// down-right diagonal, down-left diagonal.
const AXES: [(i64, i64); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Length of a winning run.
pub(crate) const WIN_LENGTH: usize = 5;

/// A `BOARD_SIZE`×`BOARD_SIZE` grid of optional stones.
///
/// Read access is public; writes go through
/// [`Game::apply_move`](crate::Game::apply_move) only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Color>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The stone at `(row, col)`, or `None` for an empty or off-board cell.
    pub fn get(&self, row: i64, col: i64) -> Option<Color> {
        let (r, c) = Self::index(row, col)?;
        self.cells[r][c]
    }

    /// Returns `true` if no stone has been placed.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_none)
    }

    /// Number of stones on the board.
    pub fn stone_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Wire form: rows of cell codes (0 empty, 1 black, 2 white).
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| color_code(*c)).collect())
            .collect()
    }

    /// Converts signed coordinates to array indices if on the board.
    pub(crate) fn index(row: i64, col: i64) -> Option<(usize, usize)> {
        let size = BOARD_SIZE as i64;
        if (0..size).contains(&row) && (0..size).contains(&col) {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, color: Color) {
        self.cells[row][col] = Some(color);
    }

    /// Checks whether the stone at `(row, col)` sits in a run of at least
    /// [`WIN_LENGTH`] along any axis. An empty cell never wins.
    pub(crate) fn has_run_through(&self, row: i64, col: i64) -> bool {
        let Some(color) = self.get(row, col) else {
            return false;
        };
        AXES.iter().any(|&(dr, dc)| {
            let run = 1
                + self.count_direction(row, col, dr, dc, color)
                + self.count_direction(row, col, -dr, -dc, color);
            run >= WIN_LENGTH
        })
    }

    /// Counts consecutive `color` stones from `(row, col)` exclusive,
    /// stepping by `(dr, dc)` until an edge or a different cell.
    fn count_direction(
        &self,
        row: i64,
        col: i64,
        dr: i64,
        dc: i64,
        color: Color,
    ) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row + dr, col + dc);
        while self.get(r, c) == Some(color) {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
