//! Board engine for five-in-a-row.
//!
//! Pure game state with no I/O and no locking: the room layer owns one
//! [`Game`] per room and only touches it from that room's actor task.
//!
//! # Rules
//!
//! - 15×15 board, Black moves first, colors alternate after every
//!   accepted move.
//! - A stone completing an unbroken run of **five or more** along any axis
//!   wins. Overlines (six or longer) count.

mod board;
mod game;

pub use board::Board;
pub use game::{Game, MoveRejected, Placement};
