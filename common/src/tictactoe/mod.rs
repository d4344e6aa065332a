mod board;
mod game_state;
mod player;

pub use board::{Board, BoardError, Cell, Mark, BOARD_SIZE};
pub use game_state::{Change, GameState, ReduceError};
pub use player::{Player, PlayerNum, Players};
