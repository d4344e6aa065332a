use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const BOARD_SIZE: usize = 3;

#[derive(Error, Debug, PartialEq)]
pub enum BoardError {
    #[error("Invalid board cell {0:?}, expected \"\", \"x\" or \"o\"")]
    InvalidCell(String),
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mark {
    #[serde(rename = "x", alias = "X")]
    X,
    #[serde(rename = "o", alias = "O")]
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "x",
            Mark::O => "o",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Cell = Option<Mark>;

type WireRows = [[String; BOARD_SIZE]; BOARD_SIZE];

// On the wire an empty cell is the empty string
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "WireRows", into = "WireRows")]
pub struct Board([[Cell; BOARD_SIZE]; BOARD_SIZE]);

impl Board {
    pub fn new(cells: [[Cell; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Board(cells)
    }

    // Returns None for positions off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.0.get(row)?.get(col).copied()
    }

    pub fn rows(&self) -> &[[Cell; BOARD_SIZE]; BOARD_SIZE] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().flatten().all(Option::is_none)
    }
}

fn parse_cell(cell: &str) -> Result<Cell, BoardError> {
    match cell {
        "" => Ok(None),
        "x" | "X" => Ok(Some(Mark::X)),
        "o" | "O" => Ok(Some(Mark::O)),
        other => Err(BoardError::InvalidCell(other.to_string())),
    }
}

impl TryFrom<WireRows> for Board {
    type Error = BoardError;

    fn try_from(rows: WireRows) -> Result<Self, Self::Error> {
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (row, wire_row) in cells.iter_mut().zip(rows.iter()) {
            for (cell, wire_cell) in row.iter_mut().zip(wire_row.iter()) {
                *cell = parse_cell(wire_cell)?;
            }
        }
        Ok(Board(cells))
    }
}

impl From<Board> for WireRows {
    fn from(board: Board) -> Self {
        board
            .0
            .map(|row| row.map(|cell| cell.map(|m| m.as_str()).unwrap_or("").to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_opponent() {
        assert_eq!(Mark::X.opponent(), Mark::O);
        assert_eq!(Mark::O.opponent(), Mark::X);
    }

    #[test]
    fn test_parse_wire_board() {
        let board: Board =
            serde_json::from_str(r#"[["x","",""],["","O",""],["","","X"]]"#).unwrap();
        assert_eq!(board.get(0, 0), Some(Some(Mark::X)));
        assert_eq!(board.get(1, 1), Some(Some(Mark::O)));
        assert_eq!(board.get(2, 2), Some(Some(Mark::X)));
        assert_eq!(board.get(0, 1), Some(None));
        assert_eq!(board.get(3, 0), None);
        assert!(!board.is_empty());
    }

    #[test]
    fn test_reject_unknown_cell() {
        let result = serde_json::from_str::<Board>(r#"[["z","",""],["","",""],["","",""]]"#);
        assert!(result.is_err());
        assert_eq!(
            Board::try_from([
                ["".to_string(), "".to_string(), "".to_string()],
                ["".to_string(), "-".to_string(), "".to_string()],
                ["".to_string(), "".to_string(), "".to_string()],
            ]),
            Err(BoardError::InvalidCell("-".to_string()))
        );
    }

    #[test]
    fn test_reject_short_rows() {
        let result = serde_json::from_str::<Board>(r#"[["x",""],["","",""],["","",""]]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_lowercase_with_empty_strings() {
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        cells[0][2] = Some(Mark::O);
        cells[2][0] = Some(Mark::X);
        let json = serde_json::to_string(&Board::new(cells)).unwrap();
        assert_eq!(json, r#"[["","","o"],["","",""],["x","",""]]"#);
    }
}
