//! Board representation for N x N, K-in-a-row tic-tac-toe

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::WinningLine;
use crate::{Error, Result};

/// Cell value for an empty square
pub const EMPTY: i8 = 0;

/// A player in the game
///
/// `X` always moves first and marks cells with `+1`; `O` marks with `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Mark this player leaves on the board (+1 or -1)
    pub fn sign(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }

    /// Player owning a non-empty cell value
    pub fn from_sign(value: i8) -> Option<Player> {
        match value {
            1 => Some(Player::X),
            -1 => Some(Player::O),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Square N x N board stored row-major as `{-1, 0, 1}` cells
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<i8>,
}

/// Per-line tally of marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCount {
    pub own: usize,
    pub opponent: usize,
    pub empty: usize,
}

impl Board {
    /// Create an empty board with `size * size` cells
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY; size * size],
        }
    }

    /// Build a board from raw cell values
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the cell count is not a perfect
    /// square of `size` or a value lies outside `{-1, 0, 1}`.
    pub fn from_cells(size: usize, cells: Vec<i8>) -> Result<Self> {
        if cells.len() != size * size {
            return Err(Error::InvalidInput {
                message: format!(
                    "expected {} cells for a {size}x{size} board, got {}",
                    size * size,
                    cells.len()
                ),
            });
        }
        if let Some((idx, value)) = cells
            .iter()
            .enumerate()
            .find(|(_, v)| !matches!(**v, -1..=1))
        {
            return Err(Error::InvalidInput {
                message: format!("cell {idx} has value {value}, expected -1, 0 or 1"),
            });
        }
        Ok(Self { size, cells })
    }

    /// Parse a board from a string of `X`, `O` and `.` characters
    ///
    /// Whitespace and `|` separators are ignored so rendered boards can be
    /// pasted back in.
    pub fn parse(size: usize, text: &str) -> Result<Self> {
        let cells = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .map(|c| match c {
                'X' | 'x' => Ok(Player::X.sign()),
                'O' | 'o' => Ok(Player::O.sign()),
                '.' | '_' => Ok(EMPTY),
                other => Err(Error::InvalidInput {
                    message: format!("invalid board character '{other}'"),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_cells(size, cells)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<i8> {
        self.cells.get(position).copied()
    }

    pub fn is_vacant(&self, position: usize) -> bool {
        self.get(position) == Some(EMPTY)
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&EMPTY)
    }

    /// Indices of empty cells in ascending order
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == EMPTY)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place a mark, validating the target cell first
    pub fn place(&mut self, position: usize, player: Player) -> Result<()> {
        match self.get(position) {
            None => Err(Error::InvalidPosition {
                position,
                cells: self.cells.len(),
            }),
            Some(EMPTY) => {
                self.cells[position] = player.sign();
                Ok(())
            }
            Some(_) => Err(Error::InvalidMove { position }),
        }
    }

    /// Copy of this board with a mark placed, without validation
    pub(crate) fn with_mark(&self, position: usize, player: Player) -> Board {
        let mut next = self.clone();
        next.cells[position] = player.sign();
        next
    }

    /// Count the marks of `player`, the opponent and empties on a line
    pub fn count_line(&self, line: &WinningLine, player: Player) -> LineCount {
        let own = player.sign();
        let mut count = LineCount::default();
        for &idx in line.indices() {
            match self.cells[idx] {
                EMPTY => count.empty += 1,
                v if v == own => count.own += 1,
                _ => count.opponent += 1,
            }
        }
        count
    }

    /// Number of cells on `line` holding `player`'s mark
    pub fn marks_on(&self, line: &WinningLine, player: Player) -> usize {
        let sign = player.sign();
        line.indices()
            .iter()
            .filter(|&&idx| self.cells[idx] == sign)
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_idx, row) in self.cells.chunks(self.size.max(1)).enumerate() {
            if row_idx > 0 {
                writeln!(f)?;
            }
            for &cell in row {
                let c = Player::from_sign(cell).map_or('.', Player::to_char);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
