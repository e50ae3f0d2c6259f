//! Winning line generation and analysis for N x N, K-in-a-row boards

use std::collections::HashSet;

use super::{Board, Player};
use crate::{Error, Result};

/// Row, column, down-right diagonal and down-left diagonal steps
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// K board indices forming one contiguous run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WinningLine(Box<[usize]>);

impl WinningLine {
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.0.contains(&position)
    }
}

/// Every winning line of an N x N board with run length K
///
/// Built once per engine and shared read-only with the agent's shaping
/// logic and the aggressive opponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningLines {
    size: usize,
    k: usize,
    lines: Vec<WinningLine>,
}

impl WinningLines {
    /// Generate all K-length runs along rows, columns and both diagonals
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `size >= k >= 1`.
    pub fn generate(size: usize, k: usize) -> Result<Self> {
        if k == 0 || size < k {
            return Err(Error::config(format!(
                "board size {size} and run length {k} must satisfy size >= k >= 1"
            )));
        }

        let n = size as isize;
        let run = k as isize;
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for r in 0..n {
            for c in 0..n {
                for (dr, dc) in DIRECTIONS {
                    let end_r = r + dr * (run - 1);
                    let end_c = c + dc * (run - 1);
                    if !(0..n).contains(&end_r) || !(0..n).contains(&end_c) {
                        continue;
                    }
                    let indices: Box<[usize]> = (0..run)
                        .map(|i| ((r + dr * i) * n + (c + dc * i)) as usize)
                        .collect();
                    // With k == 1 every direction yields the same singleton.
                    let mut key = indices.to_vec();
                    key.sort_unstable();
                    if seen.insert(key) {
                        lines.push(WinningLine(indices));
                    }
                }
            }
        }

        Ok(Self { size, k, lines })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WinningLine> {
        self.lines.iter()
    }

    pub fn as_slice(&self) -> &[WinningLine] {
        &self.lines
    }

    /// Check if `player` occupies every cell of some line
    pub fn has_won(&self, board: &Board, player: Player) -> bool {
        self.lines
            .iter()
            .any(|line| board.marks_on(line, player) == line.len())
    }

    /// Check if some line holds none of the opponent's marks
    pub fn can_still_win(&self, board: &Board, player: Player) -> bool {
        let opponent = player.opponent();
        self.lines
            .iter()
            .any(|line| board.marks_on(line, opponent) == 0)
    }

    /// Largest number of `player`'s marks found on any single line
    pub fn max_marks(&self, board: &Board, player: Player) -> usize {
        self.lines
            .iter()
            .map(|line| board.marks_on(line, player))
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a WinningLines {
    type Item = &'a WinningLine;
    type IntoIter = std::slice::Iter<'a, WinningLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(lines: &WinningLines) -> Vec<Vec<usize>> {
        let mut all: Vec<Vec<usize>> = lines
            .iter()
            .map(|l| {
                let mut v = l.indices().to_vec();
                v.sort_unstable();
                v
            })
            .collect();
        all.sort();
        all
    }

    #[test]
    fn test_classic_board_has_eight_lines() {
        let lines = WinningLines::generate(3, 3).unwrap();
        let expected = vec![
            vec![0, 1, 2],
            vec![0, 3, 6],
            vec![0, 4, 8],
            vec![1, 4, 7],
            vec![2, 4, 6],
            vec![2, 5, 8],
            vec![3, 4, 5],
            vec![6, 7, 8],
        ];
        assert_eq!(sorted(&lines), expected);
    }

    #[test]
    fn test_no_duplicate_diagonals_when_size_exceeds_k() {
        let lines = WinningLines::generate(5, 3).unwrap();
        let unique: HashSet<Vec<usize>> = sorted(&lines).into_iter().collect();
        assert_eq!(unique.len(), lines.len());
        // 2 * 5 * 3 straight runs plus 2 * 3 * 3 diagonal runs
        assert_eq!(lines.len(), 48);
    }

    #[test]
    fn test_k_one_yields_singletons() {
        let lines = WinningLines::generate(3, 1).unwrap();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().all(|l| l.len() == 1));
    }

    #[test]
    fn test_anti_diagonal_runs_down_left() {
        let lines = WinningLines::generate(4, 4).unwrap();
        assert!(
            lines
                .iter()
                .any(|l| l.indices() == [3, 6, 9, 12].as_slice())
        );
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(WinningLines::generate(3, 4).is_err());
        assert!(WinningLines::generate(3, 0).is_err());
    }

    #[test]
    fn test_has_won_and_can_still_win() {
        let lines = WinningLines::generate(3, 3).unwrap();
        let board = Board::parse(3, "XXX OO. ...").unwrap();
        assert!(lines.has_won(&board, Player::X));
        assert!(!lines.has_won(&board, Player::O));
        assert!(lines.can_still_win(&board, Player::O));
    }

    #[test]
    fn test_max_marks() {
        let lines = WinningLines::generate(4, 3).unwrap();
        let board = Board::parse(4, "XX.. .X.. .... O...").unwrap();
        assert_eq!(lines.max_marks(&board, Player::X), 2);
        assert_eq!(lines.max_marks(&board, Player::O), 1);
    }
}
