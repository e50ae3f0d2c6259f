//! Reward shaping from board geometry
//!
//! Two independent heuristics score a move using the board immediately
//! before and after it, seen from the mover's side:
//!
//! - **Threat blocking** rewards neutralizing opponent lines that are one or
//!   two marks short of completion, and penalizes leaving them open.
//! - **Line building** pays a small bonus for every own line the move
//!   extends.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{Board, Player, WinningLine, WinningLines};

/// Shaping magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapingRewards {
    /// Left an opponent K-1 line open
    pub ignore_critical: f64,
    /// Closed every opponent K-1 line
    pub block_critical: f64,
    /// Left an opponent K-2 line open
    pub ignore_subcritical: f64,
    /// Closed every opponent K-2 line
    pub block_subcritical: f64,
    /// Per own line extended by one mark
    pub extend_line: f64,
}

impl Default for ShapingRewards {
    fn default() -> Self {
        Self {
            ignore_critical: -2.0,
            block_critical: 1.0,
            ignore_subcritical: -1.0,
            block_subcritical: 0.3,
            extend_line: 0.1,
        }
    }
}

/// Opponent threat on a line the mover has not touched yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Threat {
    opponent: usize,
    empty: usize,
}

impl Threat {
    fn matches(self, board: &Board, line: &WinningLine, mover: Player) -> bool {
        let count = board.count_line(line, mover);
        count.opponent == self.opponent && count.empty == self.empty
    }
}

/// Scores moves against the shared winning lines
#[derive(Debug, Clone)]
pub struct RewardShaper {
    lines: Arc<WinningLines>,
    rewards: ShapingRewards,
}

impl RewardShaper {
    pub fn new(lines: Arc<WinningLines>, rewards: ShapingRewards) -> Self {
        Self { lines, rewards }
    }

    pub fn rewards(&self) -> &ShapingRewards {
        &self.rewards
    }

    pub fn lines(&self) -> &WinningLines {
        &self.lines
    }

    /// Threat-blocking shaping for `mover`'s move from `before` to `after`
    ///
    /// Lines free of the mover's marks are critical when the opponent holds
    /// K-1 with one empty cell, sub-critical at K-2 with two empty. Only
    /// the highest tier present is judged: any line still matching its tier
    /// after the move earns the penalty, otherwise the block reward.
    pub fn shape_block(&self, before: &Board, after: &Board, mover: Player) -> f64 {
        let k = self.lines.k();
        let critical = k.checked_sub(1).map(|opponent| Threat {
            opponent,
            empty: 1,
        });
        let subcritical = k.checked_sub(2).map(|opponent| Threat {
            opponent,
            empty: 2,
        });

        let mut critical_lines = Vec::new();
        let mut subcritical_lines = Vec::new();
        for line in self.lines.iter() {
            let count = before.count_line(line, mover);
            if count.own != 0 {
                continue;
            }
            if critical.is_some_and(|t| t.opponent == count.opponent && t.empty == count.empty) {
                critical_lines.push(line);
            } else if subcritical
                .is_some_and(|t| t.opponent == count.opponent && t.empty == count.empty)
            {
                subcritical_lines.push(line);
            }
        }

        let tiers = [
            (
                critical,
                critical_lines,
                self.rewards.ignore_critical,
                self.rewards.block_critical,
            ),
            (
                subcritical,
                subcritical_lines,
                self.rewards.ignore_subcritical,
                self.rewards.block_subcritical,
            ),
        ];
        for (threat, lines, penalty, reward) in tiers {
            let Some(threat) = threat else { continue };
            if lines.is_empty() {
                continue;
            }
            let survived = lines
                .iter()
                .any(|line| threat.matches(after, line, mover));
            return if survived { penalty } else { reward };
        }
        0.0
    }

    /// Line-building shaping: a bonus per line whose own count rose by one
    pub fn shape_build(&self, before: &Board, after: &Board, mover: Player) -> f64 {
        let extended = self
            .lines
            .iter()
            .filter(|line| after.marks_on(line, mover) == before.marks_on(line, mover) + 1)
            .count();
        extended as f64 * self.rewards.extend_line
    }

    /// Sum of both heuristics
    pub fn shape(&self, before: &Board, after: &Board, mover: Player) -> f64 {
        self.shape_block(before, after, mover) + self.shape_build(before, after, mover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaper(size: usize, k: usize) -> RewardShaper {
        RewardShaper::new(
            Arc::new(WinningLines::generate(size, k).unwrap()),
            ShapingRewards::default(),
        )
    }

    fn boards(size: usize, before: &str, after: &str) -> (Board, Board) {
        (
            Board::parse(size, before).unwrap(),
            Board::parse(size, after).unwrap(),
        )
    }

    #[test]
    fn test_blocking_critical_threat() {
        let shaper = shaper(3, 3);
        let (before, after) = boards(3, "XX. O.. ...", "XXO O.. ...");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), 1.0);
    }

    #[test]
    fn test_ignoring_critical_threat() {
        let shaper = shaper(3, 3);
        let (before, after) = boards(3, "XX. O.. ...", "XX. O.. ..O");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), -2.0);
    }

    #[test]
    fn test_one_open_threat_outweighs_a_block() {
        // X threatens both the top row and the left column
        let shaper = shaper(3, 3);
        let (before, after) = boards(3, "XX. X.. .OO", "XXO X.. .OO");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), -2.0);
    }

    #[test]
    fn test_subcritical_tier() {
        let shaper = shaper(4, 4);
        let (before, blocked) = boards(4, "XX.. .... .... ....", "XXO. .... .... ....");
        assert_eq!(shaper.shape_block(&before, &blocked, Player::O), 0.3);

        let ignored = Board::parse(4, "XX.. .... .... ...O").unwrap();
        assert_eq!(shaper.shape_block(&before, &ignored, Player::O), -1.0);
    }

    #[test]
    fn test_critical_tier_suppresses_subcritical() {
        // Top row is critical (K-1), second row is sub-critical (K-2)
        let shaper = shaper(4, 4);
        let (before, after) = boards(4, "XXX. XX.. .... ....", "XXXO XX.. .... ....");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), 1.0);
    }

    #[test]
    fn test_no_threat_means_zero() {
        let shaper = shaper(4, 4);
        let (before, after) = boards(4, "X... .... .... ....", "X... .O.. .... ....");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), 0.0);
    }

    #[test]
    fn test_lines_with_own_marks_are_not_threats() {
        let shaper = shaper(4, 4);
        let (before, after) = boards(4, "XXXO .... .... ....", "XXXO .O.. .... ....");
        assert_eq!(shaper.shape_block(&before, &after, Player::O), 0.0);
    }

    #[test]
    fn test_build_counts_every_extended_line() {
        let shaper = shaper(3, 3);
        let (before, after) = boards(3, "... ... ...", "... .X. ...");
        // Center lies on a row, a column and both diagonals
        let shaping = shaper.shape_build(&before, &after, Player::X);
        assert!((shaping - 0.4).abs() < 1e-12);

        let (before, after) = boards(3, "... ... ...", "X.. ... ...");
        let shaping = shaper.shape_build(&before, &after, Player::X);
        assert!((shaping - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_build_ignores_opponent_moves() {
        let shaper = shaper(3, 3);
        let (before, after) = boards(3, "... ... ...", "... .O. ...");
        assert_eq!(shaper.shape_build(&before, &after, Player::X), 0.0);
    }
}
