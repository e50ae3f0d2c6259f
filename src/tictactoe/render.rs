//! Text rendering of boards and game replays

use super::{Board, Player};

/// Format a board as rows of `X`, `O` and `.` separated by `|`
pub fn format_board(board: &Board) -> String {
    let size = board.size().max(1);
    board
        .cells()
        .chunks(size)
        .map(|row| {
            row.iter()
                .map(|&c| Player::from_sign(c).map_or('.', Player::to_char).to_string())
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render every snapshot of a game as numbered frames
pub fn render_history(history: &[Board]) -> String {
    let mut out = String::new();
    for (idx, board) in history.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&format!("Move {}:\n", idx + 1));
        out.push_str(&format_board(board));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_board() {
        let board = Board::parse(3, "X.O ... ..X").unwrap();
        assert_eq!(format_board(&board), "X|.|O\n.|.|.\n.|.|X");
    }

    #[test]
    fn test_render_history_numbers_frames() {
        let frames = vec![
            Board::parse(2, "X...").unwrap(),
            Board::parse(2, "XO..").unwrap(),
        ];
        let text = render_history(&frames);
        assert!(text.starts_with("Move 1:\nX|.\n.|.\n"));
        assert!(text.contains("Move 2:\nX|O\n.|.\n"));
    }

    #[test]
    fn test_rendered_board_parses_back() {
        let board = Board::parse(3, "XOX .O. ..X").unwrap();
        let reparsed = Board::parse(3, &format_board(&board)).unwrap();
        assert_eq!(reparsed, board);
    }
}
