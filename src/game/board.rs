use std::fmt;

use super::Direction;

pub const SIZE: usize = 4;

/// A single row or column, oriented so tiles travel toward index 0.
pub type Line = [u32; SIZE];

/// 4x4 grid of tile values. 0 is an empty cell, anything else a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[u32; SIZE]; SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[0; SIZE]; SIZE],
        }
    }

    /// Build a board from row-major values
    pub fn from_rows(cells: [[u32; SIZE]; SIZE]) -> Self {
        debug_assert!(
            cells.iter().flatten().all(|&v| is_tile_value(v)),
            "tiles must be 0 or a power of two >= 2"
        );
        Board { cells }
    }

    /// Row-major copy of the cells
    pub fn rows(&self) -> [[u32; SIZE]; SIZE] {
        self.cells
    }

    /// Get the value at a specific position
    /// Row 0 is the top, col 0 is the left
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: u32) {
        debug_assert!(is_tile_value(value), "invalid tile value {}", value);
        self.cells[row][col] = value;
    }

    /// Coordinates of every empty cell, row-major
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..SIZE)
            .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col] == 0)
            .collect()
    }

    /// Check if every cell holds a tile
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&v| v != 0)
    }

    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all tile values; merges conserve it, spawns raise it.
    pub fn tile_sum(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }

    /// Read line `idx` for a move in `dir`, oriented toward index 0.
    fn line(&self, idx: usize, dir: Direction) -> Line {
        let mut line = [0; SIZE];
        for (i, slot) in line.iter_mut().enumerate() {
            *slot = if dir.is_vertical() {
                self.cells[i][idx]
            } else {
                self.cells[idx][i]
            };
        }
        if dir.is_reversed() {
            line.reverse();
        }
        line
    }

    /// Write an oriented line back, undoing the orientation of `line()`.
    fn set_line(&mut self, idx: usize, dir: Direction, mut line: Line) {
        if dir.is_reversed() {
            line.reverse();
        }
        for (i, value) in line.into_iter().enumerate() {
            if dir.is_vertical() {
                self.cells[i][idx] = value;
            } else {
                self.cells[idx][i] = value;
            }
        }
    }

    /// Slide and merge every line toward `dir` in place.
    /// Returns the points earned by merges.
    pub fn apply_move(&mut self, dir: Direction) -> u32 {
        let mut points = 0;
        for idx in 0..SIZE {
            let (merged, gained) = merge_line(self.line(idx, dir));
            self.set_line(idx, dir, merged);
            points += gained;
        }
        points
    }

    /// The board a move would produce, leaving `self` untouched.
    pub fn shifted(&self, dir: Direction) -> (Board, u32) {
        let mut next = *self;
        let points = next.apply_move(dir);
        (next, points)
    }

    /// Whether a move in `dir` would change the board
    pub fn can_move(&self, dir: Direction) -> bool {
        self.shifted(dir).0 != *self
    }

    /// Directions that would change the board
    pub fn legal_directions(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    /// True when no direction changes the board. Trial moves run on copies.
    pub fn is_game_over(&self) -> bool {
        !Direction::ALL.into_iter().any(|dir| self.can_move(dir))
    }
}

/// 0 (empty) or a power of two of at least 2.
fn is_tile_value(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Compress one line toward index 0: drop gaps, then merge equal neighbours
/// pairwise from the front. A tile produced by a merge does not merge again
/// in the same pass.
pub fn compress_line(line: Line) -> Line {
    merge_line(line).0
}

/// Like [`compress_line`], also returning the sum of the merged tile values.
pub fn merge_line(line: Line) -> (Line, u32) {
    let mut out = [0; SIZE];
    let mut len = 0;
    let mut points = 0;
    // Whether out[len - 1] may still absorb an equal tile.
    let mut open = false;

    for value in line.into_iter().filter(|&v| v != 0) {
        if open && out[len - 1] == value {
            out[len - 1] *= 2;
            points += out[len - 1];
            open = false;
        } else {
            out[len] = value;
            len += 1;
            open = true;
        }
    }

    (out, points)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "+------+------+------+------+";
        writeln!(f, "{}", separator)?;
        for row in &self.cells {
            for &value in row {
                if value == 0 {
                    write!(f, "|      ")?;
                } else {
                    write!(f, "|{:^6}", value)?;
                }
            }
            writeln!(f, "|")?;
            writeln!(f, "{}", separator)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stuck_board() -> Board {
        Board::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.empty_cells().len(), SIZE * SIZE);
        assert_eq!(board.tile_sum(), 0);
        assert!(!board.is_full());
    }

    #[test]
    fn test_compress_pairwise() {
        assert_eq!(compress_line([2, 2, 2, 2]), [4, 4, 0, 0]);
        assert_eq!(compress_line([2, 0, 2, 4]), [4, 4, 0, 0]);
        assert_eq!(compress_line([2, 2, 4, 0]), [4, 4, 0, 0]);
        assert_eq!(compress_line([2, 2, 4, 4]), [4, 8, 0, 0]);
        assert_eq!(compress_line([4, 2, 2, 0]), [4, 4, 0, 0]);
        assert_eq!(compress_line([2, 2, 2, 0]), [4, 2, 0, 0]);
    }

    #[test]
    fn test_compress_without_merges() {
        assert_eq!(compress_line([0, 0, 0, 0]), [0, 0, 0, 0]);
        assert_eq!(compress_line([2, 4, 2, 4]), [2, 4, 2, 4]);
        assert_eq!(compress_line([0, 0, 0, 8]), [8, 0, 0, 0]);
        assert_eq!(compress_line([0, 2, 0, 4]), [2, 4, 0, 0]);
    }

    #[test]
    fn test_compress_conserves_sum() {
        let lines: [Line; 6] = [
            [2, 2, 4, 0],
            [2, 2, 2, 2],
            [8, 8, 16, 16],
            [0, 4, 4, 4],
            [1024, 1024, 0, 2],
            [2, 4, 8, 16],
        ];
        for line in lines {
            let before: u32 = line.iter().sum();
            let after: u32 = compress_line(line).iter().sum();
            assert_eq!(before, after, "sum changed for {:?}", line);
        }
    }

    #[test]
    fn test_merge_points() {
        assert_eq!(merge_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
        assert_eq!(merge_line([2, 4, 8, 16]), ([2, 4, 8, 16], 0));
        assert_eq!(merge_line([1024, 1024, 0, 0]), ([2048, 0, 0, 0], 2048));
    }

    #[test]
    fn test_move_left_and_right() {
        let mut board = Board::from_rows([
            [2, 2, 4, 0],
            [0, 0, 0, 2],
            [2, 0, 2, 4],
            [4, 4, 4, 4],
        ]);
        let mut right = board;

        board.apply_move(Direction::Left);
        assert_eq!(
            board.rows(),
            [
                [4, 4, 0, 0],
                [2, 0, 0, 0],
                [4, 4, 0, 0],
                [8, 8, 0, 0],
            ]
        );

        right.apply_move(Direction::Right);
        assert_eq!(
            right.rows(),
            [
                [0, 0, 4, 4],
                [0, 0, 0, 2],
                [0, 0, 4, 4],
                [0, 0, 8, 8],
            ]
        );
    }

    #[test]
    fn test_move_up_and_down() {
        let mut board = Board::from_rows([
            [2, 0, 4, 2],
            [2, 0, 4, 0],
            [4, 0, 0, 2],
            [0, 2, 4, 2],
        ]);
        let mut down = board;

        board.apply_move(Direction::Up);
        assert_eq!(
            board.rows(),
            [
                [4, 2, 8, 4],
                [4, 0, 4, 2],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]
        );

        down.apply_move(Direction::Down);
        assert_eq!(
            down.rows(),
            [
                [0, 0, 0, 0],
                [0, 0, 0, 0],
                [4, 0, 4, 2],
                [4, 2, 8, 4],
            ]
        );
    }

    fn has_equal_neighbours(line: Line) -> bool {
        line.windows(2).any(|w| w[0] != 0 && w[0] == w[1])
    }

    #[test]
    fn test_repeated_move_only_merges_new_pairs() {
        let original = Board::from_rows([
            [2, 2, 4, 8],
            [4, 4, 4, 0],
            [8, 0, 0, 2],
            [8, 8, 8, 8],
        ]);
        for dir in Direction::ALL {
            let (once, _) = original.shifted(dir);
            let (twice, _) = once.shifted(dir);
            for idx in 0..SIZE {
                let first = once.line(idx, dir);
                let second = twice.line(idx, dir);

                // Already compacted: no tile sits behind a gap.
                let tiles = first.iter().take_while(|&&v| v != 0).count();
                assert!(first[tiles..].iter().all(|&v| v == 0), "{:?} left a gap", dir);

                if !has_equal_neighbours(first) {
                    assert_eq!(first, second, "second {:?} changed line {}", dir, idx);
                }
            }
        }
    }

    #[test]
    fn test_repeated_move_without_new_pairs_is_stable() {
        let original = Board::from_rows([
            [2, 0, 4, 8],
            [0, 4, 0, 0],
            [2, 0, 0, 16],
            [0, 8, 2, 0],
        ]);
        for dir in Direction::ALL {
            let (once, _) = original.shifted(dir);
            let (twice, points) = once.shifted(dir);
            assert_eq!(once, twice, "second {:?} changed the board", dir);
            assert_eq!(points, 0);
        }
    }

    #[test]
    fn test_repeated_move_merges_freshly_formed_pair() {
        let once = compress_line([8, 8, 8, 8]);
        assert_eq!(once, [16, 16, 0, 0]);
        assert_eq!(compress_line(once), [32, 0, 0, 0]);

        let mut board = Board::new();
        for col in 0..SIZE {
            board.set(3, col, 8);
        }
        let (once, _) = board.shifted(Direction::Left);
        let (twice, points) = once.shifted(Direction::Left);
        assert_eq!(twice.rows()[3], [32, 0, 0, 0]);
        assert_eq!(points, 32);
    }

    #[test]
    fn test_stuck_board_is_game_over() {
        let board = stuck_board();
        assert!(board.is_full());
        for dir in Direction::ALL {
            assert!(!board.can_move(dir), "{:?} should not move", dir);
        }
        assert!(board.legal_directions().is_empty());
        assert!(board.is_game_over());
    }

    #[test]
    fn test_adjacent_pair_is_not_game_over() {
        let mut board = stuck_board();
        board.set(0, 0, 8);
        board.set(0, 1, 8);
        assert!(board.is_full());
        assert!(!board.is_game_over());
        assert_eq!(
            board.legal_directions(),
            vec![Direction::Left, Direction::Right]
        );

        let mut board = stuck_board();
        board.set(0, 0, 8);
        board.set(1, 0, 8);
        assert!(!board.is_game_over());
        assert_eq!(board.legal_directions(), vec![Direction::Up, Direction::Down]);
    }

    #[test]
    fn test_game_over_check_leaves_board_untouched() {
        let board = Board::from_rows([
            [2, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 4, 0],
            [0, 0, 0, 0],
        ]);
        let before = board;
        assert!(!board.is_game_over());
        assert_eq!(board, before);
    }

    #[test]
    fn test_empty_board_cannot_move() {
        assert!(Board::new().is_game_over());
    }

    #[test]
    fn test_empty_cells_and_highest_tile() {
        let board = Board::from_rows([
            [2, 0, 0, 0],
            [0, 64, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 8],
        ]);
        let empty = board.empty_cells();
        assert_eq!(empty.len(), 13);
        assert!(!empty.contains(&(1, 1)));
        assert_eq!(board.highest_tile(), 64);
    }

    #[test]
    fn test_tile_values() {
        assert!(is_tile_value(0));
        assert!(is_tile_value(2));
        assert!(is_tile_value(1 << 17));
        assert!(!is_tile_value(1));
        assert!(!is_tile_value(3));
        assert!(!is_tile_value(12));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid tile value")]
    fn test_set_rejects_non_power_of_two() {
        let mut board = Board::new();
        board.set(0, 0, 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "tiles must be 0 or a power of two")]
    fn test_from_rows_rejects_odd_values() {
        Board::from_rows([[1, 0, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
    }

    #[test]
    fn test_display_shows_values() {
        let mut board = Board::new();
        board.set(0, 0, 2048);
        let text = board.to_string();
        assert!(text.contains("2048"));
        assert_eq!(text.lines().count(), 2 * SIZE + 1);
    }
}
