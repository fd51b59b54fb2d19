use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};
use crate::movegen;

/// Signed square values, file-major (`file * 8 + rank`).
pub type Grid = [i16; 64];
/// Per-square "occupant has moved" flags, same indexing as [`Grid`].
pub type MovedFlags = [bool; 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    Pawn,
    Bishop,
    Knight,
    Rook,
    Queen,
    King,
}

impl Piece {
    /// Unsigned square value of this piece kind.
    pub fn value(self) -> i16 {
        match self {
            Piece::Pawn => 10,
            Piece::Bishop => 30,
            Piece::Knight => 40,
            Piece::Rook => 50,
            Piece::Queen => 90,
            Piece::King => 900,
        }
    }

    /// Resolves the kind strictly from the magnitude of a square value.
    pub fn from_value(value: i16) -> Option<Piece> {
        match value.abs() {
            10 => Some(Piece::Pawn),
            30 => Some(Piece::Bishop),
            40 => Some(Piece::Knight),
            50 => Some(Piece::Rook),
            90 => Some(Piece::Queen),
            900 => Some(Piece::King),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Piece::Pawn => 0,
            Piece::Bishop => 1,
            Piece::Knight => 2,
            Piece::Rook => 3,
            Piece::Queen => 4,
            Piece::King => 5,
        }
    }

    pub fn signed_value(self, color: Color) -> i16 {
        self.value() * color.sign() as i16
    }

    fn to_char(self, color: Color) -> char {
        let c = match self {
            Piece::Pawn => 'p',
            Piece::Bishop => 'b',
            Piece::Knight => 'n',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    fn from_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'b' => Piece::Bishop,
            'n' => Piece::Knight,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            'k' => Piece::King,
            _ => return None,
        };
        Some((piece, color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for white, -1 for black; the sign carried by square values.
    pub fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    pub fn of_value(value: i16) -> Option<Color> {
        match value.signum() {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

/// A bounds-checked board coordinate. Rank 0 is black's back rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    /// Steps by a signed file/rank delta, `None` when it leaves the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file as i8 + df;
        let rank = self.rank as i8 + dr;
        if is_within_board(file, rank) {
            Some(Square {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.file as usize * 8 + self.rank as usize
    }

    pub fn from_index(index: usize) -> Option<Square> {
        if index >= 64 {
            return None;
        }
        Some(Square {
            file: (index / 8) as u8,
            rank: (index % 8) as u8,
        })
    }

    /// All 64 squares in file-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).filter_map(Square::from_index)
    }
}

pub fn is_within_board(file: i8, rank: i8) -> bool {
    (0..8).contains(&file) && (0..8).contains(&rank)
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, 8 - self.rank)
    }
}

impl FromStr for Square {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(EngineError::InvalidSquare(s.to_string()));
        }
        let file = match bytes[0] {
            b @ b'a'..=b'h' => b - b'a',
            _ => return Err(EngineError::InvalidSquare(s.to_string())),
        };
        let rank = match bytes[1] {
            b @ b'1'..=b'8' => 8 - (b - b'0'),
            _ => return Err(EngineError::InvalidSquare(s.to_string())),
        };
        Ok(Square { file, rank })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != 4 || !s.is_ascii() {
            return Err(EngineError::InvalidMove(s.to_string()));
        }
        let from = s[..2].parse()?;
        let to = s[2..].parse()?;
        Ok(Move { from, to })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }

    /// The status reached when `color` has just been mated.
    pub fn mated(color: Color) -> GameStatus {
        match color {
            Color::White => GameStatus::BlackWins,
            Color::Black => GameStatus::WhiteWins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    moved: MovedFlags,
    turn: u32,
    status: GameStatus,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Standard starting layout, white to move.
    pub fn new() -> Self {
        let mut grid = [0; 64];
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            grid[file * 8] = piece.signed_value(Color::Black);
            grid[file * 8 + 1] = Piece::Pawn.signed_value(Color::Black);
            grid[file * 8 + 6] = Piece::Pawn.signed_value(Color::White);
            grid[file * 8 + 7] = piece.signed_value(Color::White);
        }
        Self::from_grid(grid)
    }

    /// A board with no pieces; every square counts as moved.
    pub fn empty() -> Self {
        Self::from_grid([0; 64])
    }

    /// Wraps a raw grid. Only squares holding a king, rook or pawn start
    /// out unmoved.
    pub fn from_grid(grid: Grid) -> Self {
        let mut moved = [true; 64];
        for (flag, &value) in moved.iter_mut().zip(grid.iter()) {
            if matches!(
                Piece::from_value(value),
                Some(Piece::King | Piece::Rook | Piece::Pawn)
            ) {
                *flag = false;
            }
        }
        Self {
            grid,
            moved,
            turn: 0,
            status: GameStatus::InProgress,
        }
    }

    /// Parses eight rows of eight characters, rank index 0 (black's side)
    /// first. `.` is empty, upper case is white, lower case is black.
    /// Whitespace inside a row is ignored.
    pub fn from_diagram(diagram: &str) -> Result<Self> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();
        if rows.len() != 8 {
            return Err(EngineError::InvalidDiagram(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }

        let mut grid = [0; 64];
        for (rank, row) in rows.iter().enumerate() {
            if row.len() != 8 {
                return Err(EngineError::InvalidDiagram(format!(
                    "row {} has {} squares",
                    rank,
                    row.len()
                )));
            }
            for (file, &c) in row.iter().enumerate() {
                if c == '.' {
                    continue;
                }
                let (piece, color) = Piece::from_char(c).ok_or_else(|| {
                    EngineError::InvalidDiagram(format!("unknown piece '{}'", c))
                })?;
                grid[file * 8 + rank] = piece.signed_value(color);
            }
        }
        Ok(Self::from_grid(grid))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn moved_flags(&self) -> &MovedFlags {
        &self.moved
    }

    pub fn value_at(&self, square: Square) -> i16 {
        self.grid[square.index()]
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        let value = self.value_at(square);
        Some((Piece::from_value(value)?, Color::of_value(value)?))
    }

    pub fn has_moved(&self, square: Square) -> bool {
        self.moved[square.index()]
    }

    /// Places a piece without touching the moved flags.
    pub fn set_piece(&mut self, square: Square, piece: Option<(Piece, Color)>) {
        self.grid[square.index()] = piece.map_or(0, |(p, c)| p.signed_value(c));
    }

    pub fn set_moved(&mut self, square: Square, moved: bool) {
        self.moved[square.index()] = moved;
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_to_move(&self) -> Color {
        if self.turn % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }

    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn set_status(&mut self, status: GameStatus) {
        self.status = status;
    }

    /// Squares occupied by `color`, file-major.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        Square::all().filter(move |&sq| Color::of_value(self.grid[sq.index()]) == Some(color))
    }

    /// Sum of all square values; positive favors white.
    pub fn material(&self) -> i32 {
        self.grid.iter().map(|&v| v as i32).sum()
    }

    /// Applies a move without legality checks or turn advance. Handles the
    /// rook hop of castling and promotion to queen.
    pub fn make_move(&mut self, from: Square, to: Square) {
        let value = self.grid[from.index()];

        self.grid[to.index()] = value;
        self.grid[from.index()] = 0;
        self.moved[from.index()] = true;
        self.moved[to.index()] = true;

        match Piece::from_value(value) {
            Some(Piece::King) if (to.file() as i8 - from.file() as i8).abs() == 2 => {
                let (rook_from, rook_to) = if to.file() > from.file() {
                    (to.offset(1, 0), to.offset(-1, 0))
                } else {
                    (to.offset(-2, 0), to.offset(1, 0))
                };
                if let (Some(rook_from), Some(rook_to)) = (rook_from, rook_to) {
                    self.grid[rook_to.index()] = self.grid[rook_from.index()];
                    self.grid[rook_from.index()] = 0;
                    self.moved[rook_from.index()] = true;
                }
            }
            Some(Piece::Pawn) => {
                let promotes = match Color::of_value(value) {
                    Some(Color::White) => to.rank() == 0,
                    Some(Color::Black) => to.rank() == 7,
                    None => false,
                };
                if promotes {
                    self.grid[to.index()] = Piece::Queen.value() * value.signum();
                }
            }
            _ => {}
        }
    }

    pub fn king_square(&self, color: Color) -> Result<Square> {
        let king = Piece::King.signed_value(color);
        Square::all()
            .find(|sq| self.grid[sq.index()] == king)
            .ok_or_else(|| EngineError::InvariantViolation(format!("no {:?} king on the board", color)))
    }

    /// Whether any opposing piece's pseudo-legal moves reach `color`'s king.
    pub fn is_in_check(&self, color: Color) -> Result<bool> {
        let king = self.king_square(color)?;
        Ok(self.pieces(color.opposite()).any(|sq| {
            movegen::pseudo_legal_moves(&self.grid, &self.moved, sq).contains(&king)
        }))
    }

    /// Pseudo-legal destinations that do not leave the mover's king in check.
    pub fn possible_moves(&self, from: Square) -> Result<Vec<Square>> {
        let color = match Color::of_value(self.value_at(from)) {
            Some(color) => color,
            None => return Ok(Vec::new()),
        };

        let mut legal = Vec::new();
        for to in movegen::pseudo_legal_moves(&self.grid, &self.moved, from) {
            let mut virtual_board = self.clone();
            virtual_board.make_move(from, to);
            if !virtual_board.is_in_check(color)? {
                legal.push(to);
            }
        }
        Ok(legal)
    }

    /// All legal moves for `color`, movers in file-major order.
    pub fn legal_moves(&self, color: Color) -> Result<Vec<Move>> {
        let mut moves = Vec::new();
        for from in self.pieces(color) {
            for to in self.possible_moves(from)? {
                moves.push(Move::new(from, to));
            }
        }
        Ok(moves)
    }

    pub fn has_legal_move(&self, color: Color) -> Result<bool> {
        for from in self.pieces(color) {
            if !self.possible_moves(from)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// True when no move of `color` escapes check. A side with no legal
    /// moves at all counts as mated even when it is not in check.
    pub fn is_checkmate(&self, color: Color) -> Result<bool> {
        for from in self.pieces(color) {
            for to in self.possible_moves(from)? {
                let mut after = self.clone();
                after.make_move(from, to);
                if !after.is_in_check(color)? {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    pub fn is_stalemate(&self, color: Color) -> Result<bool> {
        Ok(!self.is_in_check(color)? && !self.has_legal_move(color)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for rank in 0..8u8 {
            result.push((b'8' - rank) as char);
            result.push(' ');
            for file in 0..8u8 {
                let square = Square { file, rank };
                let c = match self.piece_at(square) {
                    Some((piece, color)) => piece.to_char(color),
                    None => '.',
                };
                result.push(c);
                if file < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");
        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_square_names() {
        assert_eq!(sq("a8"), Square::new(0, 0).unwrap());
        assert_eq!(sq("e1"), Square::new(4, 7).unwrap());
        assert_eq!(sq("h1").to_string(), "h1");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_index_round_trip() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        for (i, square) in squares.iter().enumerate() {
            assert_eq!(square.index(), i);
            assert_eq!(Square::from_index(i), Some(*square));
        }
        assert_eq!(Square::from_index(64), None);
        assert_eq!(Square::from_index(9), Square::new(1, 1));
    }

    #[test]
    fn test_offset_rejects_out_of_bounds() {
        let corner = sq("a8");
        assert!(corner.offset(-1, 0).is_none());
        assert!(corner.offset(0, -1).is_none());
        assert_eq!(corner.offset(1, 1), Some(sq("b7")));
        assert!(sq("h1").offset(1, 0).is_none());
        assert!(sq("h1").offset(0, 1).is_none());
    }

    #[test]
    fn test_move_parse_and_display() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv.from, sq("e2"));
        assert_eq!(mv.to, sq("e4"));
        assert_eq!(mv.to_string(), "e2e4");
        assert!("e2e".parse::<Move>().is_err());
        assert!("e2z4".parse::<Move>().is_err());
    }

    #[test]
    fn test_starting_layout() {
        let board = Board::new();
        assert_eq!(board.value_at(sq("e1")), 900);
        assert_eq!(board.value_at(sq("e8")), -900);
        assert_eq!(board.value_at(sq("d1")), 90);
        assert_eq!(board.value_at(sq("b8")), -40);
        assert_eq!(board.value_at(sq("c2")), 10);
        assert_eq!(board.value_at(sq("c7")), -10);
        assert_eq!(board.material(), 0);
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_initial_moved_flags() {
        let board = Board::new();
        assert!(!board.has_moved(sq("e1")));
        assert!(!board.has_moved(sq("a1")));
        assert!(!board.has_moved(sq("h8")));
        assert!(!board.has_moved(sq("d7")));
        assert!(board.has_moved(sq("b1")));
        assert!(board.has_moved(sq("d1")));
        assert!(board.has_moved(sq("e4")));
    }

    #[test]
    fn test_diagram_matches_new() {
        let board = Board::from_diagram(
            "rnbqkbnr
             pppppppp
             ........
             ........
             ........
             ........
             PPPPPPPP
             RNBQKBNR",
        )
        .unwrap();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_diagram_errors() {
        assert!(matches!(
            Board::from_diagram("........"),
            Err(EngineError::InvalidDiagram(_))
        ));
        let bad = "x.......\n".repeat(8);
        assert!(matches!(
            Board::from_diagram(&bad),
            Err(EngineError::InvalidDiagram(_))
        ));
    }

    #[test]
    fn test_display() {
        let text = Board::new().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r");
        assert!(text.contains("1 R N B Q K B N R"));
    }

    #[test]
    fn test_clone_is_independent() {
        let board = Board::new();
        let mut copy = board.clone();
        copy.make_move(sq("e2"), sq("e4"));
        copy.advance_turn();
        assert_eq!(board.value_at(sq("e2")), 10);
        assert_eq!(board.value_at(sq("e4")), 0);
        assert!(!board.has_moved(sq("e2")));
        assert_eq!(board.turn(), 0);
        assert_eq!(copy.value_at(sq("e4")), 10);
        assert!(copy.has_moved(sq("e2")));
    }

    #[test]
    fn test_missing_king_is_invariant_violation() {
        let board = Board::from_diagram(
            "....k...
             ........
             ........
             ........
             ........
             ........
             ........
             R.......",
        )
        .unwrap();
        assert!(matches!(
            board.is_in_check(Color::White),
            Err(EngineError::InvariantViolation(_))
        ));
        assert!(!board.is_in_check(Color::Black).unwrap());
    }

    #[test]
    fn test_possible_moves_on_empty_square() {
        let board = Board::new();
        assert!(board.possible_moves(sq("e4")).unwrap().is_empty());
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let board = Board::from_diagram(
            "....r..k
             ........
             ........
             ........
             ........
             ........
             ....B...
             ....K...",
        )
        .unwrap();
        assert!(board.possible_moves(sq("e2")).unwrap().is_empty());
    }
}
