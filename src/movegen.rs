//! Per-piece movement rules.
//!
//! Every routine here is pure: it reads a grid snapshot and the moved flags
//! and returns pseudo-legal destinations, without checking whether the
//! mover's own king is left in check. Destination order is stable and the
//! search relies on it for tie-breaking.

use crate::board::{Color, Grid, MovedFlags, Piece, Square};

type RuleFn = fn(&Grid, &MovedFlags, Square) -> Vec<Square>;

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (2, -1), (2, 1),
    (-1, -2), (-1, 2), (1, -2), (1, 2),
];

fn value(grid: &Grid, square: Square) -> i16 {
    grid[square.index()]
}

pub fn is_empty(grid: &Grid, square: Square) -> bool {
    value(grid, square) == 0
}

/// The target holds a piece of the opposite sign to `mover`.
pub fn is_capture(grid: &Grid, square: Square, mover: i16) -> bool {
    (value(grid, square) as i32) * (mover as i32) < 0
}

/// The target is empty or capturable.
pub fn is_open_or_capture(grid: &Grid, square: Square, mover: i16) -> bool {
    (value(grid, square) as i32) * (mover as i32) <= 0
}

fn rule_for(piece: Piece) -> RuleFn {
    match piece {
        Piece::Pawn => pawn_moves,
        Piece::Bishop => bishop_moves,
        Piece::Knight => knight_moves,
        Piece::Rook => rook_moves,
        Piece::Queen => queen_moves,
        Piece::King => king_moves,
    }
}

/// Pseudo-legal destinations for whatever stands on `from`.
pub fn pseudo_legal_moves(grid: &Grid, moved: &MovedFlags, from: Square) -> Vec<Square> {
    match Piece::from_value(value(grid, from)) {
        Some(piece) => rule_for(piece)(grid, moved, from),
        None => Vec::new(),
    }
}

pub fn pawn_moves(grid: &Grid, moved: &MovedFlags, from: Square) -> Vec<Square> {
    let mover = value(grid, from);
    let forward: i8 = match Color::of_value(mover) {
        Some(Color::White) => -1,
        Some(Color::Black) => 1,
        None => return Vec::new(),
    };
    let mut moves = Vec::with_capacity(4);

    if let Some(step) = from.offset(0, forward) {
        if is_empty(grid, step) {
            moves.push(step);
            if !moved[from.index()] {
                if let Some(double) = from.offset(0, 2 * forward) {
                    if is_empty(grid, double) {
                        moves.push(double);
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        if let Some(target) = from.offset(df, forward) {
            if is_capture(grid, target, mover) {
                moves.push(target);
            }
        }
    }

    moves
}

fn slide(grid: &Grid, from: Square, directions: &[(i8, i8)]) -> Vec<Square> {
    let mover = value(grid, from);
    let mut moves = Vec::new();
    for &(df, dr) in directions {
        let mut current = from.offset(df, dr);
        while let Some(target) = current {
            if is_empty(grid, target) {
                moves.push(target);
                current = target.offset(df, dr);
                continue;
            }
            if is_capture(grid, target, mover) {
                moves.push(target);
            }
            break;
        }
    }
    moves
}

pub fn rook_moves(grid: &Grid, _moved: &MovedFlags, from: Square) -> Vec<Square> {
    slide(grid, from, &ORTHOGONAL)
}

pub fn bishop_moves(grid: &Grid, _moved: &MovedFlags, from: Square) -> Vec<Square> {
    slide(grid, from, &DIAGONAL)
}

pub fn queen_moves(grid: &Grid, _moved: &MovedFlags, from: Square) -> Vec<Square> {
    slide(grid, from, &ALL_DIRECTIONS)
}

fn step(grid: &Grid, from: Square, offsets: &[(i8, i8)]) -> Vec<Square> {
    let mover = value(grid, from);
    offsets
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .filter(|&target| is_open_or_capture(grid, target, mover))
        .collect()
}

pub fn knight_moves(grid: &Grid, _moved: &MovedFlags, from: Square) -> Vec<Square> {
    step(grid, from, &KNIGHT_OFFSETS)
}

pub fn king_moves(grid: &Grid, moved: &MovedFlags, from: Square) -> Vec<Square> {
    let mut moves = step(grid, from, &ALL_DIRECTIONS);

    if moved[from.index()] {
        return moves;
    }
    // King-side: two empty squares, rook three files over.
    if let Some(target) = castling_target(grid, moved, from, 1, 2) {
        moves.push(target);
    }
    // Queen-side: three empty squares, rook four files over.
    if let Some(target) = castling_target(grid, moved, from, -1, 3) {
        moves.push(target);
    }

    moves
}

fn castling_target(
    grid: &Grid,
    moved: &MovedFlags,
    king: Square,
    direction: i8,
    gap: i8,
) -> Option<Square> {
    let king_value = value(grid, king);
    for i in 1..=gap {
        if !is_empty(grid, king.offset(direction * i, 0)?) {
            return None;
        }
    }
    let corner = king.offset(direction * (gap + 1), 0)?;
    let corner_value = value(grid, corner);
    let friendly_rook = Piece::from_value(corner_value) == Some(Piece::Rook)
        && corner_value.signum() == king_value.signum();
    if !friendly_rook || moved[corner.index()] {
        return None;
    }
    king.offset(direction * 2, 0)
}
