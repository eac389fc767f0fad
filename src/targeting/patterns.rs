//! Cell patterns shared by the built-in strategies and the FSM interpreter.

use crate::common::Coord;

/// Orthogonal neighbours: up, down, left, right.
pub const ADJACENT: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Cells two steps away: up, down, left, right.
pub const P2M2: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// `origin` shifted by `(dr, dc)` if the result stays on a board of side `size`.
#[inline]
pub fn offset(size: usize, (row, col): Coord, (dr, dc): (isize, isize)) -> Option<Coord> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < size && c < size).then_some((r, c))
}

/// In-bounds cells of `offsets` applied to `origin`, in offset order.
pub fn around(
    size: usize,
    origin: Coord,
    offsets: &'static [(isize, isize)],
) -> impl Iterator<Item = Coord> {
    offsets.iter().filter_map(move |&d| offset(size, origin, d))
}

/// Cells with `(row + col) % 2 == parity`, row-major.
pub fn checkerboard(size: usize, parity: u8) -> Vec<Coord> {
    (0..size)
        .flat_map(|r| (0..size).map(move |c| (r, c)))
        .filter(|&(r, c)| (r + c) % 2 == parity as usize)
        .collect()
}

/// Every cell in anti-diagonal order, alternating direction on each
/// diagonal so consecutive cells stay close.
pub fn diagonal_path(size: usize) -> Vec<Coord> {
    let mut path = Vec::with_capacity(size * size);
    for k in 0..(2 * size).saturating_sub(1) {
        let mut diagonal: Vec<Coord> = (0..size)
            .filter(|&r| k >= r && k - r < size)
            .map(|r| (r, k - r))
            .collect();
        if k % 2 == 1 {
            diagonal.reverse();
        }
        path.extend(diagonal);
    }
    path
}

/// Cells on the outer ring of the board, row-major.
pub fn edge_cells(size: usize) -> Vec<Coord> {
    (0..size)
        .flat_map(|r| (0..size).map(move |c| (r, c)))
        .filter(|&(r, c)| r == 0 || c == 0 || r + 1 == size || c + 1 == size)
        .collect()
}

#[inline]
pub fn parity_of((r, c): Coord) -> u8 {
    ((r + c) % 2) as u8
}
