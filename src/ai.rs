// Probability density over the opponent board.

use crate::{bitboard::BitBoard, common::Coord, ship::Orientation};
use rand::{seq::IndexedRandom, Rng};

/// Placements covering `n` known hits are weighted `HIT_BIAS^n`, so cells
/// next to confirmed hits dominate the map.
const HIT_BIAS: f64 = 10.0;

/// Compute a probability density over every cell given the open hits (hits
/// on ships not yet sunk), the blocked cells (misses and cells of sunk
/// ships) and the lengths of the remaining enemy ships. The result is
/// row-major and sums to one; cells already known get no weight.
pub fn calc_pdf(
    size: usize,
    hits: &BitBoard,
    blocked: &BitBoard,
    remaining_lengths: &[usize],
) -> Vec<f64> {
    let mut matrix = vec![0.0f64; size * size];

    for &len in remaining_lengths {
        if len == 0 || len > size {
            continue;
        }
        for orient in [Orientation::Horizontal, Orientation::Vertical] {
            let (max_row, max_col) = match orient {
                Orientation::Vertical => (size - len + 1, size),
                Orientation::Horizontal => (size, size - len + 1),
            };
            for r in 0..max_row {
                for c in 0..max_col {
                    let cells = (0..len).map(|k| orient.step((r, c), k));
                    if cells.clone().any(|(rr, cc)| blocked.contains(rr, cc)) {
                        continue;
                    }
                    let n_hits = cells.clone().filter(|&(rr, cc)| hits.contains(rr, cc)).count();
                    let weight = HIT_BIAS.powi(n_hits as i32);
                    for (rr, cc) in cells.filter(|&(rr, cc)| !hits.contains(rr, cc)) {
                        matrix[rr * size + cc] += weight;
                    }
                }
            }
        }
    }

    normalize(matrix)
}

fn normalize(mut matrix: Vec<f64>) -> Vec<f64> {
    let total: f64 = matrix.iter().sum();
    if total == 0.0 {
        return matrix;
    }
    for v in matrix.iter_mut() {
        *v /= total;
    }
    matrix
}

/// Highest-weighted cell among those `open` allows, ties broken at random.
/// `None` when no allowed cell has any weight.
pub fn most_likely<R, F>(pdf: &[f64], size: usize, open: F, rng: &mut R) -> Option<Coord>
where
    R: Rng + ?Sized,
    F: Fn(usize, usize) -> bool,
{
    let mut best = 0.0f64;
    let mut ties: Vec<Coord> = Vec::new();
    for r in 0..size {
        for c in 0..size {
            let p = pdf[r * size + c];
            if p <= 0.0 || !open(r, c) {
                continue;
            }
            if p > best {
                best = p;
                ties.clear();
            }
            if p == best {
                ties.push((r, c));
            }
        }
    }
    ties.choose(rng).copied()
}
