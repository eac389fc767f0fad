//! A square bitboard whose side is chosen at runtime.
//!
//! Cells are packed row-major into a vector of unsigned words `T`. The board
//! side is fixed at construction; boards of different sides never combine.
//! Bitwise operators are provided on references so callers can mask boards
//! without cloning.

use core::ops::{BitAnd, BitOr, Not};
use core::{any, fmt, mem};
use num_traits::{PrimInt, Unsigned, Zero};
use thiserror::Error;

/// Errors returned by bitboard operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitBoardError {
    /// A board must have at least one cell.
    #[error("board side must be at least 1")]
    ZeroSize,
    /// Row or column index is out of bounds [0..size).
    #[error("index out of bounds: row={row}, col={col}")]
    IndexOutOfBounds { row: usize, col: usize },
}

/// A `size×size` bitboard stored in words of type `T`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitBoard<T = u64>
where
    T: PrimInt + Unsigned + Zero,
{
    size: usize,
    words: Vec<T>,
}

impl<T> BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    const WORD_BITS: usize = mem::size_of::<T>() * 8;

    /// Create an empty board with the given side.
    pub fn new(size: usize) -> Self {
        let cells = size * size;
        BitBoard {
            size,
            words: vec![T::zero(); cells.div_ceil(Self::WORD_BITS)],
        }
    }

    /// Fallible constructor: rejects a zero-sized board.
    pub fn try_new(size: usize) -> Result<Self, BitBoardError> {
        if size == 0 {
            Err(BitBoardError::ZeroSize)
        } else {
            Ok(Self::new(size))
        }
    }

    /// Creates a bitboard from an iterator over `(row, col)` positions.
    pub fn from_iter<I>(size: usize, iter: I) -> Result<Self, BitBoardError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut board = Self::new(size);
        for (r, c) in iter {
            board.set(r, c)?;
        }
        Ok(board)
    }

    /// Side of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells on the board.
    #[inline]
    pub fn cells(&self) -> usize {
        self.size * self.size
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns true if no bits are set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| w.is_zero())
    }

    /// True when `(row, col)` lies on the board.
    #[inline]
    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    /// Gets the bit at (row, col).
    pub fn get(&self, row: usize, col: usize) -> Result<bool, BitBoardError> {
        self.check_bounds(row, col)?;
        Ok(self.bit(row * self.size + col))
    }

    /// Like [`get`](Self::get) but reports off-board cells as unset.
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.in_bounds(row, col) && self.bit(row * self.size + col)
    }

    /// Sets the bit at (row, col) to 1.
    pub fn set(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        self.check_bounds(row, col)?;
        let idx = row * self.size + col;
        let (w, b) = (idx / Self::WORD_BITS, idx % Self::WORD_BITS);
        self.words[w] = self.words[w] | (T::one() << b);
        Ok(())
    }

    /// Clears the bit at (row, col) to 0.
    pub fn clear(&mut self, row: usize, col: usize) -> Result<(), BitBoardError> {
        self.check_bounds(row, col)?;
        let idx = row * self.size + col;
        let (w, b) = (idx / Self::WORD_BITS, idx % Self::WORD_BITS);
        self.words[w] = self.words[w] & !(T::one() << b);
        Ok(())
    }

    /// Iterator over the set bits of the board, row-major.
    #[inline]
    pub fn iter_set_bits(&self) -> SetBits<'_, T> {
        SetBits {
            board: self,
            idx: 0,
        }
    }

    #[inline]
    fn bit(&self, idx: usize) -> bool {
        let (w, b) = (idx / Self::WORD_BITS, idx % Self::WORD_BITS);
        ((self.words[w] >> b) & T::one()) != T::zero()
    }

    #[inline]
    fn check_bounds(&self, row: usize, col: usize) -> Result<(), BitBoardError> {
        if self.in_bounds(row, col) {
            Ok(())
        } else {
            Err(BitBoardError::IndexOutOfBounds { row, col })
        }
    }

    /// Clears the padding bits past the last cell.
    fn mask_tail(&mut self) {
        let used = self.cells() % Self::WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last = *last & ((T::one() << used) - T::one());
            }
        }
    }

    fn zip_with(&self, rhs: &Self, op: impl Fn(T, T) -> T) -> Self {
        debug_assert_eq!(self.size, rhs.size, "bitboard sides differ");
        BitBoard {
            size: self.size,
            words: self
                .words
                .iter()
                .zip(rhs.words.iter())
                .map(|(&a, &b)| op(a, b))
                .collect(),
        }
    }
}

impl<T> fmt::Debug for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BitBoard<{}, {}>:", any::type_name::<T>(), self.size)?;
        for r in 0..self.size {
            for c in 0..self.size {
                let bit = if self.contains(r, c) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T> fmt::Display for BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.size {
            for c in 0..self.size {
                let bit = if self.contains(r, c) { '■' } else { '□' };
                write!(f, "{} ", bit)?;
            }
            if r + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Iterator over the set bits of a bitboard.
#[derive(Clone, Copy)]
pub struct SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    board: &'a BitBoard<T>,
    idx: usize,
}

impl<'a, T> Iterator for SetBits<'a, T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Item = (usize, usize);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let n = self.board.size;
        while self.idx < n * n {
            let idx = self.idx;
            self.idx += 1;
            if self.board.bit(idx) {
                return Some((idx / n, idx % n));
            }
        }
        None
    }
}

/// Bitwise AND for intersecting two boards of the same side.
impl<'a, T> BitAnd for &'a BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitand(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a & b)
    }
}

/// Bitwise OR for combining two boards of the same side.
impl<'a, T> BitOr for &'a BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn bitor(self, rhs: Self) -> BitBoard<T> {
        self.zip_with(rhs, |a, b| a | b)
    }
}

/// Bitwise NOT, restricted to on-board cells.
impl<'a, T> Not for &'a BitBoard<T>
where
    T: PrimInt + Unsigned + Zero,
{
    type Output = BitBoard<T>;
    fn not(self) -> BitBoard<T> {
        let mut out = BitBoard {
            size: self.size,
            words: self.words.iter().map(|&w| !w).collect(),
        };
        out.mask_tail();
        out
    }
}
