//! Clusters of connected hits and the sunk-ship bookkeeping built on them.

use std::collections::BTreeMap;

use crate::common::Coord;
use crate::game::GuessBoard;
use crate::ship::ShipType;

use super::patterns::{self, ADJACENT};

/// Lengths of enemy ships not yet accounted for, with multiplicity.
#[derive(Debug, Clone, Default)]
pub struct ShipCounter(BTreeMap<usize, usize>);

impl ShipCounter {
    pub fn from_fleet(fleet: &[ShipType]) -> Self {
        let mut counts = BTreeMap::new();
        for def in fleet {
            *counts.entry(def.length()).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Remove one ship of `length`. Returns `false` if none is left.
    pub fn take(&mut self, length: usize) -> bool {
        match self.0.get_mut(&length) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Shortest length still unaccounted for.
    pub fn min_length(&self) -> Option<usize> {
        self.0.iter().find(|(_, &n)| n > 0).map(|(&len, _)| len)
    }
}

/// Line a group of hits lies on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Row(usize),
    Col(usize),
}

/// Hits partitioned into orthogonally connected groups. Each group is kept
/// sorted so candidate order never depends on insertion order.
#[derive(Debug, Clone, Default)]
pub struct HitGroups {
    groups: Vec<Vec<Coord>>,
}

impl HitGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Add a hit, merging every group it touches into one new group at the
    /// end of the list.
    pub fn add_hit(&mut self, (r, c): Coord) {
        let touching: Vec<usize> = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, g)| g.iter().any(|&(gr, gc)| r.abs_diff(gr) + c.abs_diff(gc) == 1))
            .map(|(i, _)| i)
            .collect();
        let mut merged = vec![(r, c)];
        for &i in touching.iter().rev() {
            merged.extend(self.groups.remove(i));
        }
        merged.sort_unstable();
        merged.dedup();
        self.groups.push(merged);
    }

    /// Groups ordered by size, smallest first. Equal sizes keep their order.
    pub fn by_size(&self) -> Vec<&[Coord]> {
        let mut ordered: Vec<&[Coord]> = self.groups.iter().map(Vec::as_slice).collect();
        ordered.sort_by_key(|g| g.len());
        ordered
    }

    /// Drop every group with no unfired candidate left whose size matches a
    /// ship still in `remaining`; that ship is assumed sunk.
    pub fn retire_boxed_in<F>(&mut self, view: &GuessBoard, remaining: &mut ShipCounter, candidates: F)
    where
        F: Fn(&[Coord]) -> Vec<Coord>,
    {
        self.groups.retain(|group| {
            let boxed_in = !candidates(group)
                .into_iter()
                .any(|(r, c)| view.is_unfired(r, c));
            !(boxed_in && remaining.take(group.len()))
        });
    }
}

/// Row or column shared by every cell of a multi-cell group.
pub fn line_of(group: &[Coord]) -> Option<Line> {
    let (r0, c0) = *group.first()?;
    if group.len() < 2 {
        return None;
    }
    if group.iter().all(|&(r, _)| r == r0) {
        Some(Line::Row(r0))
    } else if group.iter().all(|&(_, c)| c == c0) {
        Some(Line::Col(c0))
    } else {
        None
    }
}

/// Candidates along a line group: the gaps between its extremes (when
/// `fill_gaps`), then the cell past each end.
pub fn line_candidates(size: usize, group: &[Coord], line: Line, fill_gaps: bool) -> Vec<Coord> {
    let along = |&(r, c): &Coord| match line {
        Line::Row(_) => c,
        Line::Col(_) => r,
    };
    let cell = |i: usize| match line {
        Line::Row(r) => (r, i),
        Line::Col(c) => (i, c),
    };
    let lo = group.iter().map(along).min().unwrap_or(0);
    let hi = group.iter().map(along).max().unwrap_or(0);

    let mut out = Vec::new();
    if fill_gaps {
        out.extend((lo + 1..hi).map(cell).filter(|p| !group.contains(p)));
    }
    if lo > 0 {
        out.push(cell(lo - 1));
    }
    if hi + 1 < size {
        out.push(cell(hi + 1));
    }
    out
}

/// Orthogonal neighbours of every hit in the group that are not themselves
/// part of it.
pub fn group_neighbours(size: usize, group: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = group
        .iter()
        .flat_map(|&hit| patterns::around(size, hit, &ADJACENT))
        .filter(|p| !group.contains(p))
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Whether a ship of `length` could still cover `(r, c)` given the cells
/// already fired at.
pub fn has_room(view: &GuessBoard, (r, c): Coord, length: usize) -> bool {
    let run = |dr: isize, dc: isize| {
        (1..length)
            .take_while(|&i| {
                let step = (dr * i as isize, dc * i as isize);
                patterns::offset(view.size(), (r, c), step)
                    .is_some_and(|(rr, cc)| view.is_unfired(rr, cc))
            })
            .count()
    };
    1 + run(0, -1) + run(0, 1) >= length || 1 + run(-1, 0) + run(1, 0) >= length
}
