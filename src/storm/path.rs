//! Randomized best-first discharge search
//!
//! Not a shortest-path search: the frontier is ordered by the resistance of
//! each entry's cell (ties by arrival), neighbors are pushed in randomized
//! weight order, and the first path to pop a ground cell wins. Repeated
//! calls on the same grid give different bolts.

use super::{Coord, Material, MaterialGrid, StormError, StormParams};
use ordered_float::OrderedFloat;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Extra weight for stepping strictly downward
pub const GRAVITY_BONUS: f32 = 0.2;

/// A neighbor scored for the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub coord: Coord,
    pub weight: f32,
}

/// Frontier entry; `node` indexes the search arena
#[derive(Debug, PartialEq, Eq)]
struct Frontier {
    resistance: OrderedFloat<f32>,
    seq: u64,
    node: usize,
}

impl Ord for Frontier {
    // BinaryHeap is a max-heap: lowest resistance, then earliest arrival, pops first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .resistance
            .cmp(&self.resistance)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub struct PathFinder<'a> {
    grid: &'a MaterialGrid,
    params: &'a StormParams,
}

impl<'a> PathFinder<'a> {
    pub fn new(grid: &'a MaterialGrid, params: &'a StormParams) -> Self {
        Self { grid, params }
    }

    /// Score the in-bounds neighbors of `at`, best first.
    ///
    /// `weight = conductivity + U(0, randomness%) + gravity bonus`. Zero
    /// conductivity cells are left out unless the discharge breaks them down.
    /// Equal weights keep the fixed neighbor scan order.
    pub fn weighted_neighbors<R: Rng + ?Sized>(&self, at: Coord, rng: &mut R) -> Vec<Candidate> {
        let jitter = self.params.arc_randomness / 100.0;
        let breakdown = self.params.breaks_down_insulators();

        let mut candidates: Vec<Candidate> = self
            .grid
            .neighbors8(at.x, at.y)
            .filter_map(|n| {
                let conductivity = self.grid.at(n).material.conductivity();
                if conductivity == 0.0 && !breakdown {
                    return None;
                }
                let noise = if jitter > 0.0 {
                    rng.gen::<f32>() * jitter
                } else {
                    0.0
                };
                let gravity = if n.y > at.y { GRAVITY_BONUS } else { 0.0 };
                Some(Candidate {
                    coord: n,
                    weight: conductivity + noise + gravity,
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        candidates
    }

    /// Search from `start` to the first ground cell popped off the frontier.
    /// The returned path includes both endpoints.
    pub fn find<R: Rng + ?Sized>(&self, start: Coord, rng: &mut R) -> Result<Vec<Coord>, StormError> {
        self.grid.get(start.x, start.y)?;

        // (cell, parent node) arena; paths are rebuilt by walking parents
        let mut nodes: Vec<(Coord, Option<usize>)> = vec![(start, None)];
        let mut visited = vec![false; self.grid.cells().len()];
        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;

        frontier.push(Frontier {
            resistance: OrderedFloat(self.grid.at(start).material.resistance()),
            seq,
            node: 0,
        });

        while let Some(entry) = frontier.pop() {
            let (current, _) = nodes[entry.node];
            let idx = self.grid.flat_index(current);
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            if self.grid.at(current).material == Material::Ground {
                return Ok(Self::unwind(&nodes, entry.node));
            }

            for candidate in self.weighted_neighbors(current, rng) {
                if visited[self.grid.flat_index(candidate.coord)] {
                    continue;
                }
                seq += 1;
                nodes.push((candidate.coord, Some(entry.node)));
                frontier.push(Frontier {
                    resistance: OrderedFloat(self.grid.at(candidate.coord).material.resistance()),
                    seq,
                    node: nodes.len() - 1,
                });
            }
        }

        Err(StormError::NoPathFound)
    }

    fn unwind(nodes: &[(Coord, Option<usize>)], mut node: usize) -> Vec<Coord> {
        let mut path = Vec::new();
        loop {
            let (coord, parent) = nodes[node];
            path.push(coord);
            match parent {
                Some(p) => node = p,
                None => break,
            }
        }
        path.reverse();
        path
    }
}
