//! Decorative side branches grown off a main discharge path

use super::{Coord, Material, MaterialGrid, PathFinder, StormParams};
use rand::Rng;
use std::collections::HashSet;

/// Inclusive range for the per-branch step budget
pub const BRANCH_STEPS: (usize, usize) = (15, 40);
/// Branches shorter than this are not worth drawing
pub const MIN_BRANCH_LEN: usize = 5;
/// Pick uniformly among this many best candidates
const TOP_CHOICES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Point on the parent path the branch grows from
    pub root: Coord,
    /// Cells after the root, never on the parent path
    pub cells: Vec<Coord>,
}

impl Branch {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

pub struct BranchGenerator<'a> {
    grid: &'a MaterialGrid,
    finder: PathFinder<'a>,
}

impl<'a> BranchGenerator<'a> {
    pub fn new(grid: &'a MaterialGrid, params: &'a StormParams) -> Self {
        Self {
            grid,
            finder: PathFinder::new(grid, params),
        }
    }

    /// Random walk from `root`, steering clear of insulators and `main_path`.
    ///
    /// Each step picks one of the top three weighted neighbors so the branch
    /// wanders instead of shadowing the main bolt. Stops when boxed in, when
    /// the step budget runs out, or right after touching ground or a conductor.
    pub fn grow<R: Rng + ?Sized>(&self, root: Coord, main_path: &[Coord], rng: &mut R) -> Branch {
        let on_main: HashSet<Coord> = main_path.iter().copied().collect();
        let budget = rng.gen_range(BRANCH_STEPS.0..=BRANCH_STEPS.1);

        let mut cells = Vec::with_capacity(budget);
        let mut current = root;

        for _ in 0..budget {
            let options: Vec<Coord> = self
                .finder
                .weighted_neighbors(current, rng)
                .into_iter()
                .map(|c| c.coord)
                .filter(|c| self.grid.at(*c).material != Material::Insulator && !on_main.contains(c))
                .collect();

            if options.is_empty() {
                break;
            }

            current = options[rng.gen_range(0..options.len().min(TOP_CHOICES))];
            cells.push(current);

            if matches!(
                self.grid.at(current).material,
                Material::Ground | Material::Conductor
            ) {
                break;
            }
        }

        Branch { root, cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storm::Parameter;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn column_path(x: usize, height: usize) -> Vec<Coord> {
        (0..height).map(|y| Coord::new(x, y)).collect()
    }

    #[test]
    fn test_branch_never_touches_main_path() {
        let grid = MaterialGrid::new(30, 30);
        let main = column_path(15, 30);
        let mut params = StormParams::default();
        params.set(Parameter::ArcRandomness, 80.0);
        let generator = BranchGenerator::new(&grid, &params);

        for seed in 0..40 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let branch = generator.grow(Coord::new(15, 10), &main, &mut rng);
            assert!(branch.len() <= BRANCH_STEPS.1);
            assert!(!branch.is_empty());
            for c in &branch.cells {
                assert!(!main.contains(c), "seed {} stepped onto {:?}", seed, c);
            }
        }
    }

    #[test]
    fn test_branch_skips_insulators_even_under_breakdown() {
        let mut grid = MaterialGrid::new(12, 12);
        for y in 0..12 {
            grid.set_material(7, y, Material::Insulator).unwrap();
        }
        let main = column_path(5, 12);
        let mut params = StormParams::default();
        params.set(Parameter::DischargeStrength, 20.0);
        let generator = BranchGenerator::new(&grid, &params);

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let branch = generator.grow(Coord::new(5, 4), &main, &mut rng);
            // walled in between the main path and the insulator column
            assert!(branch.cells.iter().all(|c| c.x == 4 || c.x == 6 || c.x < 4));
            assert!(branch
                .cells
                .iter()
                .all(|c| grid.at(*c).material != Material::Insulator));
        }
    }

    #[test]
    fn test_branch_stops_on_conductor() {
        // the only cells next to the root are conductors
        let mut grid = MaterialGrid::new(3, 3);
        for (x, y) in [(0, 1), (2, 1), (0, 2), (1, 2), (2, 2), (0, 0), (2, 0)] {
            grid.set_material(x, y, Material::Conductor).unwrap();
        }
        let main = vec![Coord::new(1, 0), Coord::new(1, 1)];
        let params = StormParams::default();
        let mut rng = SmallRng::seed_from_u64(4);
        let branch = BranchGenerator::new(&grid, &params).grow(Coord::new(1, 1), &main, &mut rng);
        assert_eq!(branch.len(), 1);
        assert_eq!(grid.at(branch.cells[0]).material, Material::Conductor);
    }

    #[test]
    fn test_boxed_in_branch_is_empty() {
        let grid = MaterialGrid::new(1, 3);
        let main = column_path(0, 3);
        let params = StormParams::default();
        let mut rng = SmallRng::seed_from_u64(8);
        let branch = BranchGenerator::new(&grid, &params).grow(Coord::new(0, 1), &main, &mut rng);
        assert!(branch.is_empty());
        assert_eq!(branch.root, Coord::new(0, 1));
    }
}
