//! Material grid
//!
//! Flat `y * width + x` array of plain cells. The grid owns no simulation
//! logic beyond storage, neighbor lookup and burn decay.

use super::{Material, StormError};
use rand::Rng;

/// Charge given to freshly painted cloud cells
pub const FULL_CHARGE: f32 = 100.0;
/// Clouds at or below this charge never strike
pub const MIN_STRIKE_CHARGE: f32 = 50.0;

const CLOUD_BANKS: usize = 3;
const CLOUD_ROWS: usize = 3;
const CLOUD_HALF_WIDTH: isize = 8;
const GROUND_ROWS: usize = 2;

/// Neighbor scan order; ties in weighted selection keep this order
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Grid coordinate, `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn manhattan(&self, other: &Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    pub material: Material,
    /// 0-100, only nonzero on clouds
    pub charge: f32,
    /// Remaining burn-trail ticks
    pub burn_time: u32,
    /// Clock time (seconds) of the last discharge through this cell
    pub last_arc_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MaterialGrid {
    /// All-air grid. Dimensions are raised to at least 1x1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Air grid with three cloud banks along the top and ground along the bottom
    pub fn with_default_layout(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        grid.add_default_clouds();
        grid.add_default_ground();
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, StormError> {
        if self.in_bounds(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(StormError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&Cell, StormError> {
        let idx = self.index(x, y)?;
        Ok(&self.cells[idx])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Result<&mut Cell, StormError> {
        let idx = self.index(x, y)?;
        Ok(&mut self.cells[idx])
    }

    /// Unchecked-by-signature access for coordinates produced by this grid.
    /// Panics on a foreign out-of-bounds coordinate.
    #[inline]
    pub(crate) fn at(&self, c: Coord) -> &Cell {
        debug_assert!(self.in_bounds(c.x, c.y));
        &self.cells[c.y * self.width + c.x]
    }

    #[inline]
    pub(crate) fn flat_index(&self, c: Coord) -> usize {
        c.y * self.width + c.x
    }

    /// Overwrite a cell's material. Clouds get a full charge, everything else none.
    pub fn set_material(&mut self, x: usize, y: usize, material: Material) -> Result<(), StormError> {
        let cell = self.get_mut(x, y)?;
        cell.material = material;
        cell.charge = if material == Material::Cloud {
            FULL_CHARGE
        } else {
            0.0
        };
        Ok(())
    }

    /// Circular brush centred on (cx, cy); cells off the grid are skipped
    pub fn paint(&mut self, cx: isize, cy: isize, material: Material) {
        let radius = material.brush_thickness() / 2;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (x, y) = (cx + dx as isize, cy + dy as isize);
                if x < 0 || y < 0 {
                    continue;
                }
                // Off-grid cells are simply not painted
                let _ = self.set_material(x as usize, y as usize, material);
            }
        }
    }

    /// Reset every non-ground, non-cloud cell to bare air. Idempotent.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| !c.material.is_fixture()) {
            cell.material = Material::Air;
            cell.charge = 0.0;
            cell.burn_time = 0;
        }
    }

    /// In-bounds 8-neighborhood of (x, y), no wrap-around
    pub fn neighbors8(&self, x: usize, y: usize) -> impl Iterator<Item = Coord> + '_ {
        DIRECTIONS.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;
            self.in_bounds(nx, ny).then_some(Coord::new(nx, ny))
        })
    }

    /// One tick of burn-trail decay
    pub fn decay_burn(&mut self) {
        for cell in &mut self.cells {
            cell.burn_time = cell.burn_time.saturating_sub(1);
        }
    }

    /// Mark a discharge through `c`
    pub(crate) fn burn(&mut self, c: Coord, duration: u32, time: f64) {
        let idx = self.flat_index(c);
        let cell = &mut self.cells[idx];
        cell.burn_time = duration;
        cell.last_arc_time = time;
    }

    /// Cloud cells holding enough charge to strike, in row-major order
    pub fn charged_clouds(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.material == Material::Cloud && c.charge > MIN_STRIKE_CHARGE)
            .map(|(i, _)| Coord::new(i % self.width, i / self.width))
            .collect()
    }

    fn add_default_clouds(&mut self) {
        let spacing = (self.width / (CLOUD_BANKS + 1)) as isize;
        for bank in 1..=CLOUD_BANKS as isize {
            let center = bank * spacing;
            for y in 0..CLOUD_ROWS.min(self.height) {
                for x in (center - CLOUD_HALF_WIDTH)..(center + CLOUD_HALF_WIDTH) {
                    if x >= 0 {
                        let _ = self.set_material(x as usize, y, Material::Cloud);
                    }
                }
            }
        }
    }

    fn add_default_ground(&mut self) {
        let first = self.height.saturating_sub(GROUND_ROWS);
        for y in first..self.height {
            for x in 0..self.width {
                let _ = self.set_material(x, y, Material::Ground);
            }
        }
    }

    /// Paint over anything except clouds and ground
    fn paint_structure(&mut self, x: isize, y: isize, material: Material) {
        if x < 0 || y < 0 {
            return;
        }
        if let Ok(cell) = self.get(x as usize, y as usize) {
            if !cell.material.is_fixture() {
                let _ = self.set_material(x as usize, y as usize, material);
            }
        }
    }

    /// Lightning-rod showcase: three rods, insulator barriers, scattered
    /// semiconductors and a buried conductor line. Clears first.
    pub fn seed_demo<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.clear();

        let w = self.width as isize;
        let h = self.height as isize;
        let mid_x = w / 2;
        let mid_y = h / 2;

        for rod_x in [mid_x - 40, mid_x, mid_x + 40] {
            if rod_x < 0 || rod_x >= w {
                continue;
            }
            for y in (mid_y - 10)..(h - 10) {
                self.paint_structure(rod_x, y, Material::Conductor);
            }
            for dy in -1..=1 {
                for dx in -1..=1 {
                    self.paint_structure(rod_x + dx, mid_y - 10 + dy, Material::Conductor);
                }
            }
        }

        // (x, y, width, height)
        let barriers = [
            (mid_x - 20, mid_y + 15, 15, 3),
            (mid_x + 5, mid_y + 25, 15, 3),
            (mid_x - 30, mid_y + 35, 20, 2),
        ];
        for (bx, by, bw, bh) in barriers {
            for y in by..by + bh {
                for x in bx..bx + bw {
                    self.paint_structure(x, y, Material::Insulator);
                }
            }
        }

        let span = (h - mid_y - 30).max(0) as f32;
        for _ in 0..50 {
            let x = rng.gen_range(0..self.width);
            let y = (mid_y as f32 + 20.0 + rng.gen::<f32>() * span) as isize;
            if y < h - 5 {
                if let Ok(cell) = self.get(x, y as usize) {
                    if cell.material == Material::Air {
                        let _ = self.set_material(x, y as usize, Material::Semiconductor);
                    }
                }
            }
        }

        let buried = h - 8;
        for x in 10..(w - 10) {
            if rng.gen::<f32>() < 0.7 {
                self.paint_structure(x, buried, Material::Conductor);
            }
        }
    }
}
