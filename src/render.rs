//! Software renderer: grid cells, burn trails and live arcs into a PixelBuffer

use crate::display::PixelBuffer;
use crate::storm::{Arc, ArcKind, Coord, Material, Storm};
use crate::util::lerp_color;

const BURN_HOT: (u8, u8, u8) = (255, 255, 100);
const BURN_COOL: (u8, u8, u8) = (100, 0, 0);

/// (color, half-width in pixels, strength) from outer halo to core
const STRIKE_LAYERS: [((u8, u8, u8), i32, f32); 3] = [
    ((100, 200, 255), 2, 0.4),
    ((0, 255, 255), 1, 0.8),
    ((255, 255, 255), 0, 1.0),
];
const BRANCH_LAYERS: [((u8, u8, u8), i32, f32); 2] =
    [((150, 200, 255), 1, 0.4), ((200, 230, 255), 0, 0.7)];

/// Maps between grid cells and screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StormView {
    pub cell_size: u32,
}

impl StormView {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: cell_size.max(1),
        }
    }

    /// Cell under a window pixel, None outside the grid
    pub fn cell_at(&self, storm: &Storm, px: i32, py: i32) -> Option<Coord> {
        if px < 0 || py < 0 {
            return None;
        }
        let x = px as usize / self.cell_size as usize;
        let y = py as usize / self.cell_size as usize;
        storm.grid().in_bounds(x, y).then_some(Coord::new(x, y))
    }

    /// Brush centre for a window pixel; may lie off the grid (negative or past the edge)
    pub fn brush_at(&self, px: i32, py: i32) -> (isize, isize) {
        let size = self.cell_size as i32;
        (px.div_euclid(size) as isize, py.div_euclid(size) as isize)
    }

    #[inline]
    fn center(&self, c: Coord) -> (i32, i32) {
        let half = (self.cell_size / 2) as i32;
        (
            (c.x as u32 * self.cell_size) as i32 + half,
            (c.y as u32 * self.cell_size) as i32 + half,
        )
    }

    /// Draw a full frame. `time` (seconds) only animates the cloud shimmer.
    pub fn render(&self, storm: &Storm, buffer: &mut PixelBuffer, time: f32) {
        buffer.clear(0, 0, 0);

        let grid = storm.grid();
        let size = self.cell_size;
        let burn_span = storm.params().burn_trail_duration.max(1) as f32;

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let Ok(cell) = grid.get(x, y) else {
                    continue;
                };
                let px = (x as u32 * size) as i32;
                let py = (y as u32 * size) as i32;

                let (r, g, b) = cell.material.properties().color;
                if cell.material == Material::Cloud {
                    let shimmer = 0.8 + 0.2 * (time + x as f32 * 0.1 + y as f32 * 0.1).sin();
                    buffer.fill_rect(
                        px,
                        py,
                        size,
                        size,
                        (r as f32 * shimmer) as u8,
                        (g as f32 * shimmer) as u8,
                        (b as f32 * shimmer) as u8,
                    );
                } else {
                    buffer.fill_rect(px, py, size, size, r, g, b);
                }

                if cell.burn_time > 0 {
                    let heat = (cell.burn_time as f32 / burn_span).min(1.0);
                    let (r, g, b) = lerp_color(BURN_COOL, BURN_HOT, heat);
                    buffer.fill_rect_blend(px, py, size, size, r, g, b, (heat * 230.0) as u8);
                }
            }
        }

        for arc in storm.arcs() {
            self.draw_arc(arc, buffer);
        }
    }

    fn draw_arc(&self, arc: &Arc, buffer: &mut PixelBuffer) {
        let fade = arc.fade() * 0.95;
        if fade <= 0.0 {
            return;
        }

        let layers: &[_] = match arc.kind {
            ArcKind::Strike => &STRIKE_LAYERS[..],
            ArcKind::Secondary => &BRANCH_LAYERS[..],
        };
        self.stroke(arc.path.iter().copied(), layers, fade, buffer);

        for branch in &arc.branches {
            let points = std::iter::once(branch.root).chain(branch.cells.iter().copied());
            self.stroke(points, &BRANCH_LAYERS, fade, buffer);
        }
    }

    /// Thick glowing polyline through cell centres
    fn stroke(
        &self,
        points: impl Iterator<Item = Coord> + Clone,
        layers: &[((u8, u8, u8), i32, f32)],
        fade: f32,
        buffer: &mut PixelBuffer,
    ) {
        for &((r, g, b), half_width, strength) in layers {
            let k = fade * strength;
            let (r, g, b) = (
                (r as f32 * k) as u8,
                (g as f32 * k) as u8,
                (b as f32 * k) as u8,
            );

            let mut prev: Option<(i32, i32)> = None;
            for c in points.clone() {
                let (x1, y1) = self.center(c);
                if let Some((x0, y0)) = prev {
                    for off in -half_width..=half_width {
                        buffer.line_additive(x0 + off, y0, x1 + off, y1, r, g, b);
                        if off != 0 {
                            buffer.line_additive(x0, y0 + off, x1, y1 + off, r, g, b);
                        }
                    }
                } else {
                    let span = (half_width * 2 + 1) as u32;
                    buffer.fill_rect_additive(x1 - half_width, y1 - half_width, span, span, r, g, b);
                }
                prev = Some((x1, y1));
            }
        }
    }
}
