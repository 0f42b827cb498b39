use super::{Branch, Coord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// Full cloud-to-ground discharge
    Strike,
    /// Short two-cell flicker off an earlier strike
    Secondary,
}

/// One visible discharge. Only the scheduler ages and evicts arcs.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub kind: ArcKind,
    pub path: Vec<Coord>,
    pub branches: Vec<Branch>,
    pub intensity: f32,
    /// Ticks on screen
    pub lifetime: u32,
    /// Ticks elapsed, starts at 0
    pub age: u32,
}

impl Arc {
    pub fn strike(path: Vec<Coord>, intensity: f32, lifetime: u32) -> Self {
        Self {
            kind: ArcKind::Strike,
            path,
            branches: Vec::new(),
            intensity,
            lifetime,
            age: 0,
        }
    }

    pub fn secondary(from: Coord, to: Coord, intensity: f32, lifetime: u32) -> Self {
        Self {
            kind: ArcKind::Secondary,
            path: vec![from, to],
            branches: Vec::new(),
            intensity,
            lifetime,
            age: 0,
        }
    }

    /// `age / lifetime` in 0..=1
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.lifetime == 0 {
            return 1.0;
        }
        (self.age as f32 / self.lifetime as f32).min(1.0)
    }

    /// Brightness multiplier for renderers: 1 when fresh, 0 when expired
    #[inline]
    pub fn fade(&self) -> f32 {
        1.0 - self.progress()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Advance one tick; returns whether the arc is still alive
    pub(crate) fn tick(&mut self) -> bool {
        self.age += 1;
        !self.is_expired()
    }
}
