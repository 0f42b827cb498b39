//! Lightning simulation core
//!
//! A `Storm` owns the material grid, the four tunable parameters, the arc
//! scheduler and the random source. Front ends drive it with `advance` once
//! per frame and read the grid and arcs back for drawing.

mod arc;
mod branch;
mod error;
mod grid;
mod material;
mod params;
mod path;
mod scheduler;

pub use arc::{Arc, ArcKind};
pub use branch::{Branch, BranchGenerator, BRANCH_STEPS, MIN_BRANCH_LEN};
pub use error::StormError;
pub use grid::{Cell, Coord, MaterialGrid, FULL_CHARGE, MIN_STRIKE_CHARGE};
pub use material::{Material, MaterialProperties};
pub use params::{
    Parameter, StormParams, BREAKDOWN_THRESHOLD, DISCHARGE_RANGE, MAX_BURN_TRAIL, RANDOMNESS_RANGE,
};
pub use path::{Candidate, PathFinder, GRAVITY_BONUS};
pub use scheduler::{cloud_clusters, ArcScheduler, StrikeStats, CLUSTER_RADIUS};

use crate::config::StormConfig;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Fixed simulation step (seconds)
pub const TICK: f32 = 1.0 / 60.0;
/// Upper bound on catch-up ticks per `advance` call
const MAX_TICKS_PER_ADVANCE: u32 = 5;

pub struct Storm {
    grid: MaterialGrid,
    params: StormParams,
    scheduler: ArcScheduler,
    rng: SmallRng,
    seed: u64,
    tick_accum: f32,
}

impl Storm {
    /// Default layout; a missing seed is drawn at random and logged
    pub fn new(width: usize, height: usize, params: StormParams, seed: Option<u64>) -> Self {
        Self::with_grid(MaterialGrid::with_default_layout(width, height), params, seed)
    }

    pub fn with_grid(grid: MaterialGrid, params: StormParams, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        info!(
            width = grid.width(),
            height = grid.height(),
            seed,
            "storm created"
        );
        Self {
            grid,
            params: params.sanitized(),
            scheduler: ArcScheduler::new(),
            rng: SmallRng::seed_from_u64(seed),
            seed,
            tick_accum: 0.0,
        }
    }

    pub fn from_config(config: &StormConfig) -> Self {
        let mut storm = Self::new(
            config.grid_width,
            config.grid_height,
            config.params,
            config.rng_seed,
        );
        if config.auto_strike {
            storm.toggle_auto_strike();
        }
        storm
    }

    #[inline]
    pub fn grid(&self) -> &MaterialGrid {
        &self.grid
    }

    #[inline]
    pub fn arcs(&self) -> &[Arc] {
        self.scheduler.arcs()
    }

    #[inline]
    pub fn params(&self) -> &StormParams {
        &self.params
    }

    #[inline]
    pub fn stats(&self) -> StrikeStats {
        self.scheduler.stats()
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    #[inline]
    pub fn is_auto_striking(&self) -> bool {
        self.scheduler.is_auto_striking()
    }

    /// Simulated seconds since creation
    #[inline]
    pub fn clock(&self) -> f64 {
        self.scheduler.clock()
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn trigger_strike(&mut self) {
        self.scheduler
            .trigger_strike(&mut self.grid, &self.params, &mut self.rng);
    }

    pub fn multi_strike(&mut self) {
        self.scheduler
            .multi_strike(&mut self.grid, &self.params, &mut self.rng);
    }

    /// Wipe painted structures and active arcs. Clouds and ground stay.
    pub fn clear_grid(&mut self) {
        self.grid.clear();
        self.scheduler.clear_arcs();
        info!("grid cleared");
    }

    /// Back to the default layout with fresh statistics
    pub fn reset_simulation(&mut self) {
        self.grid = MaterialGrid::with_default_layout(self.grid.width(), self.grid.height());
        self.scheduler.reset();
        info!("simulation reset");
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.scheduler.toggle_pause();
        info!(paused, "pause toggled");
        paused
    }

    pub fn toggle_auto_strike(&mut self) -> bool {
        self.scheduler.toggle_auto_strike(&mut self.rng)
    }

    /// Clear, then lay out the lightning-rod showcase
    pub fn setup_demo(&mut self) {
        self.scheduler.clear_arcs();
        self.grid.seed_demo(&mut self.rng);
        info!("demo layout ready");
    }

    pub fn set_material(&mut self, x: usize, y: usize, material: Material) -> Result<(), StormError> {
        self.grid.set_material(x, y, material)
    }

    /// Brush stroke centred on (x, y); may hang off the grid
    pub fn paint(&mut self, x: isize, y: isize, material: Material) {
        self.grid.paint(x, y, material);
    }

    /// Set a parameter by name. The value is clamped to the parameter's range.
    pub fn set_parameter(&mut self, name: &str, value: f32) -> Result<(), StormError> {
        let param: Parameter = name.parse()?;
        self.params.set(param, value);
        debug!(?param, value = self.params.get(param), "parameter set");
        Ok(())
    }

    /// Nudge a parameter and return its clamped value
    pub fn adjust_parameter(&mut self, param: Parameter, delta: f32) -> f32 {
        let value = self.params.get(param) + delta;
        self.params.set(param, value);
        self.params.get(param)
    }

    /// One simulation tick of `dt` seconds, then one step of burn decay
    pub fn update(&mut self, dt: f32) {
        self.scheduler
            .tick(dt, &mut self.grid, &self.params, &mut self.rng);
        self.grid.decay_burn();
    }

    /// Feed wall-clock time; runs as many fixed `TICK`s as have accumulated.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.tick_accum += elapsed.max(0.0);

        let mut ticks = 0;
        while self.tick_accum >= TICK && ticks < MAX_TICKS_PER_ADVANCE {
            self.tick_accum -= TICK;
            self.update(TICK);
            ticks += 1;
        }

        // A long stall (window drag, debugger) should not replay as a burst
        if ticks >= MAX_TICKS_PER_ADVANCE {
            self.tick_accum = 0.0;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_storm() -> Storm {
        Storm::new(60, 40, StormParams::default(), Some(17))
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let mut storm = small_storm();
        assert_eq!(
            storm.set_parameter("voltage", 3.0),
            Err(StormError::UnknownParameter("voltage".into()))
        );
        storm.set_parameter("dischargeStrength", 50.0).unwrap();
        assert_eq!(storm.params().discharge_strength, 20.0);
        storm.set_parameter("burnTrails", 120.0).unwrap();
        assert_eq!(storm.params().burn_trail_duration, 120);
    }

    #[test]
    fn test_adjust_parameter_clamps() {
        let mut storm = small_storm();
        assert_eq!(storm.adjust_parameter(Parameter::ArcRandomness, 80.0), 100.0);
        assert_eq!(storm.adjust_parameter(Parameter::DischargeStrength, -30.0), 1.0);
    }

    #[test]
    fn test_clear_grid_drops_arcs_and_is_idempotent() {
        let mut storm = small_storm();
        storm.paint(30, 20, Material::Conductor);
        storm.trigger_strike();
        assert!(!storm.arcs().is_empty());

        storm.clear_grid();
        let once = storm.grid().clone();
        storm.clear_grid();
        assert_eq!(storm.grid(), &once);
        assert!(storm.arcs().is_empty());
        assert!(storm
            .grid()
            .cells()
            .iter()
            .all(|c| c.material != Material::Conductor));
    }

    #[test]
    fn test_reset_restores_layout_and_stats() {
        let mut storm = small_storm();
        storm.setup_demo();
        storm.trigger_strike();
        assert!(storm.stats().total_strikes > 0);

        storm.reset_simulation();
        assert_eq!(storm.grid(), &MaterialGrid::with_default_layout(60, 40));
        assert_eq!(storm.stats(), StrikeStats::default());
        assert!(storm.arcs().is_empty());
    }

    #[test]
    fn test_update_decays_burn_trails() {
        let mut storm = small_storm();
        storm.set_parameter("burnTrailDuration", 3.0).unwrap();
        storm.trigger_strike();
        let path = storm.arcs()[0].path.clone();
        for _ in 0..3 {
            storm.update(0.0);
        }
        for c in path {
            assert_eq!(storm.grid().get(c.x, c.y).unwrap().burn_time, 0);
        }
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut storm = small_storm();
        assert_eq!(storm.advance(TICK * 0.5), 0);
        assert_eq!(storm.advance(TICK * 0.6), 1);
        assert_eq!(storm.advance(TICK * 2.5), 2);
        // a stall is capped and forgotten
        assert_eq!(storm.advance(10.0), MAX_TICKS_PER_ADVANCE);
        assert_eq!(storm.advance(0.0), 0);
    }

    #[test]
    fn test_same_seed_same_storm() {
        let mut a = small_storm();
        let mut b = small_storm();
        for _ in 0..3 {
            a.trigger_strike();
            b.trigger_strike();
            for _ in 0..20 {
                a.update(TICK);
                b.update(TICK);
            }
        }
        assert_eq!(a.arcs(), b.arcs());
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_from_config_honors_auto_strike() {
        let config = StormConfig {
            grid_width: 30,
            grid_height: 20,
            rng_seed: Some(1),
            auto_strike: true,
            ..StormConfig::default()
        };
        let storm = Storm::from_config(&config);
        assert!(storm.is_auto_striking());
        assert_eq!(storm.grid().width(), 30);
        assert_eq!(storm.seed(), 1);
    }
}
