//! Strike orchestration
//!
//! Turns triggers into timed arcs. Everything that the UI would express as
//! "do this a little later" (staggered strikes, multi-strike bursts,
//! secondary flickers, auto strike) goes through one task queue that is
//! drained on each tick. A queued task re-checks the pause flag and the
//! grid when it finally runs, so a clear or repaint in between just turns
//! it into a no-op.

use super::{
    Arc, BranchGenerator, Coord, Material, MaterialGrid, PathFinder, StormError, StormParams,
    MIN_BRANCH_LEN, MIN_STRIKE_CHARGE,
};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info};

/// Cloud cells closer than this (Manhattan) belong to the same formation
pub const CLUSTER_RADIUS: usize = 15;

const FULL_PROBABILITY_STRENGTH: f32 = 15.0;
const EXTRA_STRIKE_FLOOR: f32 = 12.0;
const EXTRA_STRIKE_STEP: f32 = 4.0;
const STRIKE_STAGGER: f64 = 0.05; // seconds between strikes of one trigger

const STRIKE_LIFETIME: (u32, u32) = (15, 25);
const BRANCH_CHANCE: f32 = 0.7;
const BRANCH_MIN_PATH: usize = 10;
const BRANCH_ROOT_SPAN: (f32, f32) = (0.3, 0.7);

const SECONDARY_CHANCE: f32 = 0.3;
const SECONDARY_LIFETIME: u32 = 8;
const SECONDARY_INTENSITY: f32 = 0.3;
const SECONDARY_SETTLE: f64 = 0.1;
const SECONDARY_DELAY: (f64, f64) = (0.1, 0.3);

const MULTI_STRIKES: (usize, usize) = (3, 7);
const MULTI_SPACING: (f64, f64) = (0.1, 0.3);
const AUTO_INTERVAL: (f64, f64) = (0.8, 2.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrikeStats {
    pub total_strikes: u64,
    pub last_strike_length: usize,
    pub last_branches: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Task {
    /// Discharge from one cloud; `lead` strikes update the stats
    Strike {
        origin: Coord,
        trigger: u64,
        lead: bool,
    },
    /// Full trigger (queued by multi-strike)
    Trigger,
    /// Flickers off the paths a trigger produced
    SecondaryArcs { trigger: u64 },
}

#[derive(Debug, Clone)]
struct Pending {
    due: f64,
    task: Task,
}

#[derive(Debug, Clone, Copy)]
struct AutoStrike {
    interval: f64,
    next: f64,
}

/// Group charged clouds into formations and return one origin per formation:
/// its lowest cell (largest y, leftmost on ties). Formations come out in
/// row-major order of their first cell.
pub fn cloud_clusters(grid: &MaterialGrid) -> Vec<Coord> {
    let clouds = grid.charged_clouds();
    let mut grouped = vec![false; clouds.len()];
    let mut origins = Vec::new();

    for seed in 0..clouds.len() {
        if grouped[seed] {
            continue;
        }
        grouped[seed] = true;
        let mut stack = vec![seed];
        let mut lowest = clouds[seed];

        while let Some(i) = stack.pop() {
            let here = clouds[i];
            if here.y > lowest.y || (here.y == lowest.y && here.x < lowest.x) {
                lowest = here;
            }
            for (j, other) in clouds.iter().enumerate() {
                if !grouped[j] && here.manhattan(other) < CLUSTER_RADIUS {
                    grouped[j] = true;
                    stack.push(j);
                }
            }
        }
        origins.push(lowest);
    }

    origins
}

/// Owns the active arcs and the deferred-task queue
#[derive(Debug)]
pub struct ArcScheduler {
    arcs: Vec<Arc>,
    pending: VecDeque<Pending>,
    /// Seconds; f64 so long uptimes keep sub-tick resolution
    clock: f64,
    paused: bool,
    auto: Option<AutoStrike>,
    next_trigger: u64,
    strike_log: Vec<(u64, Vec<Coord>)>,
    stats: StrikeStats,
}

impl ArcScheduler {
    pub fn new() -> Self {
        Self {
            arcs: Vec::new(),
            pending: VecDeque::new(),
            clock: 0.0,
            paused: false,
            auto: None,
            next_trigger: 0,
            strike_log: Vec::new(),
            stats: StrikeStats::default(),
        }
    }

    #[inline]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    #[inline]
    pub fn stats(&self) -> StrikeStats {
        self.stats
    }

    /// Seconds of simulated time
    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[inline]
    pub fn is_auto_striking(&self) -> bool {
        self.auto.is_some()
    }

    /// Queued tasks not yet run
    #[inline]
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Flip the pause flag. Pausing also stops auto strike.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        if self.paused && self.auto.take().is_some() {
            info!("auto strike stopped by pause");
        }
        self.paused
    }

    /// Start or stop periodic triggering; the period is rolled once per start
    pub fn toggle_auto_strike<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.auto.take().is_some() || self.paused {
            return false;
        }
        let interval = rng.gen_range(AUTO_INTERVAL.0..AUTO_INTERVAL.1);
        info!(interval, "auto strike started");
        self.auto = Some(AutoStrike {
            interval,
            next: self.clock + interval,
        });
        true
    }

    /// Drop every active arc (queued work is left to fend for itself)
    pub fn clear_arcs(&mut self) {
        self.arcs.clear();
        self.strike_log.clear();
    }

    pub fn reset(&mut self) {
        self.clear_arcs();
        self.stats = StrikeStats::default();
    }

    /// One discharge event: every cloud formation gets a chance to strike.
    /// Silently does nothing when paused or when there are no clouds.
    pub fn trigger_strike<R: Rng + ?Sized>(
        &mut self,
        grid: &mut MaterialGrid,
        params: &StormParams,
        rng: &mut R,
    ) {
        self.plan_strikes(grid, params, rng);
        self.run_due(grid, params, rng);
    }

    /// A burst of 3-7 triggers spread over the next second or so
    pub fn multi_strike<R: Rng + ?Sized>(
        &mut self,
        grid: &mut MaterialGrid,
        params: &StormParams,
        rng: &mut R,
    ) {
        if self.paused {
            return;
        }
        let count = rng.gen_range(MULTI_STRIKES.0..=MULTI_STRIKES.1);
        for i in 0..count {
            let spacing = rng.gen_range(MULTI_SPACING.0..MULTI_SPACING.1);
            self.schedule(self.clock + i as f64 * spacing, Task::Trigger);
        }
        debug!(count, "multi strike queued");
        self.run_due(grid, params, rng);
    }

    /// Advance the clock by `dt` seconds: fire auto strike, age every live
    /// arc by one tick and evict the expired ones, then run due tasks. Arcs
    /// born during this tick are first seen at age 0.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        grid: &mut MaterialGrid,
        params: &StormParams,
        rng: &mut R,
    ) {
        self.clock += f64::from(dt);

        if let Some(auto) = self.auto.as_mut() {
            if self.clock >= auto.next {
                auto.next += auto.interval;
                if auto.next <= self.clock {
                    auto.next = self.clock + auto.interval;
                }
                self.schedule(self.clock, Task::Trigger);
            }
        }

        self.arcs.retain_mut(Arc::tick);
        self.run_due(grid, params, rng);
    }

    /// Insert keeping `pending` ordered by due time, FIFO among equals
    fn schedule(&mut self, due: f64, task: Task) {
        let at = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(at, Pending { due, task });
    }

    fn run_due<R: Rng + ?Sized>(&mut self, grid: &mut MaterialGrid, params: &StormParams, rng: &mut R) {
        while self.pending.front().is_some_and(|p| p.due <= self.clock) {
            let Some(Pending { task, .. }) = self.pending.pop_front() else {
                break;
            };

            if self.paused {
                debug!(?task, "paused, dropping task");
                if let Task::SecondaryArcs { trigger } = task {
                    self.strike_log.retain(|(t, _)| *t != trigger);
                }
                continue;
            }

            match task {
                Task::Strike {
                    origin,
                    trigger,
                    lead,
                } => self.strike(origin, trigger, lead, grid, params, rng),
                Task::Trigger => self.plan_strikes(grid, params, rng),
                Task::SecondaryArcs { trigger } => self.secondary_arcs(trigger, grid, params, rng),
            }
        }
    }

    /// Pick origins for one trigger and queue their strikes
    fn plan_strikes<R: Rng + ?Sized>(&mut self, grid: &MaterialGrid, params: &StormParams, rng: &mut R) {
        if self.paused {
            return;
        }

        let origins = cloud_clusters(grid);
        if origins.is_empty() {
            debug!("no charged clouds, nothing to strike");
            return;
        }

        let strength = params.discharge_strength;
        let chance = (strength / FULL_PROBABILITY_STRENGTH).min(1.0);
        let mut selected = Vec::with_capacity(origins.len());
        for origin in &origins {
            if rng.gen::<f32>() < chance || selected.is_empty() {
                selected.push(*origin);
            }
        }

        if strength > EXTRA_STRIKE_FLOOR {
            let extra = ((strength - EXTRA_STRIKE_FLOOR) / EXTRA_STRIKE_STEP).floor() as usize;
            for _ in 0..extra {
                selected.push(origins[rng.gen_range(0..origins.len())]);
            }
        }

        let trigger = self.next_trigger;
        self.next_trigger += 1;

        for (i, origin) in selected.iter().enumerate() {
            self.schedule(
                self.clock + i as f64 * STRIKE_STAGGER,
                Task::Strike {
                    origin: *origin,
                    trigger,
                    lead: i == 0,
                },
            );
        }

        let settle = selected.len() as f64 * STRIKE_STAGGER
            + SECONDARY_SETTLE
            + rng.gen_range(SECONDARY_DELAY.0..SECONDARY_DELAY.1);
        self.schedule(self.clock + settle, Task::SecondaryArcs { trigger });

        debug!(
            trigger,
            formations = origins.len(),
            strikes = selected.len(),
            "strike planned"
        );
    }

    fn strike<R: Rng + ?Sized>(
        &mut self,
        origin: Coord,
        trigger: u64,
        lead: bool,
        grid: &mut MaterialGrid,
        params: &StormParams,
        rng: &mut R,
    ) {
        // The grid may have been repainted since this strike was queued
        let still_charged = grid
            .get(origin.x, origin.y)
            .is_ok_and(|c| c.material == Material::Cloud && c.charge > MIN_STRIKE_CHARGE);
        if !still_charged {
            debug!(?origin, "origin is no longer a charged cloud");
            return;
        }

        let path = match PathFinder::new(grid, params).find(origin, rng) {
            Ok(path) => path,
            Err(StormError::NoPathFound) => {
                debug!(?origin, "no path to ground");
                return;
            },
            Err(e) => {
                debug!(?origin, error = %e, "strike abandoned");
                return;
            },
        };

        let lifetime = rng.gen_range(STRIKE_LIFETIME.0..=STRIKE_LIFETIME.1);
        let mut arc = Arc::strike(path.clone(), params.discharge_strength, lifetime);

        if path.len() > BRANCH_MIN_PATH && rng.gen::<f32>() < BRANCH_CHANCE {
            let at = (path.len() as f32 * rng.gen_range(BRANCH_ROOT_SPAN.0..BRANCH_ROOT_SPAN.1))
                as usize;
            let branch = BranchGenerator::new(grid, params).grow(path[at], &path, rng);
            if branch.len() >= MIN_BRANCH_LEN {
                arc.branches.push(branch);
            }
        }

        for cell in &path {
            grid.burn(*cell, params.burn_trail_duration, self.clock);
        }

        if lead {
            self.stats.total_strikes += 1;
            self.stats.last_strike_length = path.len();
            self.stats.last_branches = arc.branches.len();
            info!(
                total = self.stats.total_strikes,
                length = path.len(),
                branches = arc.branches.len(),
                "strike"
            );
        }

        self.strike_log.push((trigger, path));
        self.arcs.push(arc);
    }

    fn secondary_arcs<R: Rng + ?Sized>(
        &mut self,
        trigger: u64,
        grid: &MaterialGrid,
        params: &StormParams,
        rng: &mut R,
    ) {
        let (paths, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.strike_log)
            .into_iter()
            .partition(|(t, _)| *t == trigger);
        self.strike_log = rest;

        let finder = PathFinder::new(grid, params);
        for (_, path) in paths {
            if path.is_empty() || rng.gen::<f32>() >= SECONDARY_CHANCE {
                continue;
            }
            let from = path[rng.gen_range(0..path.len())];
            if !grid.in_bounds(from.x, from.y) {
                continue;
            }
            let target = finder
                .weighted_neighbors(from, rng)
                .into_iter()
                .find(|c| grid.at(c.coord).material.conductivity() > params.conductivity_threshold);
            if let Some(target) = target {
                self.arcs.push(Arc::secondary(
                    from,
                    target.coord,
                    params.discharge_strength * SECONDARY_INTENSITY,
                    SECONDARY_LIFETIME,
                ));
            }
        }
    }
}

impl Default for ArcScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storm::{ArcKind, Parameter};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params(strength: f32, randomness: f32) -> StormParams {
        let mut p = StormParams::default();
        p.set(Parameter::DischargeStrength, strength);
        p.set(Parameter::ArcRandomness, randomness);
        p
    }

    /// Cloud row on top, air in the middle, ground row at the bottom
    fn three_by_three() -> MaterialGrid {
        let mut grid = MaterialGrid::new(3, 3);
        for x in 0..3 {
            grid.set_material(x, 0, Material::Cloud).unwrap();
            grid.set_material(x, 2, Material::Ground).unwrap();
        }
        grid
    }

    #[test]
    fn test_clusters_split_distant_formations() {
        let mut grid = MaterialGrid::new(80, 20);
        for x in 2..6 {
            grid.set_material(x, 1, Material::Cloud).unwrap();
        }
        grid.set_material(4, 2, Material::Cloud).unwrap();
        for x in 60..70 {
            grid.set_material(x, 0, Material::Cloud).unwrap();
        }
        assert_eq!(
            cloud_clusters(&grid),
            vec![Coord::new(60, 0), Coord::new(4, 2)]
        );
    }

    #[test]
    fn test_clusters_chain_transitively() {
        let mut grid = MaterialGrid::new(40, 5);
        for x in [0, 10, 20, 30] {
            grid.set_material(x, 0, Material::Cloud).unwrap();
        }
        grid.set_material(30, 1, Material::Cloud).unwrap();
        assert_eq!(cloud_clusters(&grid), vec![Coord::new(30, 1)]);
    }

    #[test]
    fn test_weak_clouds_do_not_strike() {
        let mut grid = three_by_three();
        for x in 0..3 {
            grid.get_mut(x, 0).unwrap().charge = MIN_STRIKE_CHARGE;
        }
        assert!(cloud_clusters(&grid).is_empty());
    }

    #[test]
    fn test_no_ground_never_strikes() {
        let mut rng = SmallRng::seed_from_u64(1);
        for (w, h) in [(1, 1), (3, 3), (10, 7)] {
            let mut grid = MaterialGrid::new(w, h);
            grid.set_material(0, 0, Material::Cloud).unwrap();
            let p = params(20.0, 50.0);
            let mut scheduler = ArcScheduler::new();
            for _ in 0..5 {
                scheduler.trigger_strike(&mut grid, &p, &mut rng);
                for _ in 0..30 {
                    scheduler.tick(0.02, &mut grid, &p, &mut rng);
                }
            }
            assert!(scheduler.arcs().is_empty());
            assert_eq!(scheduler.stats().total_strikes, 0);
        }
    }

    #[test]
    fn test_three_by_three_single_arc() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scheduler = ArcScheduler::new();

        scheduler.trigger_strike(&mut grid, &p, &mut rng);

        assert_eq!(scheduler.arcs().len(), 1);
        let arc = &scheduler.arcs()[0];
        assert_eq!(arc.kind, ArcKind::Strike);
        assert_eq!(arc.path.len(), 3);
        assert_eq!(arc.path[1], Coord::new(arc.path[0].x, 1));
        assert!(arc.branches.is_empty());
        assert_eq!(arc.intensity, 10.0);
        assert!((15..=25).contains(&arc.lifetime));

        let stats = scheduler.stats();
        assert_eq!(stats.total_strikes, 1);
        assert_eq!(stats.last_strike_length, 3);
    }

    #[test]
    fn test_strike_burns_its_path() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut scheduler = ArcScheduler::new();
        scheduler.trigger_strike(&mut grid, &p, &mut rng);

        let path = scheduler.arcs()[0].path.clone();
        for y in 0..3 {
            for x in 0..3 {
                let burn = grid.get(x, y).unwrap().burn_time;
                if path.contains(&Coord::new(x, y)) {
                    assert_eq!(burn, p.burn_trail_duration);
                } else {
                    assert_eq!(burn, 0);
                }
            }
        }
    }

    #[test]
    fn test_arc_lifecycle() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(9);
        let mut scheduler = ArcScheduler::new();
        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        let lifetime = scheduler.arcs()[0].lifetime;

        // zero-length ticks never make queued work due
        for expected_age in 1..lifetime {
            scheduler.tick(0.0, &mut grid, &p, &mut rng);
            assert_eq!(scheduler.arcs().len(), 1);
            assert_eq!(scheduler.arcs()[0].age, expected_age);
        }
        scheduler.tick(0.0, &mut grid, &p, &mut rng);
        assert!(scheduler.arcs().is_empty());
    }

    #[test]
    fn test_extra_strikes_are_staggered() {
        let mut grid = three_by_three();
        let p = params(20.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler = ArcScheduler::new();

        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        // one formation plus floor((20 - 12) / 4) extras; secondary task queued last
        assert_eq!(scheduler.arcs().len(), 1);
        assert_eq!(scheduler.pending_tasks(), 3);

        scheduler.tick(0.11, &mut grid, &p, &mut rng);
        assert_eq!(scheduler.arcs().len(), 3);
        assert_eq!(scheduler.pending_tasks(), 1);
        assert_eq!(scheduler.stats().total_strikes, 1);
    }

    #[test]
    fn test_pause_blocks_triggers_and_drops_queued_work() {
        let mut grid = three_by_three();
        let p = params(20.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler = ArcScheduler::new();

        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        assert!(scheduler.toggle_pause());
        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        scheduler.multi_strike(&mut grid, &p, &mut rng);
        scheduler.tick(1.0, &mut grid, &p, &mut rng);

        assert_eq!(scheduler.arcs().len(), 1);
        assert_eq!(scheduler.pending_tasks(), 0);

        assert!(!scheduler.toggle_pause());
        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        assert_eq!(scheduler.arcs().len(), 2);
    }

    #[test]
    fn test_repainted_origin_cancels_queued_strikes() {
        let mut grid = three_by_three();
        let p = params(20.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler = ArcScheduler::new();

        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        for x in 0..3 {
            grid.set_material(x, 0, Material::Air).unwrap();
        }
        scheduler.tick(0.11, &mut grid, &p, &mut rng);
        assert_eq!(scheduler.arcs().len(), 1);
    }

    #[test]
    fn test_multi_strike_fires_three_to_seven_triggers() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(77);
        let mut scheduler = ArcScheduler::new();

        scheduler.multi_strike(&mut grid, &p, &mut rng);
        assert_eq!(scheduler.stats().total_strikes, 1);
        for _ in 0..60 {
            scheduler.tick(0.05, &mut grid, &p, &mut rng);
        }
        let total = scheduler.stats().total_strikes;
        assert!((3..=7).contains(&total), "got {} triggers", total);
        assert_eq!(scheduler.pending_tasks(), 0);
    }

    #[test]
    fn test_queued_work_still_fires_after_long_uptime() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(77);
        let mut scheduler = ArcScheduler::new();

        // two weeks of uptime
        scheduler.tick(1_209_600.0, &mut grid, &p, &mut rng);
        let before = scheduler.clock();
        for _ in 0..60 {
            scheduler.tick(1.0 / 60.0, &mut grid, &p, &mut rng);
        }
        assert!((scheduler.clock() - before - 1.0).abs() < 1e-3);

        scheduler.multi_strike(&mut grid, &p, &mut rng);
        for _ in 0..180 {
            scheduler.tick(1.0 / 60.0, &mut grid, &p, &mut rng);
        }
        let total = scheduler.stats().total_strikes;
        assert!((3..=7).contains(&total), "got {} triggers", total);
        assert_eq!(scheduler.pending_tasks(), 0);
    }

    #[test]
    fn test_deferred_arcs_start_at_age_zero() {
        let mut grid = three_by_three();
        let p = params(20.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(5);
        let mut scheduler = ArcScheduler::new();

        scheduler.trigger_strike(&mut grid, &p, &mut rng);
        scheduler.tick(0.06, &mut grid, &p, &mut rng);

        let ages: Vec<u32> = scheduler.arcs().iter().map(|a| a.age).collect();
        assert_eq!(ages, vec![1, 0]);
    }

    #[test]
    fn test_secondary_arcs_jump_to_a_neighbor() {
        let mut grid = three_by_three();
        let mut p = params(10.0, 0.0);
        p.set(Parameter::ConductivityThreshold, 0.0);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut scheduler = ArcScheduler::new();
        let mut seen = 0;

        for _ in 0..30 {
            scheduler.trigger_strike(&mut grid, &p, &mut rng);
            for _ in 0..25 {
                scheduler.tick(0.02, &mut grid, &p, &mut rng);
                for arc in scheduler.arcs().iter().filter(|a| a.kind == ArcKind::Secondary) {
                    assert_eq!(arc.path.len(), 2);
                    assert_eq!(arc.lifetime, SECONDARY_LIFETIME);
                    assert!(arc.path[0].x.abs_diff(arc.path[1].x) <= 1);
                    assert!(arc.path[0].y.abs_diff(arc.path[1].y) <= 1);
                    assert!((arc.intensity - 3.0).abs() < 1e-5);
                    if arc.age == 0 {
                        seen += 1;
                    }
                }
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_auto_strike_runs_until_paused() {
        let mut grid = three_by_three();
        let p = params(10.0, 0.0);
        let mut rng = SmallRng::seed_from_u64(12);
        let mut scheduler = ArcScheduler::new();

        assert!(scheduler.toggle_auto_strike(&mut rng));
        for _ in 0..250 {
            scheduler.tick(0.02, &mut grid, &p, &mut rng);
        }
        let fired = scheduler.stats().total_strikes;
        assert!(fired >= 2, "auto strike fired {} times", fired);

        scheduler.toggle_pause();
        assert!(!scheduler.is_auto_striking());
        assert!(!scheduler.toggle_auto_strike(&mut rng));
    }

    #[test]
    fn test_branches_stay_off_the_main_path() {
        let mut rng = SmallRng::seed_from_u64(31);
        let mut grid = MaterialGrid::with_default_layout(120, 80);
        let p = params(14.0, 40.0);
        let mut scheduler = ArcScheduler::new();
        let mut branches = 0;

        for _ in 0..15 {
            scheduler.trigger_strike(&mut grid, &p, &mut rng);
            scheduler.tick(0.2, &mut grid, &p, &mut rng);
            for arc in scheduler.arcs() {
                for branch in &arc.branches {
                    branches += 1;
                    assert!(branch.len() >= MIN_BRANCH_LEN);
                    assert!(arc.path.contains(&branch.root));
                    assert!(branch.cells.iter().all(|c| !arc.path.contains(c)));
                }
            }
        }
        assert!(branches > 0);
    }
}
