// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::glyphs::{FLOWER_VARIANTS, MAX_STAGE};
use crate::sim::Viewport;

pub const INITIAL_PLANTS: usize = 10;
pub const MAX_PLANTS: usize = 100;
pub const SPAWN_CHANCE: f64 = 0.2;
pub const POLLINATOR_TOGGLE_CHANCE: f64 = 0.02;

pub const GROWTH_BASE_MS: i64 = 10_000;
pub const GROWTH_JITTER_MS: i64 = 2_000;

#[derive(Clone, Debug)]
pub struct Plant {
    pub stage: u8,
    pub variant: u8,
    pub x: f32,
    pub y: f32,
    #[allow(dead_code)]
    pub planted: Instant,
    pub last_growth: Instant,
    pub has_pollinator: bool,
}

impl Plant {
    pub fn new<R: Rng + ?Sized>(now: Instant, viewport: Viewport, rng: &mut R) -> Self {
        let (x, y) = viewport.random_point(rng);
        Self {
            stage: 0,
            variant: rng.random_range(0..FLOWER_VARIANTS) as u8,
            x,
            y,
            planted: now,
            last_growth: now,
            has_pollinator: false,
        }
    }

    pub fn is_mature(&self) -> bool {
        self.stage >= MAX_STAGE
    }
}

// Rolled fresh on every check.
pub fn growth_threshold<R: Rng + ?Sized>(rng: &mut R) -> Duration {
    let jitter = rng.random_range(-GROWTH_JITTER_MS..=GROWTH_JITTER_MS);
    Duration::from_millis((GROWTH_BASE_MS + jitter).max(0) as u64)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GardenTick {
    pub grown: usize,
    pub spawned: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Garden {
    plants: Vec<Plant>,
}

impl Garden {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    pub fn spawn_initial<R: Rng + ?Sized>(
        &mut self,
        raining: bool,
        now: Instant,
        viewport: Viewport,
        rng: &mut R,
    ) -> usize {
        if !raining || self.plants.len() >= INITIAL_PLANTS {
            return 0;
        }
        let missing = INITIAL_PLANTS - self.plants.len();
        for _ in 0..missing {
            self.plants.push(Plant::new(now, viewport, rng));
        }
        missing
    }

    pub fn maybe_spawn_one<R: Rng + ?Sized>(
        &mut self,
        raining: bool,
        now: Instant,
        viewport: Viewport,
        rng: &mut R,
    ) -> bool {
        if !raining || self.plants.len() >= MAX_PLANTS {
            return false;
        }
        if !rng.random_bool(SPAWN_CHANCE) {
            return false;
        }
        self.plants.push(Plant::new(now, viewport, rng));
        true
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, raining: bool, now: Instant, rng: &mut R) -> usize {
        if !raining {
            return 0;
        }

        let mut grown = 0usize;
        for plant in &mut self.plants {
            if plant.stage > MAX_STAGE {
                plant.stage = MAX_STAGE;
            }

            if plant.stage < MAX_STAGE {
                let elapsed = now.saturating_duration_since(plant.last_growth);
                if elapsed > growth_threshold(rng) {
                    plant.stage += 1;
                    plant.last_growth = now;
                    grown += 1;
                }
            }

            // Applies to every plant, mature or not.
            if rng.random_bool(POLLINATOR_TOGGLE_CHANCE) {
                plant.has_pollinator = !plant.has_pollinator;
            }
        }
        grown
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        raining: bool,
        now: Instant,
        viewport: Viewport,
        rng: &mut R,
    ) -> GardenTick {
        let grown = self.advance(raining, now, rng);
        let mut spawned = self.spawn_initial(raining, now, viewport, rng);
        if self.maybe_spawn_one(raining, now, viewport, rng) {
            spawned += 1;
        }

        if grown > 0 {
            debug!(grown, plants = self.plants.len(), "plants grew");
        }
        GardenTick { grown, spawned }
    }
}
