// Copyright (c) 2026 rezky_nightky

use rand::Rng;
use tracing::trace;

use crate::glyphs::RAIN_FRAMES;
use crate::sim::Viewport;

pub const MAX_DROPS: usize = 50;
pub const MAX_DROPS_PER_SPAWN: usize = 9;

const LAST_FRAME: u8 = (RAIN_FRAMES - 1) as u8;

#[derive(Clone, Debug, PartialEq)]
pub struct Raindrop {
    pub frame: u8,
    pub x: f32,
    pub y: f32,
    pub expired: bool,
}

impl Raindrop {
    pub fn new<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        let (x, y) = viewport.random_point(rng);
        Self {
            frame: 0,
            x,
            y,
            expired: false,
        }
    }

    fn step(&mut self) {
        if self.frame >= LAST_FRAME {
            self.frame = LAST_FRAME;
            self.expired = true;
        } else {
            self.frame = (self.frame + 1) % RAIN_FRAMES as u8;
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rain {
    drops: Vec<Raindrop>,
}

impl Rain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drops(&self) -> &[Raindrop] {
        &self.drops
    }

    pub fn len(&self) -> usize {
        self.drops.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    pub fn advance(&mut self, raining: bool) {
        if !raining {
            self.drops.clear();
            return;
        }

        for drop in &mut self.drops {
            drop.step();
        }
        self.drops.retain(|d| !d.expired);
    }

    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        raining: bool,
        viewport: Viewport,
        rng: &mut R,
    ) -> usize {
        if !raining || self.drops.len() >= MAX_DROPS {
            return 0;
        }

        let rolled = rng.random_range(0..=MAX_DROPS_PER_SPAWN);
        let count = rolled.min(MAX_DROPS - self.drops.len());
        for _ in 0..count {
            self.drops.push(Raindrop::new(viewport, rng));
        }
        count
    }

    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        raining: bool,
        viewport: Viewport,
        rng: &mut R,
    ) -> usize {
        self.advance(raining);
        let spawned = self.maybe_spawn(raining, viewport, rng);
        trace!(spawned, drops = self.drops.len(), "rain tick");
        spawned
    }
}
