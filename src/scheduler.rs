// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use tracing::trace;

use crate::render::{RenderSync, Scene};
use crate::sim::Simulation;

pub const DEFAULT_GARDEN_PERIOD: Duration = Duration::from_millis(200);
pub const DEFAULT_RAIN_PERIOD: Duration = Duration::from_millis(80);

// Missed periods are dropped, not replayed.
#[derive(Clone, Copy, Debug)]
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next: start,
        }
    }

    pub fn next(&self) -> Instant {
        self.next
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ticks {
    pub garden: bool,
    pub rain: bool,
}

impl Ticks {
    pub fn any(&self) -> bool {
        self.garden || self.rain
    }
}

pub struct Scheduler {
    garden: Ticker,
    rain: Ticker,
}

impl Scheduler {
    pub fn new(garden_period: Duration, rain_period: Duration, start: Instant) -> Self {
        Self {
            garden: Ticker::new(garden_period, start),
            rain: Ticker::new(rain_period, start),
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.garden.next().min(self.rain.next())
    }

    pub fn step(
        &mut self,
        now: Instant,
        sim: &mut Simulation,
        render: &mut RenderSync,
        scene: &mut Scene,
    ) -> Ticks {
        let mut ticks = Ticks::default();

        if self.garden.fire(now) {
            let tick = sim.tick_garden(now);
            trace!(grown = tick.grown, spawned = tick.spawned, "garden tick");
            scene.garden = render.project_garden(sim.garden().plants());
            ticks.garden = true;
        }

        if self.rain.fire(now) {
            sim.tick_rain();
            scene.rain = render.project_rain(sim.rain().drops());
            ticks.rain = true;
        }

        ticks
    }
}
