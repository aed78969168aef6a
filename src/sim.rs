// Copyright (c) 2026 rezky_nightky

use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, warn};

use crate::garden::{Garden, GardenTick, Plant};
use crate::rain::{Rain, Raindrop};
use crate::weather::{LookupOutcome, WeatherError};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }

    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self::new(cols as f32, rows as f32)
    }

    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> (f32, f32) {
        (
            rng.random::<f32>() * self.width,
            rng.random::<f32>() * self.height,
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeatherStatus {
    pub raining: bool,
    pub location_text: String,
    pub rain_text: String,
    pub last_error: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub plants: &'a [Plant],
    pub raindrops: &'a [Raindrop],
    pub raining: bool,
    pub rain_text: &'a str,
    pub location_text: &'a str,
    pub last_error: Option<&'a str>,
}

pub struct Simulation {
    garden: Garden,
    rain: Rain,
    weather: WeatherStatus,
    viewport: Viewport,
    rng: StdRng,
}

impl Simulation {
    pub fn new(viewport: Viewport, raining: bool, rng: StdRng) -> Self {
        Self {
            garden: Garden::new(),
            rain: Rain::new(),
            weather: WeatherStatus {
                raining,
                ..WeatherStatus::default()
            },
            viewport,
            rng,
        }
    }

    pub fn with_seed(viewport: Viewport, raining: bool, seed: u64) -> Self {
        Self::new(viewport, raining, StdRng::seed_from_u64(seed))
    }

    pub fn garden(&self) -> &Garden {
        &self.garden
    }

    pub fn rain(&self) -> &Rain {
        &self.rain
    }

    pub fn is_raining(&self) -> bool {
        self.weather.raining
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn tick_garden(&mut self, now: Instant) -> GardenTick {
        let raining = self.is_raining();
        self.garden.tick(raining, now, self.viewport, &mut self.rng)
    }

    pub fn tick_rain(&mut self) -> usize {
        let raining = self.is_raining();
        self.rain.tick(raining, self.viewport, &mut self.rng)
    }

    pub fn apply_lookup(&mut self, outcome: LookupOutcome) {
        match outcome.result {
            Ok(report) => {
                info!(
                    place = %outcome.place,
                    latitude = report.location.latitude,
                    longitude = report.location.longitude,
                    precipitation = report.conditions.precipitation,
                    raining = report.raining,
                    was_raining = self.weather.raining,
                    "weather updated"
                );
                self.weather.raining = report.raining;
                self.weather.location_text = report.location_text;
                self.weather.rain_text = report.rain_text;
                self.weather.last_error = None;
            }
            Err(err) => {
                match &err {
                    WeatherError::NotFound { .. } => {
                        warn!(place = %outcome.place, "place not found")
                    }
                    WeatherError::Network(_) | WeatherError::Malformed(_) => {
                        warn!(place = %outcome.place, error = %err, "weather lookup failed")
                    }
                }
                self.weather.last_error = Some(err.to_string());
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            plants: self.garden.plants(),
            raindrops: self.rain.drops(),
            raining: self.weather.raining,
            rain_text: &self.weather.rain_text,
            location_text: &self.weather.location_text,
            last_error: self.weather.last_error.as_deref(),
        }
    }
}
