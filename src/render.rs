// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use rand::{rngs::StdRng, Rng};

use crate::frame::Frame;
use crate::garden::Plant;
use crate::glyphs::{Glyph, GlyphSet, GROWING_STAGES};
use crate::palette::Palette;
use crate::prompt::Prompt;
use crate::rain::Raindrop;
use crate::sim::Snapshot;

pub const STATUS_ROWS: u16 = 2;

const HINT: &str = "/ choose a place   q quit";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub glyph: Glyph,
    pub fg: Option<Color>,
    pub bold: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub garden: Vec<Sprite>,
    pub rain: Vec<Sprite>,
}

pub struct RenderSync {
    glyphs: GlyphSet,
    palette: Palette,
    wobble: f32,
    rng: StdRng,
}

impl RenderSync {
    pub fn new(glyphs: GlyphSet, palette: Palette, wobble: f32, rng: StdRng) -> Self {
        Self {
            glyphs,
            palette,
            wobble: if wobble.is_finite() { wobble.abs() } else { 0.0 },
            rng,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    fn jitter(&mut self) -> f32 {
        if self.wobble == 0.0 {
            return 0.0;
        }
        self.rng.random_range(-self.wobble..=self.wobble)
    }

    pub fn project_garden(&mut self, plants: &[Plant]) -> Vec<Sprite> {
        let mut out = Vec::with_capacity(plants.len() + plants.len() / 4);
        for plant in plants {
            let x = plant.x + self.jitter();
            let y = plant.y + self.jitter();
            let glyph = self.glyphs.plant(plant.stage, plant.variant);

            let stage = plant.stage as usize;
            let fg = if stage < GROWING_STAGES {
                self.palette.stages[stage]
            } else {
                self.palette.flowers[plant.variant as usize % self.palette.flowers.len()]
            };
            out.push(Sprite {
                x,
                y,
                glyph,
                fg,
                bold: false,
            });

            if plant.is_mature() && plant.has_pollinator {
                out.push(Sprite {
                    x: x + glyph.width as f32,
                    y,
                    glyph: self.glyphs.pollinator,
                    fg: self.palette.pollinator,
                    bold: true,
                });
            }
        }
        out
    }

    pub fn project_rain(&self, drops: &[Raindrop]) -> Vec<Sprite> {
        drops
            .iter()
            .map(|d| {
                let frame = (d.frame as usize).min(self.palette.rain.len() - 1);
                Sprite {
                    x: d.x,
                    y: d.y,
                    glyph: self.glyphs.raindrop(d.frame),
                    fg: self.palette.rain[frame],
                    bold: false,
                }
            })
            .collect()
    }

    pub fn compose(
        &self,
        scene: &Scene,
        snapshot: &Snapshot<'_>,
        prompt: &Prompt,
        frame: &mut Frame,
    ) {
        frame.clear();
        let field_height = frame.height.saturating_sub(STATUS_ROWS);

        for sprite in scene.garden.iter().chain(scene.rain.iter()) {
            let Some((x, y)) = to_cell(sprite, frame.width, field_height) else {
                continue;
            };
            frame.put_glyph(x, y, sprite.glyph, sprite.fg, sprite.bold);
        }

        if frame.height < STATUS_ROWS {
            return;
        }
        let info_row = frame.height - 2;
        let input_row = frame.height - 1;

        let mut col = 0u16;
        if !snapshot.location_text.is_empty() {
            col = frame.put_text(0, info_row, snapshot.location_text, self.palette.status, false);
            col = frame.put_text(col, info_row, "   ", None, false);
        }
        let rain_text = if !snapshot.rain_text.is_empty() {
            snapshot.rain_text
        } else if snapshot.raining {
            "it is raining."
        } else {
            "it is not raining."
        };
        frame.put_text(col, info_row, rain_text, self.palette.status, false);

        if prompt.is_active() {
            let col = frame.put_text(0, input_row, "place: ", self.palette.prompt, true);
            let col = frame.put_text(col, input_row, prompt.buffer(), None, false);
            frame.put_text(col, input_row, "_", self.palette.prompt, true);
        } else if let Some(err) = snapshot.last_error {
            frame.put_text(0, input_row, err, self.palette.error, false);
        } else {
            frame.put_text(0, input_row, HINT, self.palette.status, false);
        }
    }
}

fn to_cell(sprite: &Sprite, width: u16, height: u16) -> Option<(u16, u16)> {
    let x = sprite.x.round();
    let y = sprite.y.round();
    if !(x >= 0.0 && y >= 0.0 && x < width as f32 && y < height as f32) {
        return None;
    }
    Some((x as u16, y as u16))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;
    use crate::cell::Content;
    use crate::glyphs::MAX_STAGE;
    use crate::palette::build_palette;
    use crate::runtime::{ColorMode, GlyphStyle};
    use crate::sim::{Simulation, Viewport};

    fn sync(wobble: f32) -> RenderSync {
        RenderSync::new(
            GlyphSet::for_style(GlyphStyle::Ascii),
            build_palette(ColorMode::Mono, true),
            wobble,
            StdRng::seed_from_u64(1),
        )
    }

    fn plant(stage: u8, variant: u8, has_pollinator: bool) -> Plant {
        let now = Instant::now();
        Plant {
            stage,
            variant,
            x: 10.0,
            y: 5.0,
            planted: now,
            last_growth: now,
            has_pollinator,
        }
    }

    fn drop_at(frame: u8, x: f32, y: f32) -> Raindrop {
        Raindrop {
            frame,
            x,
            y,
            expired: false,
        }
    }

    #[test]
    fn young_plants_share_stage_glyph() {
        let mut rs = sync(0.0);
        let sprites = rs.project_garden(&[plant(1, 0, true), plant(1, 4, false)]);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].glyph, sprites[1].glyph);
        assert_eq!(sprites[0].glyph.text, ",");
    }

    #[test]
    fn flowers_use_variant_and_carry_pollinator() {
        let mut rs = sync(0.0);
        let sprites = rs.project_garden(&[plant(MAX_STAGE, 2, true), plant(MAX_STAGE, 3, false)]);
        let texts: Vec<&str> = sprites.iter().map(|s| s.glyph.text).collect();
        assert_eq!(texts, vec!["&", "~", "%"]);
        assert_eq!(sprites[1].x, sprites[0].x + 1.0);
    }

    #[test]
    fn wobble_stays_small_and_never_moves_the_plant() {
        let mut rs = sync(0.5);
        let plants = vec![plant(0, 0, false); 50];
        let first = rs.project_garden(&plants);
        let second = rs.project_garden(&plants);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.glyph, b.glyph);
            assert!((a.x - 10.0).abs() <= 0.5 && (a.y - 5.0).abs() <= 0.5);
            assert!((b.x - 10.0).abs() <= 0.5 && (b.y - 5.0).abs() <= 0.5);
        }
        assert!(plants.iter().all(|p| p.x == 10.0 && p.y == 5.0));
    }

    #[test]
    fn raindrops_render_in_place() {
        let rs = sync(2.0);
        let sprites = rs.project_rain(&[drop_at(0, 3.0, 4.0), drop_at(2, 7.5, 1.0)]);
        assert_eq!(sprites[0].x, 3.0);
        assert_eq!(sprites[0].y, 4.0);
        assert_eq!(sprites[0].glyph.text, ".");
        assert_eq!(sprites[1].glyph.text, "o");
    }

    #[test]
    fn compose_layers_rain_over_garden_and_writes_status() {
        let mut rs = sync(0.0);
        let mut sim = Simulation::with_seed(Viewport::new(20.0, 4.0), true, 3);
        sim.tick_garden(Instant::now());

        let scene = Scene {
            garden: rs.project_garden(&[plant(0, 0, false)]),
            rain: rs.project_rain(&[drop_at(1, 10.0, 5.0), drop_at(0, 30.0, 1.0)]),
        };
        let mut frame = Frame::new(20, 8, None);
        rs.compose(&scene, &sim.snapshot(), &Prompt::default(), &mut frame);

        assert_eq!(frame.get(10, 5).unwrap().content, Content::Char('+'));
        assert_eq!(frame.get(0, 6).unwrap().content, Content::Char('i'));
        assert_eq!(frame.get(0, 7).unwrap().content, Content::Char('/'));
    }

    #[test]
    fn compose_fully_replaces_previous_output() {
        let mut rs = sync(0.0);
        let sim = Simulation::with_seed(Viewport::new(20.0, 6.0), false, 3);
        let mut frame = Frame::new(20, 8, None);

        let scene = Scene {
            garden: rs.project_garden(&[plant(0, 0, false)]),
            rain: Vec::new(),
        };
        rs.compose(&scene, &sim.snapshot(), &Prompt::default(), &mut frame);
        assert_eq!(frame.get(10, 5).unwrap().content, Content::Char('.'));

        rs.compose(&Scene::default(), &sim.snapshot(), &Prompt::default(), &mut frame);
        assert_eq!(frame.get(10, 5).unwrap().content, Content::Blank);
    }

    #[test]
    fn sprites_in_status_rows_are_clipped() {
        let rs = sync(0.0);
        let sim = Simulation::with_seed(Viewport::new(20.0, 6.0), true, 3);
        let scene = Scene {
            garden: Vec::new(),
            rain: rs.project_rain(&[drop_at(0, 5.0, 7.0), drop_at(0, -1.0, 0.0)]),
        };
        let mut frame = Frame::new(20, 8, None);
        rs.compose(&scene, &sim.snapshot(), &Prompt::default(), &mut frame);
        assert_eq!(frame.get(5, 7).unwrap().content, Content::Char('o'));
        assert_eq!(frame.get(0, 0).unwrap().content, Content::Blank);
    }
}
