// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::glyphs::{FLOWER_VARIANTS, GROWING_STAGES, RAIN_FRAMES};
use crate::runtime::ColorMode;

type Rgb = (u8, u8, u8);

const STAGE_RGB: [Rgb; GROWING_STAGES] = [
    (138, 104, 72),
    (196, 180, 84),
    (150, 190, 90),
    (84, 170, 72),
];

const FLOWER_RGB: [Rgb; FLOWER_VARIANTS] = [
    (250, 214, 72),
    (236, 84, 108),
    (244, 150, 52),
    (248, 170, 200),
    (255, 196, 0),
];

const POLLINATOR_RGB: Rgb = (255, 220, 40);

const RAIN_RGB: [Rgb; RAIN_FRAMES] = [(120, 170, 230), (160, 200, 245), (90, 130, 200)];

const STATUS_RGB: Rgb = (180, 180, 180);
const ERROR_RGB: Rgb = (230, 90, 80);
const PROMPT_RGB: Rgb = (120, 220, 200);

#[derive(Clone, Debug)]
pub struct Palette {
    pub stages: [Option<Color>; GROWING_STAGES],
    pub flowers: [Option<Color>; FLOWER_VARIANTS],
    pub pollinator: Option<Color>,
    pub rain: [Option<Color>; RAIN_FRAMES],
    pub status: Option<Color>,
    pub error: Option<Color>,
    pub prompt: Option<Color>,
    pub bg: Option<Color>,
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = (a.0 as i32) - (b.0 as i32);
    let dg = (a.1 as i32) - (b.1 as i32);
    let db = (a.2 as i32) - (b.2 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let level = |v: u8| ((v as u16 * 5) + 127) / 255;
    let (r6, g6, b6) = (level(r), level(g), level(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, (0, 0, 0)),
        239..=255 => (231, (255, 255, 255)),
        _ => {
            let step = (avg - 8) / 10;
            let v = 8 + 10 * step;
            (232 + step, (v, v, v))
        }
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn color(mode: ColorMode, (r, g, b): Rgb) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
    }
}

fn colors<const N: usize>(mode: ColorMode, list: [Rgb; N]) -> [Option<Color>; N] {
    list.map(|rgb| color(mode, rgb))
}

pub fn build_palette(mode: ColorMode, default_background: bool) -> Palette {
    let bg = if default_background {
        None
    } else {
        color(mode, (0, 0, 0)).or(Some(Color::Black))
    };

    Palette {
        stages: colors(mode, STAGE_RGB),
        flowers: colors(mode, FLOWER_RGB),
        pollinator: color(mode, POLLINATOR_RGB),
        rain: colors(mode, RAIN_RGB),
        status: color(mode, STATUS_RGB),
        error: color(mode, ERROR_RGB),
        prompt: color(mode, PROMPT_RGB),
        bg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi256_maps_primaries_into_cube() {
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
    }

    #[test]
    fn ansi256_prefers_gray_ramp_for_grays() {
        assert_eq!(rgb_to_ansi256(128, 128, 128), 244);
    }

    #[test]
    fn mono_palette_has_no_colors() {
        let p = build_palette(ColorMode::Mono, true);
        assert!(p.stages.iter().all(Option::is_none));
        assert!(p.rain.iter().all(Option::is_none));
        assert_eq!(p.bg, None);
    }

    #[test]
    fn truecolor_palette_keeps_rgb() {
        let p = build_palette(ColorMode::TrueColor, false);
        assert_eq!(p.pollinator, Some(Color::Rgb { r: 255, g: 220, b: 40 }));
        assert_eq!(p.bg, Some(Color::Rgb { r: 0, g: 0, b: 0 }));
    }
}
