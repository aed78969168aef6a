// Copyright (c) 2026 rezky_nightky

use crate::runtime::GlyphStyle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub text: &'static str,
    pub width: u8,
}

impl Glyph {
    const fn narrow(text: &'static str) -> Self {
        Self { text, width: 1 }
    }

    const fn wide(text: &'static str) -> Self {
        Self { text, width: 2 }
    }
}

pub const GROWING_STAGES: usize = 4;

pub const MAX_STAGE: u8 = GROWING_STAGES as u8;

pub const FLOWER_VARIANTS: usize = 5;

pub const RAIN_FRAMES: usize = 3;

#[derive(Clone, Debug)]
pub struct GlyphSet {
    pub stages: [Glyph; GROWING_STAGES],
    pub flowers: [Glyph; FLOWER_VARIANTS],
    pub pollinator: Glyph,
    pub rain: [Glyph; RAIN_FRAMES],
}

const EMOJI: GlyphSet = GlyphSet {
    stages: [
        Glyph::narrow("."),
        Glyph::narrow("\u{2600}\u{FE0E}"),
        Glyph::narrow("❂"),
        Glyph::wide("🌱"),
    ],
    flowers: [
        Glyph::wide("🌼"),
        Glyph::wide("🌺"),
        Glyph::wide("🏵\u{FE0F}"),
        Glyph::wide("🌸"),
        Glyph::wide("🌻"),
    ],
    pollinator: Glyph::wide("🐝"),
    rain: [
        Glyph::narrow("·"),
        Glyph::narrow("\u{2600}\u{FE0E}"),
        Glyph::narrow("◌"),
    ],
};

const ASCII: GlyphSet = GlyphSet {
    stages: [
        Glyph::narrow("."),
        Glyph::narrow(","),
        Glyph::narrow("o"),
        Glyph::narrow("v"),
    ],
    flowers: [
        Glyph::narrow("@"),
        Glyph::narrow("*"),
        Glyph::narrow("&"),
        Glyph::narrow("%"),
        Glyph::narrow("#"),
    ],
    pollinator: Glyph::narrow("~"),
    rain: [Glyph::narrow("."), Glyph::narrow("+"), Glyph::narrow("o")],
};

impl GlyphSet {
    pub fn for_style(style: GlyphStyle) -> Self {
        match style {
            GlyphStyle::Emoji => EMOJI,
            GlyphStyle::Ascii => ASCII,
        }
    }

    pub fn plant(&self, stage: u8, variant: u8) -> Glyph {
        let stage = stage.min(MAX_STAGE) as usize;
        if stage < GROWING_STAGES {
            self.stages[stage]
        } else {
            self.flowers[variant as usize % FLOWER_VARIANTS]
        }
    }

    pub fn raindrop(&self, frame: u8) -> Glyph {
        self.rain[(frame as usize).min(RAIN_FRAMES - 1)]
    }
}

pub fn glyph_style_from_str(spec: &str, default_to_ascii: bool) -> Result<GlyphStyle, String> {
    match spec.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(if default_to_ascii {
            GlyphStyle::Ascii
        } else {
            GlyphStyle::Emoji
        }),
        "emoji" | "unicode" => Ok(GlyphStyle::Emoji),
        "ascii" => Ok(GlyphStyle::Ascii),
        _ => Err(format!(
            "unsupported glyph set: {} (allowed: auto, emoji, ascii)",
            spec
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_selects_ascii_when_non_utf() {
        assert_eq!(glyph_style_from_str("auto", true), Ok(GlyphStyle::Ascii));
        assert_eq!(glyph_style_from_str("AUTO", false), Ok(GlyphStyle::Emoji));
        assert!(glyph_style_from_str("braille", false).is_err());
    }

    #[test]
    fn flowering_stage_uses_variant_glyph() {
        let set = GlyphSet::for_style(GlyphStyle::Emoji);
        assert_eq!(set.plant(0, 3).text, ".");
        assert_eq!(set.plant(3, 3).text, "🌱");
        assert_eq!(set.plant(MAX_STAGE, 4).text, "🌻");
    }

    #[test]
    fn out_of_range_indices_are_clamped() {
        let set = GlyphSet::for_style(GlyphStyle::Ascii);
        assert_eq!(set.plant(200, 0), set.plant(MAX_STAGE, 0));
        assert_eq!(set.plant(MAX_STAGE, 7), set.flowers[2]);
        assert_eq!(set.raindrop(9), set.rain[RAIN_FRAMES - 1]);
    }
}
