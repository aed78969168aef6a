// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use crate::weather::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  raingarden --garden-ms 200 --rain-ms 80 --glyphs auto --wobble 0.4";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if !color_enabled_stdout() {
        return DEFAULT_PARAMS_USAGE.to_string();
    }
    let mut out = String::with_capacity(DEFAULT_PARAMS_USAGE.len() + 32);
    for (i, line) in DEFAULT_PARAMS_USAGE.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix("  raingarden") {
            out.push_str("  \x1b[1;34mraingarden\x1b[0m");
            out.push_str(rest);
        } else {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        }
    }
    out
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "raingarden", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'p',
        long = "place",
        help_heading = "WEATHER",
        help = "Look up the weather for this place at startup"
    )]
    pub place: Option<String>,

    #[arg(
        long = "dry",
        help_heading = "WEATHER",
        help = "Start with dry weather (nothing grows until a lookup finds rain)"
    )]
    pub dry: bool,

    #[arg(
        long = "geocoding-url",
        default_value = DEFAULT_GEOCODING_URL,
        help_heading = "WEATHER",
        help = "Geocoding endpoint"
    )]
    pub geocoding_url: String,

    #[arg(
        long = "forecast-url",
        default_value = DEFAULT_FORECAST_URL,
        help_heading = "WEATHER",
        help = "Forecast endpoint"
    )]
    pub forecast_url: String,

    #[arg(
        short = 'g',
        long = "garden-ms",
        default_value_t = 200,
        help_heading = "TIMING",
        help = "Garden tick period in ms (min 20 max 10000)"
    )]
    pub garden_ms: u64,

    #[arg(
        short = 'r',
        long = "rain-ms",
        default_value_t = 80,
        help_heading = "TIMING",
        help = "Rain tick period in ms (min 20 max 10000)"
    )]
    pub rain_ms: u64,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "seed",
        help_heading = "TIMING",
        help = "Seed for the random number generator"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "glyphs",
        default_value = "auto",
        help_heading = "APPEARANCE",
        help = "Glyph set: auto, emoji, ascii"
    )]
    pub glyphs: String,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,8,24). Default: 24-bit if COLORTERM says so, else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "color-bg",
        default_value_t = ColorBg::DefaultBackground,
        value_enum,
        help_heading = "APPEARANCE",
        help = "Background mode (black, default-background)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        short = 'w',
        long = "wobble",
        default_value_t = 0.4,
        help_heading = "APPEARANCE",
        help = "Plant wobble in cells (min 0 max 3)"
    )]
    pub wobble: f32,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs here (filter with RUST_LOG)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn check_f64_range(name: &str, v: f64, min: f64, max: f64) -> Result<f64, String> {
    if !v.is_finite() {
        return Err(format!("failed to apply {} {} (must be a finite number)", name, v));
    }
    if v < min || v > max {
        return Err(format!("failed to apply {} {} (min {} max {})", name, v, min, max));
    }
    Ok(v)
}

pub fn check_u64_range(name: &str, v: u64, min: u64, max: u64) -> Result<u64, String> {
    if v < min || v > max {
        return Err(format!("failed to apply {} {} (min {} max {})", name, v, min, max));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tick_periods() {
        let args = Args::try_parse_from(["raingarden"]).unwrap();
        assert_eq!(args.garden_ms, 200);
        assert_eq!(args.rain_ms, 80);
        assert!(!args.dry);
        assert_eq!(args.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(args.color_bg, ColorBg::DefaultBackground);
    }

    #[test]
    fn place_and_timing_flags_parse() {
        let argv = ["raingarden", "-p", "Bergen", "--dry", "-r", "120", "--seed", "9"];
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.place.as_deref(), Some("Bergen"));
        assert!(args.dry);
        assert_eq!(args.rain_ms, 120);
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn range_checks_reject_out_of_bounds() {
        assert!(check_u64_range("--rain-ms", 5, 20, 10_000).is_err());
        assert_eq!(check_u64_range("--rain-ms", 80, 20, 10_000), Ok(80));
        assert!(check_f64_range("--wobble", f64::NAN, 0.0, 3.0).is_err());
        assert_eq!(
            check_f64_range("--wobble", 4.0, 0.0, 3.0).unwrap_err(),
            "failed to apply --wobble 4 (min 0 max 3)"
        );
    }
}
