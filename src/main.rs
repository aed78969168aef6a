// Copyright (c) 2026 rezky_nightky

mod cell;
mod config;
mod frame;
mod garden;
mod glyphs;
mod palette;
mod prompt;
mod rain;
mod render;
mod runtime;
mod scheduler;
mod sim;
mod terminal;
mod weather;

use std::env;
use std::fs::File;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use anyhow::{Context, Result};
use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{
    check_f64_range, check_u64_range, color_enabled_stdout, default_params_usage_for_help, Args,
    ColorBg,
};
use crate::frame::Frame;
use crate::glyphs::{glyph_style_from_str, GlyphSet};
use crate::palette::build_palette;
use crate::prompt::{Prompt, PromptAction};
use crate::render::{RenderSync, Scene, STATUS_ROWS};
use crate::runtime::ColorMode;
use crate::scheduler::Scheduler;
use crate::sim::{Simulation, Viewport};
use crate::terminal::{restore_terminal_best_effort, Terminal};
use crate::weather::{spawn_lookup, LookupOutcome, OpenMeteo, WeatherError, WeatherSource};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

// Keeps jitter draws off the simulation's random stream.
const RENDER_SEED_SALT: u64 = 0x5eed_0f_1ea7;

fn build_info() -> &'static str {
    env!("RAINGARDEN_BUILD")
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn or_exit<T>(r: std::result::Result<T, String>) -> T {
    r.unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    })
}

fn default_to_ascii() -> bool {
    let lang = env::var("LANG").unwrap_or_default();
    !lang.to_ascii_uppercase().contains("UTF")
}

fn detect_color_mode(args: &Args) -> std::result::Result<ColorMode, String> {
    if let Some(m) = args.colormode {
        return match m {
            0 => Ok(ColorMode::Mono),
            8 | 256 => Ok(ColorMode::Color256),
            24 | 32 => Ok(ColorMode::TrueColor),
            _ => Err(format!("invalid --colormode: {} (allowed: 0,8,24)", m)),
        };
    }

    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return Ok(ColorMode::TrueColor);
    }
    if env::var("TERM").unwrap_or_default() == "dumb" {
        return Ok(ColorMode::Mono);
    }
    Ok(ColorMode::Color256)
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn start_lookup(
    source: &Arc<dyn WeatherSource>,
    place: String,
    tx: &mpsc::Sender<LookupOutcome>,
    sim: &mut Simulation,
) {
    if let Err(e) = spawn_lookup(Arc::clone(source), place.clone(), tx.clone()) {
        sim.apply_lookup(LookupOutcome {
            place,
            result: Err(WeatherError::Network(format!("could not start lookup: {e}"))),
        });
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Quit,
    Lookup(String),
    Redraw,
    Ignored,
}

fn handle_key(key: KeyEvent, prompt: &mut Prompt) -> KeyOutcome {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyOutcome::Quit;
    }

    if prompt.is_active() {
        return match prompt.handle_key(key) {
            PromptAction::Submit(place) => KeyOutcome::Lookup(place),
            PromptAction::Cancel | PromptAction::None => KeyOutcome::Redraw,
        };
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
        KeyCode::Char('/') | KeyCode::Enter => {
            prompt.open();
            KeyOutcome::Redraw
        }
        _ => KeyOutcome::Ignored,
    }
}

fn main() -> Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();
    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        let sha = env!("RAINGARDEN_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        return Ok(());
    }

    let garden_period = Duration::from_millis(or_exit(check_u64_range(
        "--garden-ms",
        args.garden_ms,
        20,
        10_000,
    )));
    let rain_period = Duration::from_millis(or_exit(check_u64_range(
        "--rain-ms",
        args.rain_ms,
        20,
        10_000,
    )));
    let wobble = or_exit(check_f64_range("--wobble", args.wobble as f64, 0.0, 3.0)) as f32;
    let duration_s = match args.duration {
        Some(s) if s.is_finite() && s <= 0.0 => None,
        Some(s) => Some(or_exit(check_f64_range("--duration", s, 0.1, 86400.0))),
        None => None,
    };
    let color_mode = or_exit(detect_color_mode(&args));
    let glyph_style = or_exit(glyph_style_from_str(&args.glyphs, default_to_ascii()));

    init_logging(args.log_file.as_deref())?;

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);
    info!(
        seed,
        garden_ms = args.garden_ms,
        rain_ms = args.rain_ms,
        raining = !args.dry,
        ?glyph_style,
        ?color_mode,
        "starting"
    );

    let mut term = Terminal::new().context("failed to set up the terminal")?;
    let (w, h) = term.size().context("failed to read the terminal size")?;

    let palette = build_palette(color_mode, args.color_bg == ColorBg::DefaultBackground);
    let mut frame = Frame::new(w, h, palette.bg);
    let mut render = RenderSync::new(
        GlyphSet::for_style(glyph_style),
        palette,
        wobble,
        StdRng::seed_from_u64(seed ^ RENDER_SEED_SALT),
    );
    let mut sim = Simulation::with_seed(
        Viewport::from_cells(w, h.saturating_sub(STATUS_ROWS)),
        !args.dry,
        seed,
    );
    let mut scene = Scene::default();
    let mut prompt = Prompt::default();

    let source: Arc<dyn WeatherSource> =
        Arc::new(OpenMeteo::new(args.geocoding_url.clone(), args.forecast_url.clone()));
    let (tx, rx) = mpsc::channel::<LookupOutcome>();
    if let Some(place) = args.place.clone() {
        start_lookup(&source, place, &tx, &mut sim);
    }

    let start_time = Instant::now();
    let end_time = duration_s.map(|s| start_time + Duration::from_secs_f64(s));
    let mut scheduler = Scheduler::new(garden_period, rain_period, start_time);
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;
        let mut dirty = false;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        match handle_key(k, &mut prompt) {
                            KeyOutcome::Quit => running = false,
                            KeyOutcome::Lookup(place) => {
                                start_lookup(&source, place, &tx, &mut sim);
                                dirty = true;
                            }
                            KeyOutcome::Redraw => dirty = true,
                            KeyOutcome::Ignored => {}
                        }
                    }
                    _ => {}
                }
            }

            while let Ok(outcome) = rx.try_recv() {
                sim.apply_lookup(outcome);
                dirty = true;
            }

            if !running || pending_resize.is_some() || dirty {
                break;
            }

            let now = Instant::now();
            let deadline = scheduler.next_deadline();
            if now >= deadline {
                break;
            }
            let mut timeout = deadline - now;
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            frame = Frame::new(nw, nh, render.palette().bg);
            sim.set_viewport(Viewport::from_cells(nw, nh.saturating_sub(STATUS_ROWS)));
            dirty = true;
        }

        let ticks = scheduler.step(Instant::now(), &mut sim, &mut render, &mut scene);
        if ticks.any() || dirty {
            render.compose(&scene, &sim.snapshot(), &prompt, &mut frame);
            term.draw(&frame)?;
        }
    }

    drop(term);
    info!(
        plants = sim.garden().len(),
        raindrops = sim.rain().len(),
        raining = sim.is_raining(),
        elapsed_s = start_time.elapsed().as_secs_f64(),
        "stopped"
    );
    if let Some(err) = sim.snapshot().last_error {
        warn!(error = err, "last weather error");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_c() -> KeyEvent {
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
    }

    #[test]
    fn q_and_esc_quit_outside_the_prompt() {
        let mut prompt = Prompt::default();
        assert_eq!(handle_key(press(KeyCode::Char('q')), &mut prompt), KeyOutcome::Quit);
        assert_eq!(handle_key(press(KeyCode::Esc), &mut prompt), KeyOutcome::Quit);
        assert_eq!(handle_key(ctrl_c(), &mut prompt), KeyOutcome::Quit);
        assert_eq!(
            handle_key(press(KeyCode::Char('x')), &mut prompt),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn slash_and_enter_open_the_prompt() {
        let mut prompt = Prompt::default();
        assert_eq!(handle_key(press(KeyCode::Char('/')), &mut prompt), KeyOutcome::Redraw);
        assert!(prompt.is_active());

        let mut prompt = Prompt::default();
        assert_eq!(handle_key(press(KeyCode::Enter), &mut prompt), KeyOutcome::Redraw);
        assert!(prompt.is_active());
    }

    #[test]
    fn q_typed_in_the_prompt_is_part_of_the_place() {
        let mut prompt = Prompt::default();
        handle_key(press(KeyCode::Char('/')), &mut prompt);
        for c in "quito".chars() {
            assert_eq!(handle_key(press(KeyCode::Char(c)), &mut prompt), KeyOutcome::Redraw);
        }
        assert_eq!(prompt.buffer(), "quito");
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut prompt),
            KeyOutcome::Lookup("quito".to_string())
        );
        assert!(!prompt.is_active());
    }

    #[test]
    fn esc_in_the_prompt_cancels_without_quitting() {
        let mut prompt = Prompt::default();
        handle_key(press(KeyCode::Char('/')), &mut prompt);
        assert_eq!(handle_key(press(KeyCode::Esc), &mut prompt), KeyOutcome::Redraw);
        assert!(!prompt.is_active());
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut prompt = Prompt::default();
        handle_key(press(KeyCode::Char('/')), &mut prompt);
        handle_key(press(KeyCode::Char('o')), &mut prompt);
        assert_eq!(handle_key(ctrl_c(), &mut prompt), KeyOutcome::Quit);
    }
}
