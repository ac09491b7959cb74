//! `termtile-demo`: animated truecolor gradient
//!
//! Exercises the differential renderer: a slowly scrolling color field with
//! a fixed caption, so most of each frame changes while the caption does not.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin termtile-demo
//! cargo run --bin termtile-demo -- --help
//! cargo run --bin termtile-demo -- --fps 60 --size 120x40 --title gradient
//! ```
//!
//! Press `q`, `Esc` or `Ctrl+C` to quit.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Read, Write};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::{Duration, Instant};
use termtile::{Console, LogLevel, Renderer, Rgb, Tile, set_log_callback};

// ============================================================================
// CLI Parsing
// ============================================================================

const HELP_TEXT: &str = "termtile-demo - differential truecolor renderer demo

USAGE:
    termtile-demo [OPTIONS]

OPTIONS:
    -h, --help              Print this help message and exit
    --frames <N>            Exit after presenting N frames (default: 0, run until quit)
    --fps <N>               Frames per second (default: 30)
    --title <TEXT>          Window title
    --size <WxH>            Console size (default: terminal size, else 80x24)
    --log <PATH>            Append renderer log messages to PATH

EXIT PATHS:
    --exit-without-close    After the last frame, call process::exit without
                            closing the renderer
    --panic                 After the last frame, panic

EXAMPLES:
    termtile-demo                       # Run until q is pressed
    termtile-demo --frames 100 --fps 60 # Short benchmark-ish run
";

/// How the demo leaves once its frames are done.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitPath {
    Close,
    ProcessExit,
    Panic,
}

/// Demo configuration.
#[derive(Clone, Debug)]
struct Config {
    frames: u64,
    fps: u32,
    title: Option<String>,
    size: Option<(u32, u32)>,
    log: Option<String>,
    exit_path: ExitPath,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frames: 0,
            fps: 30,
            title: None,
            size: None,
            log: None,
            exit_path: ExitPath::Close,
        }
    }
}

/// Result of CLI parsing.
enum ParseResult {
    Config(Config),
    Help,
    Error(String),
}

impl Config {
    fn from_args<I>(args: I) -> ParseResult
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        // Skip program name
        args.next();

        while let Some(arg) = args.next() {
            let arg_str = arg.to_string_lossy();
            let mut value = |name: &str| match args.next() {
                Some(v) => Ok(v.to_string_lossy().to_string()),
                None => Err(format!("{name} requires a value")),
            };

            match arg_str.as_ref() {
                "-h" | "--help" => return ParseResult::Help,

                "--frames" => {
                    let v = match value("--frames") {
                        Ok(v) => v,
                        Err(e) => return ParseResult::Error(e),
                    };
                    match v.parse::<u64>() {
                        Ok(n) => config.frames = n,
                        Err(_) => return ParseResult::Error(format!("Invalid --frames value: {v}")),
                    }
                }

                "--fps" => {
                    let v = match value("--fps") {
                        Ok(v) => v,
                        Err(e) => return ParseResult::Error(e),
                    };
                    match v.parse::<u32>() {
                        Ok(n) if n > 0 => config.fps = n,
                        _ => {
                            return ParseResult::Error(format!(
                                "Invalid --fps value: {v} (must be positive integer)"
                            ));
                        }
                    }
                }

                "--title" => match value("--title") {
                    Ok(v) => config.title = Some(v),
                    Err(e) => return ParseResult::Error(e),
                },

                "--size" => {
                    let v = match value("--size") {
                        Ok(v) => v,
                        Err(e) => return ParseResult::Error(e),
                    };
                    match parse_size(&v) {
                        Some(size) => config.size = Some(size),
                        None => {
                            return ParseResult::Error(format!(
                                "Invalid --size: {v} (use WxH format, e.g., 80x24)"
                            ));
                        }
                    }
                }

                "--log" => match value("--log") {
                    Ok(v) => config.log = Some(v),
                    Err(e) => return ParseResult::Error(e),
                },

                "--exit-without-close" => config.exit_path = ExitPath::ProcessExit,
                "--panic" => config.exit_path = ExitPath::Panic,

                other => return ParseResult::Error(format!("Unknown argument: {other}")),
            }
        }

        ParseResult::Config(config)
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }
}

/// Parse `WxH` with both sides positive.
fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w = w.trim().parse::<u32>().ok()?;
    let h = h.trim().parse::<u32>().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> termtile::Result<()> {
    match Config::from_args(std::env::args_os()) {
        ParseResult::Config(config) => run(&config),
        ParseResult::Help => {
            print!("{HELP_TEXT}");
            Ok(())
        }
        ParseResult::Error(msg) => {
            eprintln!("Error: {msg}");
            eprintln!("Run with --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn run(config: &Config) -> termtile::Result<()> {
    if let Some(path) = &config.log {
        install_file_logger(path)?;
    }

    let (width, height) = config.size.unwrap_or_else(detect_size);
    let mut renderer = Renderer::new(config.title.as_deref())?;
    let mut console = Console::try_new(width, height)?;
    let keys = spawn_key_reader();
    let frame_duration = config.frame_duration();

    let mut frame: u64 = 0;
    while config.frames == 0 || frame < config.frames {
        let frame_start = Instant::now();

        if quit_requested(&keys) {
            break;
        }

        draw_frame(&mut console, frame, renderer.stats().last_changed_tiles);
        renderer.present(&console)?;
        frame += 1;

        if let Some(remaining) = frame_duration.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    match config.exit_path {
        ExitPath::Close => renderer.close(),
        ExitPath::ProcessExit => std::process::exit(0),
        ExitPath::Panic => panic!("demo asked to panic after {frame} frames"),
    }
}

// ============================================================================
// Drawing
// ============================================================================

const CAPTION_BG: Rgb = Rgb::new(24, 24, 32);

/// Fill the console with a moving hue field and a caption.
fn draw_frame(console: &mut Console, frame: u64, last_changed: usize) {
    let (width, height) = console.size();
    let phase = (frame % 360) as f32;

    for y in 0..height {
        for x in 0..width {
            let hue = (phase + x as f32 * 360.0 / width.max(1) as f32) % 360.0;
            let value = 0.35 + 0.5 * (y as f32 / height.max(1) as f32);
            let bg = Rgb::from_hsv(hue, 0.7, value);
            let fg = bg.lerp(Rgb::WHITE, 0.6);
            console.set(x, y, Tile::new(shade(x, y, frame), fg, bg));
        }
    }

    let caption = " termtile ";
    let info = format!(" frame {frame}  changed {last_changed} ");
    let center_y = height / 2;
    for (row, text) in [(center_y.saturating_sub(1), caption), (center_y, info.as_str())] {
        let len = text.chars().count() as u32;
        let x = width.saturating_sub(len) / 2;
        console.print(x, row, text, Rgb::WHITE, CAPTION_BG);
    }
}

/// A slow diagonal pattern of block characters.
fn shade(x: u32, y: u32, frame: u64) -> char {
    const SHADES: [char; 4] = [' ', '░', '▒', '▓'];
    let i = (u64::from(x) + u64::from(y) * 2 + frame / 4) % SHADES.len() as u64;
    SHADES[i as usize]
}

// ============================================================================
// Input
// ============================================================================

/// Forward stdin bytes from a background thread.
fn spawn_key_reader() -> Receiver<u8> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = [0u8; 64];
        let mut stdin = io::stdin();
        loop {
            match stdin.read(&mut buf) {
                // Raw mode reads time out with no data.
                Ok(0) => std::thread::sleep(Duration::from_millis(50)),
                Ok(n) => {
                    if buf[..n].iter().any(|b| tx.send(*b).is_err()) {
                        return;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(_) => return,
            }
        }
    });
    rx
}

fn quit_requested(keys: &Receiver<u8>) -> bool {
    loop {
        match keys.try_recv() {
            // q, Esc, Ctrl+C (no SIGINT in raw mode)
            Ok(b'q' | b'Q' | 0x1b | 0x03) => return true,
            Ok(_) => {}
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => return false,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[cfg(unix)]
fn detect_size() -> (u32, u32) {
    termtile::terminal_size().map_or((80, 24), |(w, h)| (u32::from(w), u32::from(h)))
}

#[cfg(not(unix))]
fn detect_size() -> (u32, u32) {
    (80, 24)
}

fn install_file_logger(path: &str) -> io::Result<()> {
    let file = File::options().create(true).append(true).open(path)?;
    let file = Mutex::new(file);
    set_log_callback(move |level, message| {
        let tag = match level {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        if let Ok(mut file) = file.lock() {
            let _ = writeln!(file, "[{tag}] {message}");
        }
    });
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
