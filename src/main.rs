//! gritbox CLI — slice import and headless pad playback.
//!
//! Usage:
//!   gritbox import path/to/file.wav --row A --dir ./slices
//!   gritbox play ./slices A/A1.raw [--voice 0] [--level 0.9]

use std::env;
use std::time::Duration;

use grit_core::{DEFAULT_VOICE_GAIN, ROW_NAMES};
use grit_master::{load_wav_mono, slice_into_row, Pads};
use grit_storage::RawDirStore;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("import") => import(&args[2..]),
        Some("play") => play(&args[2..]),
        _ => {
            eprintln!("Usage: gritbox import <file.wav> --row <A-D> [--dir <dir>]");
            eprintln!("       gritbox play <dir> <row/slice.raw> [--voice N] [--level f]");
            std::process::exit(1);
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn import(args: &[String]) {
    let wav_path = args.first().unwrap_or_else(|| {
        eprintln!("Usage: gritbox import <file.wav> --row <A-D> [--dir <dir>]");
        std::process::exit(1);
    });
    let row = flag_value(args, "--row").unwrap_or_else(|| {
        eprintln!("import requires --row <A-D>");
        std::process::exit(1);
    });
    if !ROW_NAMES.contains(&row) {
        eprintln!("Unknown row {:?}; expected one of {:?}", row, ROW_NAMES);
        std::process::exit(1);
    }
    let dir = flag_value(args, "--dir").unwrap_or("slices");

    let data = std::fs::read(wav_path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", wav_path, e);
        std::process::exit(1);
    });

    let samples = load_wav_mono(&data).unwrap_or_else(|e| {
        eprintln!("Failed to parse {}: {}", wav_path, e);
        std::process::exit(1);
    });
    println!("Loaded {} samples from {}", samples.len(), wav_path);

    let mut store = RawDirStore::new(dir);
    store.ensure_tree().unwrap_or_else(|e| {
        eprintln!("Failed to prepare {}: {}", dir, e);
        std::process::exit(1);
    });

    slice_into_row(&mut store, row, &samples).unwrap_or_else(|e| {
        eprintln!("Failed to slice into row {}: {}", row, e);
        std::process::exit(1);
    });

    println!("Wrote row {} under {}", row, dir);
}

fn play(args: &[String]) {
    let (dir, slice) = match (args.first(), args.get(1)) {
        (Some(dir), Some(slice)) => (dir.as_str(), slice.as_str()),
        _ => {
            eprintln!("Usage: gritbox play <dir> <row/slice.raw> [--voice N] [--level f]");
            std::process::exit(1);
        }
    };
    let voice: usize = flag_value(args, "--voice")
        .map(|v| v.parse().unwrap_or_else(|_| bad_flag("--voice", v)))
        .unwrap_or(0);
    let level: f32 = flag_value(args, "--level")
        .map(|v| v.parse().unwrap_or_else(|_| bad_flag("--level", v)))
        .unwrap_or(DEFAULT_VOICE_GAIN);

    let pads = Pads::open(dir).unwrap_or_else(|e| {
        eprintln!("Failed to start sampler: {}", e);
        std::process::exit(1);
    });

    pads.set_level(voice, level);
    pads.trigger(voice, slice);
    println!("Playing {} on voice {}...", slice, voice);

    // Give the trigger a moment to land before polling for idle.
    std::thread::sleep(Duration::from_millis(50));
    while pads.any_busy() {
        std::thread::sleep(Duration::from_millis(10));
    }

    pads.shutdown();
    println!("Done.");
}

fn bad_flag(flag: &str, value: &str) -> ! {
    eprintln!("Invalid value {:?} for {}", value, flag);
    std::process::exit(1);
}
