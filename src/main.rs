//! Ricochet demo entry point
//!
//! Parses a level (or the bundled example), validates it and plays it
//! headless with the tracking pilot, logging the outcome.
//!
//! Usage: `ricochet [LEVEL_FILE] [--settings FILE] [--seed N] [--frames N] [--dump]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use ricochet::{
    Error, ParsedLevel, Settings,
    headless::HeadlessHost,
    level::{example_level, load_level_file, parse_level},
    sim::Session,
    validate_level,
};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about = "Play a Ricochet level headless", long_about = None)]
struct Args {
    /// Level file; the bundled example level when omitted
    level: Option<PathBuf>,
    /// Settings JSON; invalid files fall back to defaults
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Frame cap for the autoplay run
    #[arg(long, default_value_t = 36_000)]
    frames: u64,
    /// Print the parsed level as JSON before playing
    #[arg(long)]
    dump: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: Args) -> Result<(), Error> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    log::info!("Rule set: {}", settings.rule_set.as_str());

    let level: ParsedLevel = match &args.level {
        Some(path) => load_level_file(path)?,
        None => parse_level(example_level()),
    };

    let validation = validate_level(&level);
    for warning in &validation.warnings {
        log::warn!("{warning}");
    }
    if !validation.valid {
        return Err(Error::Format(validation.errors));
    }

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&level)?);
    }

    let session = Session::from_level(args.seed, settings, level);
    let mut host = HeadlessHost::new(session);
    let summary = host.autoplay(args.frames);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Ricochet (native) starting...");

    match run(Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["ricochet"]).unwrap();
        assert_eq!(args.level, None);
        assert_eq!(args.settings, None);
        assert_eq!(args.seed, 0);
        assert_eq!(args.frames, 36_000);
        assert!(!args.dump);
    }

    #[test]
    fn test_args_full_command_line() {
        let args = Args::try_parse_from([
            "ricochet",
            "--seed",
            "5",
            "--frames",
            "120",
            "--settings",
            "rules.json",
            "--dump",
            "level.txt",
        ])
        .unwrap();
        assert_eq!(args.level, Some(PathBuf::from("level.txt")));
        assert_eq!(args.settings, Some(PathBuf::from("rules.json")));
        assert_eq!(args.seed, 5);
        assert_eq!(args.frames, 120);
        assert!(args.dump);
    }

    #[test]
    fn test_args_reject_bad_input() {
        assert!(Args::try_parse_from(["ricochet", "--seed", "many"]).is_err());
        assert!(Args::try_parse_from(["ricochet", "--bogus"]).is_err());
    }
}
