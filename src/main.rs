use std::path::PathBuf;
use std::process::ExitCode;

use bevy::log::{error, info};
use tilestack::constants::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_TILE_SIZE};
use tilestack::{DocumentResult, Map, paths};

const USAGE: &str = "usage:
  tilestack info <file>
  tilestack new <file> [width height [tile_size]]
  tilestack convert <in> <out>";

/// Stdout logging, plus a session log file in debug builds
fn setup_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::prelude::*;

    let (file_layer, guard) = match file_log_writer() {
        Some((writer, guard)) => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_level(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tilestack=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

#[cfg(debug_assertions)]
fn file_log_writer() -> Option<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    use std::fs::OpenOptions;
    use std::io::Write;

    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory {}", logs_dir.display());
        return None;
    }

    let log_file_path = logs_dir.join("tilestack.log");

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, "tilestack.log");
    Some(tracing_appender::non_blocking(file_appender))
}

#[cfg(not(debug_assertions))]
fn file_log_writer() -> Option<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    None
}

#[derive(Debug, PartialEq)]
enum Command {
    Info(PathBuf),
    New {
        path: PathBuf,
        width: i32,
        height: i32,
        tile_size: i32,
    },
    Convert {
        input: PathBuf,
        output: PathBuf,
    },
}

fn parse_number(value: &str, what: &str) -> Result<i32, String> {
    value
        .parse()
        .map_err(|_| format!("{} must be an integer, got '{}'", what, value))
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["info", file] => Ok(Command::Info(PathBuf::from(file))),
        ["new", file, rest @ ..] => {
            let (width, height, tile_size) = match rest {
                [] => (DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, DEFAULT_TILE_SIZE),
                [w, h] => (parse_number(w, "width")?, parse_number(h, "height")?, DEFAULT_TILE_SIZE),
                [w, h, t] => (
                    parse_number(w, "width")?,
                    parse_number(h, "height")?,
                    parse_number(t, "tile_size")?,
                ),
                _ => return Err(USAGE.to_string()),
            };
            Ok(Command::New {
                path: PathBuf::from(file),
                width,
                height,
                tile_size,
            })
        }
        ["convert", input, output] => Ok(Command::Convert {
            input: PathBuf::from(input),
            output: PathBuf::from(output),
        }),
        _ => Err(USAGE.to_string()),
    }
}

fn run(command: Command) -> DocumentResult<()> {
    match command {
        Command::Info(path) => {
            let map = Map::from_file(&path)?;
            println!("{}", map.debug_summary());
        }
        Command::New {
            path,
            width,
            height,
            tile_size,
        } => {
            let mut map = Map::new(width, height, tile_size)?;
            if let Some(stem) = path.file_stem() {
                map.set_name(stem.to_string_lossy());
            }
            map.save_to_file(&path)?;
            info!("Created {}x{} map at {}", width, height, path.display());
        }
        Command::Convert { input, output } => {
            let map = Map::from_file(&input)?;
            map.save_to_file(&output)?;
            info!("Converted {} to {}", input.display(), output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create data directories: {}", e);
    }
    // Keep the guard alive for the duration of the program
    let _log_guard = setup_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
