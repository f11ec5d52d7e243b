//! audio-trim command line interface
//!
//! Trims a fixed number of seconds off both ends of every audio file in a folder.

use audio_trim::{AudioResult, BatchResult, TrimConfig};
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "audio-trim")]
#[command(
    about = "Trim the first and last seconds off every audio file in a folder",
    long_about = "Trim the first and last seconds off every audio file in a folder.\n\n\
                  Offsets and backend come from AUDIO_TRIM_START_SECS, AUDIO_TRIM_END_SECS, \
                  AUDIO_TRIM_BACKEND (auto|native|ffmpeg), AUDIO_TRIM_FFMPEG and AUDIO_TRIM_FFPROBE."
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Folder containing the audio files
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output folder (defaults to INPUT/trimmed)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,
}

fn run(cli: Cli) -> AudioResult<BatchResult> {
    let config = TrimConfig::new(cli.input, cli.output).with_env()?;
    debug!("{:?}", config);

    let result = audio_trim::run(&config)?;

    println!();
    println!(
        "Finished: {} processed, {} skipped, {} failed (of {})",
        result.processed,
        result.skipped,
        result.failed,
        result.total()
    );
    for (path, err) in &result.failures {
        println!("  failed: {} ({})", path.display(), err);
    }
    if result.total() > 0 {
        println!("Trimmed files saved in: {}", result.output_folder.display());
    }
    Ok(result)
}

/// Process exit status for a finished run
///
/// Per-file failures still exit 0; fatal pre-flight errors exit 1 and
/// anything else that aborted the batch exits 2.
fn exit_status(outcome: &AudioResult<BatchResult>) -> u8 {
    match outcome {
        Ok(_) => 0,
        Err(e) if e.is_fatal() => 1,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    info!("audio-trim {}", audio_trim::VERSION);

    let outcome = run(cli);
    if let Err(e) = &outcome {
        eprintln!("Error: {}", e);
    }
    ExitCode::from(exit_status(&outcome))
}
