#![warn(missing_docs)]

//! # audio-trim: batch audio trimming
//!
//! Removes a fixed number of seconds from the start and end of every audio
//! file in a folder and writes the results to an output folder.
//!
//! ## Features
//!
//! - **Discover** - MP3, WAV, M4A, FLAC, AAC, OGG, WMA, Opus by extension
//! - **Decode** - pure Rust through Symphonia, or ffprobe/ffmpeg when installed
//! - **Trim** - configurable start/end offsets, short files skipped
//! - **Export** - staged temp file renamed into place, never a partial output
//! - **Isolate** - one broken file is counted as failed, the batch carries on
//!
//! ## Quick Start
//!
//! ```ignore
//! use audio_trim::codec::NativeCodec;
//! use audio_trim::processor::{BatchTrimmer, TrimPlan};
//!
//! let trimmer = BatchTrimmer::new(NativeCodec, TrimPlan::default());
//! let result = trimmer.run("music".as_ref(), None)?;
//! println!("{} processed, {} skipped, {} failed", result.processed, result.skipped, result.failed);
//! ```

/// Core audio types and structures
pub mod core;
/// Error types for audio operations
pub mod error;
/// Audio decoder implementations
pub mod decoder;
/// Audio encoder implementations
pub mod encoder;
/// Codec backends used by the trimmer
pub mod codec;
/// Audio processing pipelines
pub mod processor;
/// Batch configuration
pub mod config;

// Export public types
pub use codec::{Backend, Codec};
pub use config::{BackendKind, TrimConfig};
pub use crate::core::{AudioFormat, AudioFrame, AudioMetadata, BitDepth, Channels};
pub use error::{AudioError, AudioResult};
pub use processor::{BatchResult, BatchTrimmer, TrimOutcome, TrimPlan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a whole batch as described by `config`, picking the backend first
pub fn run(config: &TrimConfig) -> AudioResult<BatchResult> {
    let output = config.output_folder.as_deref();
    match Backend::resolve(config.backend, config.ffmpeg_codec()) {
        Backend::Native(codec) => BatchTrimmer::new(codec, config.plan).run(&config.input_folder, output),
        Backend::Ffmpeg(codec) => BatchTrimmer::new(codec, config.plan).run(&config.input_folder, output),
    }
}
