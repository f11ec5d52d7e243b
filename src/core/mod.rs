//! Core audio types and structures

/// Audio frame and metadata types
pub mod audio;
/// Container formats recognised by extension
pub mod format;

pub use audio::{AudioFrame, AudioMetadata, BitDepth, Channels};
pub use format::AudioFormat;
