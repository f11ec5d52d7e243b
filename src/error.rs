use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for audio operations
pub type AudioResult<T> = Result<T, AudioError>;

/// Error types for trimming and the codec operations underneath it
#[derive(Error, Debug)]
pub enum AudioError {
    /// Input folder missing or not a directory
    #[error("Input folder not found: {}", path.display())]
    NotFound {
        /// The path that was looked up
        path: PathBuf,
    },

    /// Output folder could not be created
    #[error("Cannot create output folder {}: {source}", path.display())]
    OutputFolder {
        /// The folder that could not be created
        path: PathBuf,
        /// Underlying IO error
        source: io::Error,
    },

    /// Opening or decoding a source file failed
    #[error("Cannot open {}: {reason}", path.display())]
    Open {
        /// Source file
        path: PathBuf,
        /// Cause reported by the codec
        reason: String,
    },

    /// Slicing or writing the trimmed output failed
    #[error("Cannot export {}: {reason}", path.display())]
    Export {
        /// Destination file
        path: PathBuf,
        /// Cause reported by the codec
        reason: String,
    },

    /// IO error (file operations, disk access)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unsupported audio format
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Invalid audio metadata
    #[error("Invalid audio metadata: {0}")]
    InvalidMetadata(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Encoding failed
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// Invalid channel configuration
    #[error("Invalid channel configuration: expected {expected}, got {got}")]
    InvalidChannels {
        /// Expected number of channels
        expected: u32,
        /// Got number of channels
        got: u32,
    },

    /// Invalid sample rate
    #[error("Invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The invalid sample rate
        rate: u32,
    },

    /// Buffer-related error
    #[error("Buffer error: {0}")]
    BufferError(String),

    /// External tool (ffmpeg/ffprobe) failed
    #[error("{tool} failed: {message}")]
    Tool {
        /// Binary that was run
        tool: String,
        /// Exit status and stderr
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AudioError {
    /// Wrap a codec error raised while opening `path`
    pub fn open(path: impl Into<PathBuf>, err: AudioError) -> Self {
        AudioError::Open {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Wrap a codec error raised while exporting to `path`
    pub fn export(path: impl Into<PathBuf>, err: AudioError) -> Self {
        AudioError::Export {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Whether this error aborts a batch instead of failing a single file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AudioError::NotFound { .. } | AudioError::OutputFolder { .. } | AudioError::Config(_)
        )
    }
}

impl From<symphonia::core::errors::Error> for AudioError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        AudioError::DecodeError(err.to_string())
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            e => AudioError::EncodeError(e.to_string()),
        }
    }
}

impl From<tempfile::PersistError> for AudioError {
    fn from(err: tempfile::PersistError) -> Self {
        AudioError::Io(err.error)
    }
}
