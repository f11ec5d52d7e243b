//! Batch configuration: defaults plus `AUDIO_TRIM_*` environment overrides

use crate::codec::FfmpegCodec;
use crate::error::{AudioError, AudioResult};
use crate::processor::TrimPlan;
use crate::processor::plan::{DEFAULT_END_OFFSET_SECS, DEFAULT_START_OFFSET_SECS};
use std::path::PathBuf;
use std::str::FromStr;

/// Start offset in seconds
pub const ENV_START: &str = "AUDIO_TRIM_START_SECS";
/// End offset in seconds
pub const ENV_END: &str = "AUDIO_TRIM_END_SECS";
/// `auto`, `native` or `ffmpeg`
pub const ENV_BACKEND: &str = "AUDIO_TRIM_BACKEND";
/// ffmpeg binary
pub const ENV_FFMPEG: &str = "AUDIO_TRIM_FFMPEG";
/// ffprobe binary
pub const ENV_FFPROBE: &str = "AUDIO_TRIM_FFPROBE";

/// Which codec backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// ffmpeg when installed, otherwise native
    #[default]
    Auto,
    /// symphonia + hound, WAV output
    Native,
    /// ffprobe + ffmpeg, input format preserved
    Ffmpeg,
}

impl FromStr for BackendKind {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendKind::Auto),
            "native" => Ok(BackendKind::Native),
            "ffmpeg" => Ok(BackendKind::Ffmpeg),
            other => Err(AudioError::Config(format!(
                "unknown backend {:?} (expected auto, native or ffmpeg)",
                other
            ))),
        }
    }
}

/// Everything a batch run needs
#[derive(Debug, Clone)]
pub struct TrimConfig {
    /// Folder scanned for audio files
    pub input_folder: PathBuf,
    /// Destination; `None` means `<input>/trimmed`
    pub output_folder: Option<PathBuf>,
    /// Offsets to remove
    pub plan: TrimPlan,
    /// Codec backend
    pub backend: BackendKind,
    /// ffmpeg binary
    pub ffmpeg: PathBuf,
    /// ffprobe binary
    pub ffprobe: PathBuf,
}

impl TrimConfig {
    /// Defaults for the given folders
    pub fn new(input_folder: impl Into<PathBuf>, output_folder: Option<PathBuf>) -> Self {
        TrimConfig {
            input_folder: input_folder.into(),
            output_folder,
            plan: TrimPlan::default(),
            backend: BackendKind::default(),
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> AudioResult<Self> {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps variable names to values
    pub fn with_lookup<F>(mut self, lookup: F) -> AudioResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let start = parse_secs(ENV_START, lookup(ENV_START))?.unwrap_or(DEFAULT_START_OFFSET_SECS);
        let end = parse_secs(ENV_END, lookup(ENV_END))?.unwrap_or(DEFAULT_END_OFFSET_SECS);
        self.plan = TrimPlan::new(start, end)?;

        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend.parse()?;
        }
        if let Some(ffmpeg) = lookup(ENV_FFMPEG).filter(|v| !v.is_empty()) {
            self.ffmpeg = PathBuf::from(ffmpeg);
        }
        if let Some(ffprobe) = lookup(ENV_FFPROBE).filter(|v| !v.is_empty()) {
            self.ffprobe = PathBuf::from(ffprobe);
        }

        Ok(self)
    }

    /// The ffmpeg backend described by this config
    pub fn ffmpeg_codec(&self) -> FfmpegCodec {
        FfmpegCodec::new(&self.ffmpeg, &self.ffprobe)
    }
}

fn parse_secs(key: &str, value: Option<String>) -> AudioResult<Option<f64>> {
    value
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| AudioError::Config(format!("{} must be a number, got {:?}", key, v)))
        })
        .transpose()
}
