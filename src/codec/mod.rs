//! Codec backends: decode an asset, cut a window out of it, write it back out
//!
//! Handles are plain owned values, so whatever a backend holds open (decoder
//! state, file descriptors) is released when the handle is dropped.

pub mod ffmpeg;
pub mod native;

pub use ffmpeg::FfmpegCodec;
pub use native::NativeCodec;

use crate::config::BackendKind;
use crate::core::AudioFormat;
use crate::error::AudioResult;
use crate::processor::TrimWindow;
use log::{info, warn};
use std::path::Path;
use tempfile::NamedTempFile;

/// Name prefix of the scratch files exports are staged in
pub const TEMP_PREFIX: &str = ".audio-trim-";

/// An opened asset and its decoded length
#[derive(Debug)]
pub struct Opened<H> {
    /// Length of the asset in seconds
    pub duration_secs: f64,
    /// Backend state for later `slice` calls
    pub handle: H,
}

/// Capability interface over an audio codec library
pub trait Codec {
    /// State produced by `open`
    type Handle;
    /// Extracted window ready for export
    type Clip;

    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Container written for an input of `input` format
    fn output_format(&self, input: AudioFormat) -> AudioFormat;

    /// Open `path` and determine its duration
    fn open(&self, path: &Path, format: AudioFormat) -> AudioResult<Opened<Self::Handle>>;

    /// Extract `window` from an opened asset
    fn slice(&self, handle: &Self::Handle, window: &TrimWindow) -> AudioResult<Self::Clip>;

    /// Write `clip` to `output` in `format`
    fn export(&self, clip: &Self::Clip, output: &Path, format: AudioFormat) -> AudioResult<()>;
}

/// A concrete backend picked from configuration
#[derive(Debug, Clone)]
pub enum Backend {
    /// symphonia decode + hound WAV encode
    Native(NativeCodec),
    /// ffprobe/ffmpeg processes
    Ffmpeg(FfmpegCodec),
}

impl Backend {
    /// Pick a backend; `Auto` prefers ffmpeg when its binaries can be run
    pub fn resolve(kind: BackendKind, ffmpeg: FfmpegCodec) -> Self {
        match kind {
            BackendKind::Native => Backend::Native(NativeCodec),
            BackendKind::Ffmpeg => Backend::Ffmpeg(ffmpeg),
            BackendKind::Auto => {
                if ffmpeg.is_available() {
                    info!("Using ffmpeg backend (output keeps the input format)");
                    Backend::Ffmpeg(ffmpeg)
                } else {
                    warn!("ffmpeg/ffprobe not found, using native backend (output is WAV)");
                    Backend::Native(NativeCodec)
                }
            }
        }
    }
}

/// Stage `output` in a sibling temp file and rename it into place once `write` succeeds.
///
/// On failure the temp file is removed and nothing appears at `output`.
pub(crate) fn write_atomically<F>(output: &Path, write: F) -> AudioResult<()>
where
    F: FnOnce(&mut NamedTempFile) -> AudioResult<()>,
{
    let dir = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    // ffmpeg picks the muxer from the extension
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut staged = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(&suffix)
        .tempfile_in(dir)?;

    match write(&mut staged) {
        Ok(()) => {
            staged.persist(output)?;
            Ok(())
        }
        Err(err) => {
            let staged_path = staged.path().to_path_buf();
            if let Err(cleanup) = staged.close() {
                warn!(
                    "Could not remove temporary file {}: {}",
                    staged_path.display(),
                    cleanup
                );
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;
    use std::io::Write;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_atomically_persists() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.wav");
        std::fs::write(&output, b"old").unwrap();

        write_atomically(&output, |file| {
            file.write_all(b"new")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"new");
        assert_eq!(entries(dir.path()), vec!["out.wav"]);
    }

    #[test]
    fn test_write_atomically_leaves_nothing_on_failure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.wav");

        let result = write_atomically(&output, |file| {
            file.write_all(b"half a hea")?;
            Err(AudioError::EncodeError("disk full".to_string()))
        });

        assert!(result.is_err());
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_resolve_explicit_kinds() {
        let ffmpeg = FfmpegCodec::new("ffmpeg", "ffprobe");
        assert!(matches!(
            Backend::resolve(BackendKind::Native, ffmpeg.clone()),
            Backend::Native(_)
        ));
        assert!(matches!(
            Backend::resolve(BackendKind::Ffmpeg, ffmpeg),
            Backend::Ffmpeg(_)
        ));
    }

    #[test]
    fn test_auto_falls_back_to_native() {
        let missing = FfmpegCodec::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        assert!(matches!(
            Backend::resolve(BackendKind::Auto, missing),
            Backend::Native(_)
        ));
    }
}
