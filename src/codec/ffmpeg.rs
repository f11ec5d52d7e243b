use super::{Codec, Opened, write_atomically};
use crate::core::AudioFormat;
use crate::error::{AudioError, AudioResult};
use crate::processor::TrimWindow;
use log::debug;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

/// Backend driving external `ffprobe` and `ffmpeg` binaries
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

/// A probed source file; nothing stays open between calls
#[derive(Debug, Clone)]
pub struct ProbedAsset {
    path: PathBuf,
}

/// Source file plus the span to cut out of it
#[derive(Debug, Clone)]
pub struct FfmpegClip {
    source: PathBuf,
    window: TrimWindow,
}

impl FfmpegCodec {
    /// Use the given binaries (bare names are looked up on `PATH`)
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        FfmpegCodec {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Whether both binaries can be executed
    pub fn is_available(&self) -> bool {
        [&self.ffmpeg, &self.ffprobe].into_iter().all(|bin| {
            Command::new(bin)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false)
        })
    }

    fn run(bin: &Path, args: &[OsString]) -> AudioResult<Output> {
        debug!("running {} {:?}", bin.display(), args);

        let output = Command::new(bin)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| AudioError::Tool {
                tool: bin.display().to_string(),
                message: format!("cannot execute: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::Tool {
                tool: bin.display().to_string(),
                message: format!("{} ({})", stderr.trim(), output.status),
            });
        }

        Ok(output)
    }
}

impl Default for FfmpegCodec {
    fn default() -> Self {
        FfmpegCodec::new("ffmpeg", "ffprobe")
    }
}

/// Arguments asking ffprobe for the container duration only
pub(crate) fn probe_args(path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "default=noprint_wrappers=1:nokey=1",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(path.as_os_str().to_owned());
    args
}

/// Parse ffprobe's bare duration output
pub(crate) fn parse_probe_duration(stdout: &str) -> AudioResult<f64> {
    let text = stdout.trim();
    let duration: f64 = text
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .parse()
        .map_err(|_| AudioError::InvalidMetadata(format!("Unknown duration: {:?}", text)))?;

    if !duration.is_finite() || duration < 0.0 {
        return Err(AudioError::InvalidMetadata(format!(
            "Invalid duration: {}",
            duration
        )));
    }
    Ok(duration)
}

/// Arguments re-encoding `window` of `source` into `dest`
pub(crate) fn export_args(source: &Path, window: &TrimWindow, dest: &Path) -> Vec<OsString> {
    let start = format!("{:.3}", window.start_secs);
    let len = format!("{:.3}", window.len_secs());

    // -ss before -i seeks the input; re-encoding keeps the cut sample accurate
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-nostdin",
        "-loglevel",
        "error",
        "-y",
        "-ss",
        start.as_str(),
        "-i",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(source.as_os_str().to_owned());
    args.extend(
        ["-t", len.as_str(), "-vn", "-map_metadata", "0"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(dest.as_os_str().to_owned());
    args
}

impl Codec for FfmpegCodec {
    type Handle = ProbedAsset;
    type Clip = FfmpegClip;

    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn output_format(&self, input: AudioFormat) -> AudioFormat {
        input
    }

    fn open(&self, path: &Path, _format: AudioFormat) -> AudioResult<Opened<ProbedAsset>> {
        if !path.is_file() {
            return Err(AudioError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a readable file", path.display()),
            )));
        }

        let output = Self::run(&self.ffprobe, &probe_args(path))?;
        let duration_secs = parse_probe_duration(&String::from_utf8_lossy(&output.stdout))?;

        Ok(Opened {
            duration_secs,
            handle: ProbedAsset {
                path: path.to_path_buf(),
            },
        })
    }

    fn slice(&self, handle: &ProbedAsset, window: &TrimWindow) -> AudioResult<FfmpegClip> {
        if window.len_secs() <= 0.0 {
            return Err(AudioError::BufferError("Trim window is empty".to_string()));
        }

        Ok(FfmpegClip {
            source: handle.path.clone(),
            window: *window,
        })
    }

    fn export(&self, clip: &FfmpegClip, output: &Path, _format: AudioFormat) -> AudioResult<()> {
        write_atomically(output, |staged| {
            Self::run(&self.ffmpeg, &export_args(&clip.source, &clip.window, staged.path()))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{BatchTrimmer, TrimPlan};
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    #[test]
    fn test_parse_probe_duration() {
        assert_eq!(parse_probe_duration("10.031000\n").unwrap(), 10.031);
        assert_eq!(parse_probe_duration("  3\n").unwrap(), 3.0);
        assert!(parse_probe_duration("N/A\n").is_err());
        assert!(parse_probe_duration("").is_err());
        assert!(parse_probe_duration("-1.0").is_err());
    }

    #[test]
    fn test_probe_args_end_with_path() {
        let args = probe_args(Path::new("in dir/a.mp3"));
        assert_eq!(args.last().unwrap(), "in dir/a.mp3");
        assert!(args.contains(&OsString::from("format=duration")));
    }

    #[test]
    fn test_export_args() {
        let window = TrimPlan::default().window(10.0).unwrap();
        let args = export_args(Path::new("a.mp3"), &window, Path::new("out/a.mp3"));
        let args: Vec<String> = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "2.000");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "6.000");
        assert!(ss < args.iter().position(|a| a == "-i").unwrap());
        assert_eq!(args.last().unwrap(), "out/a.mp3");
    }

    #[test]
    fn test_preserves_input_format() {
        assert_eq!(FfmpegCodec::default().output_format(AudioFormat::Flac), AudioFormat::Flac);
        assert_eq!(FfmpegCodec::default().output_format(AudioFormat::M4a), AudioFormat::M4a);
    }

    #[test]
    fn test_missing_binary() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("a.mp3");
        std::fs::write(&input, b"whatever").unwrap();

        let codec = FfmpegCodec::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        assert!(!codec.is_available());
        assert!(matches!(
            codec.open(&input, AudioFormat::Mp3),
            Err(AudioError::Tool { .. })
        ));
    }

    #[test]
    fn test_failed_export_leaves_no_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.mp3");
        let clip = FfmpegClip {
            source: dir.path().join("a-src.mp3"),
            window: TrimPlan::default().window(10.0).unwrap(),
        };

        let codec = FfmpegCodec::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        assert!(codec.export(&clip, &output, AudioFormat::Mp3).is_err());
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_trims_through_ffmpeg() {
        let codec = FfmpegCodec::default();
        if !codec.is_available() {
            eprintln!("ffmpeg/ffprobe not installed, skipping ffmpeg round trip");
            return;
        }

        let dir = tempdir().unwrap();
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(dir.path().join("a.wav"), spec).unwrap();
        for i in 0..80_000u32 {
            writer.write_sample(((i % 200) as i16 - 100) * 100).unwrap();
        }
        writer.finalize().unwrap();

        let result = BatchTrimmer::new(codec, TrimPlan::default())
            .run(dir.path(), None)
            .unwrap();
        assert_eq!(result.processed, 1);
        assert_eq!(result.failed, 0);

        let reader = hound::WavReader::open(dir.path().join("trimmed").join("a.wav")).unwrap();
        let secs = reader.duration() as f64 / reader.spec().sample_rate as f64;
        assert!((secs - 6.0).abs() < 0.02, "trimmed to {secs}s");
    }
}
