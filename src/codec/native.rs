use super::{Codec, Opened, write_atomically};
use crate::core::{AudioFormat, AudioFrame, BitDepth};
use crate::decoder;
use crate::encoder::{Encoder, WavEncoder};
use crate::error::{AudioError, AudioResult};
use crate::processor::TrimWindow;
use log::debug;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend: symphonia decodes, hound writes WAV
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

/// Fully decoded PCM plus the depth to write it back at
#[derive(Debug, Clone)]
pub struct DecodedAsset {
    frame: AudioFrame,
    bit_depth: BitDepth,
}

impl Codec for NativeCodec {
    type Handle = DecodedAsset;
    type Clip = DecodedAsset;

    fn name(&self) -> &'static str {
        "native"
    }

    fn output_format(&self, _input: AudioFormat) -> AudioFormat {
        AudioFormat::Wav
    }

    fn open(&self, path: &Path, _format: AudioFormat) -> AudioResult<Opened<DecodedAsset>> {
        let mut decoder = decoder::from_file(path)?;
        let bit_depth = decoder.metadata().bit_depth.unwrap_or(BitDepth::F32);
        let frame = decoder.decode_all()?;

        debug!(
            "decoded {} frames at {} Hz from {}",
            frame.samples_per_channel(),
            frame.sample_rate(),
            path.display()
        );

        Ok(Opened {
            duration_secs: frame.duration_secs(),
            handle: DecodedAsset { frame, bit_depth },
        })
    }

    fn slice(&self, handle: &DecodedAsset, window: &TrimWindow) -> AudioResult<DecodedAsset> {
        let range = window.frame_range(
            handle.frame.sample_rate(),
            handle.frame.samples_per_channel(),
        );
        if range.is_empty() {
            return Err(AudioError::BufferError("Trim window is empty".to_string()));
        }

        Ok(DecodedAsset {
            frame: handle.frame.slice_frames(range)?,
            bit_depth: handle.bit_depth,
        })
    }

    fn export(&self, clip: &DecodedAsset, output: &Path, format: AudioFormat) -> AudioResult<()> {
        if format != AudioFormat::Wav {
            return Err(AudioError::UnsupportedFormat(format!(
                "native backend cannot encode {}",
                format
            )));
        }

        write_atomically(output, |staged| {
            let mut encoder = WavEncoder::new(
                BufWriter::new(staged.as_file_mut()),
                clip.frame.sample_rate(),
                clip.frame.channels(),
                clip.bit_depth,
            )?;
            encoder.encode(&clip.frame)?;
            encoder.finalize()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Channels;
    use crate::processor::TrimPlan;
    use tempfile::tempdir;

    fn asset(seconds: usize, rate: u32) -> DecodedAsset {
        let samples = (0..seconds * rate as usize).map(|i| (i % 7) as f32 / 8.0).collect();
        DecodedAsset {
            frame: AudioFrame::new(samples, rate, Channels::Mono).unwrap(),
            bit_depth: BitDepth::I16,
        }
    }

    #[test]
    fn test_slice_window() {
        let handle = asset(10, 100);
        let window = TrimPlan::default().window(10.0).unwrap();

        let clip = NativeCodec.slice(&handle, &window).unwrap();
        assert_eq!(clip.frame.samples_per_channel(), 600);
        assert_eq!(clip.frame.samples()[0], handle.frame.samples()[200]);
    }

    #[test]
    fn test_export_rejects_other_containers() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.mp3");

        let result = NativeCodec.export(&asset(1, 100), &output, AudioFormat::Mp3);
        assert!(matches!(result, Err(AudioError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_export_open_round_trip() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("a.wav");

        NativeCodec
            .export(&asset(3, 8000), &output, AudioFormat::Wav)
            .unwrap();

        let opened = NativeCodec.open(&output, AudioFormat::Wav).unwrap();
        assert!((opened.duration_secs - 3.0).abs() < 1e-9);
        assert_eq!(opened.handle.bit_depth, BitDepth::I16);
    }
}
