use crate::error::{AudioError, AudioResult};
use std::ops::Range;

/// Channel configuration for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Mono (1 channel)
    Mono = 1,
    /// Stereo (2 channels)
    Stereo = 2,
    /// Quad (4 channels)
    Quad = 4,
    /// 5.1 surround sound
    SurroundFivePointOne = 6,
    /// 7.1 surround sound
    SurroundSevenPointOne = 8,
}

impl Channels {
    /// Create Channels from channel count
    pub fn from_count(count: u32) -> AudioResult<Self> {
        match count {
            1 => Ok(Channels::Mono),
            2 => Ok(Channels::Stereo),
            4 => Ok(Channels::Quad),
            6 => Ok(Channels::SurroundFivePointOne),
            8 => Ok(Channels::SurroundSevenPointOne),
            n => Err(AudioError::InvalidChannels {
                expected: 1,
                got: n,
            }),
        }
    }

    /// Get the number of channels
    pub fn count(&self) -> u32 {
        *self as u32
    }

    /// Get channel layout name
    pub fn name(&self) -> &'static str {
        match self {
            Channels::Mono => "Mono",
            Channels::Stereo => "Stereo",
            Channels::Quad => "Quad",
            Channels::SurroundFivePointOne => "5.1 Surround",
            Channels::SurroundSevenPointOne => "7.1 Surround",
        }
    }
}

/// Bit depth of the source samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// 8-bit
    I8,
    /// 16-bit signed
    I16,
    /// 24-bit signed
    I24,
    /// 32-bit signed
    I32,
    /// 32-bit floating point (internal standard)
    F32,
}

impl BitDepth {
    /// Pick the depth for a decoded stream, falling back to float for lossy codecs
    pub fn from_bits(bits: Option<u32>, is_float: bool) -> Self {
        if is_float {
            return BitDepth::F32;
        }
        match bits {
            Some(8) => BitDepth::I8,
            Some(16) => BitDepth::I16,
            Some(24) => BitDepth::I24,
            Some(32) => BitDepth::I32,
            _ => BitDepth::F32,
        }
    }

    /// Bits per sample
    pub fn bits(&self) -> u16 {
        match self {
            BitDepth::I8 => 8,
            BitDepth::I16 => 16,
            BitDepth::I24 => 24,
            BitDepth::I32 | BitDepth::F32 => 32,
        }
    }

    /// Whether samples are stored as floats
    pub fn is_float(&self) -> bool {
        matches!(self, BitDepth::F32)
    }
}

/// Interleaved PCM buffer with its stream layout
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Audio samples (interleaved for multiple channels, f32 from -1.0 to 1.0)
    samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100, 48000, 16000)
    sample_rate: u32,
    /// Number of channels
    channels: Channels,
}

impl AudioFrame {
    /// Create a new audio frame
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: Channels) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        if samples.len() % channels.count() as usize != 0 {
            return Err(AudioError::BufferError(
                "Sample count not divisible by channel count".to_string(),
            ));
        }

        Ok(AudioFrame {
            samples,
            sample_rate,
            channels,
        })
    }

    /// Get reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Get channel configuration
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Get number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        self.samples.len() / self.channels.count() as usize
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples_per_channel() as f64 / self.sample_rate as f64
    }

    /// Check if frame is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Append another frame with the same layout
    pub fn append(&mut self, other: &AudioFrame) -> AudioResult<()> {
        if other.sample_rate != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: other.sample_rate,
            });
        }
        if other.channels != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: other.channels.count(),
            });
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Copy the per-channel frames in `range` into a new frame
    pub fn slice_frames(&self, range: Range<usize>) -> AudioResult<AudioFrame> {
        let total = self.samples_per_channel();
        if range.start > range.end || range.end > total {
            return Err(AudioError::BufferError(format!(
                "Frame range {}..{} out of bounds for {} frames",
                range.start, range.end, total
            )));
        }

        let num_channels = self.channels.count() as usize;
        let samples = self.samples[range.start * num_channels..range.end * num_channels].to_vec();
        AudioFrame::new(samples, self.sample_rate, self.channels)
    }
}

/// Audio metadata/information
#[derive(Debug, Clone)]
pub struct AudioMetadata {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: Channels,
    /// Codec name (e.g., "mp3", "flac", "aac")
    pub codec: String,
    /// Bit depth if known
    pub bit_depth: Option<BitDepth>,
}

impl AudioMetadata {
    /// Create new metadata
    pub fn new(sample_rate: u32, channels: Channels, codec: String) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }

        Ok(AudioMetadata {
            sample_rate,
            channels,
            codec,
            bit_depth: None,
        })
    }

    /// Set bit depth
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = Some(bit_depth);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_from_count() {
        assert_eq!(Channels::from_count(1).unwrap(), Channels::Mono);
        assert_eq!(Channels::from_count(2).unwrap(), Channels::Stereo);
        assert!(Channels::from_count(0).is_err());
        assert!(Channels::from_count(3).is_err());
    }

    #[test]
    fn test_bit_depth_from_bits() {
        assert_eq!(BitDepth::from_bits(Some(16), false), BitDepth::I16);
        assert_eq!(BitDepth::from_bits(Some(24), false), BitDepth::I24);
        assert_eq!(BitDepth::from_bits(Some(32), true), BitDepth::F32);
        assert_eq!(BitDepth::from_bits(None, false), BitDepth::F32);
        assert_eq!(BitDepth::I24.bits(), 24);
        assert!(BitDepth::F32.is_float());
    }

    #[test]
    fn test_audio_frame_creation() {
        let samples = vec![0.1, 0.2, 0.3, 0.4];
        let frame = AudioFrame::new(samples, 44100, Channels::Stereo).unwrap();

        assert_eq!(frame.sample_rate(), 44100);
        assert_eq!(frame.channels(), Channels::Stereo);
        assert_eq!(frame.samples_per_channel(), 2);
    }

    #[test]
    fn test_audio_frame_invalid_samples() {
        // Odd number of samples for stereo should fail
        let samples = vec![0.1, 0.2, 0.3];
        let result = AudioFrame::new(samples, 44100, Channels::Stereo);
        assert!(result.is_err());
    }

    #[test]
    fn test_slice_frames_keeps_interleaving() {
        // L/R pairs: (0, 10), (1, 11), (2, 12), (3, 13)
        let samples = vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 3.0, 13.0];
        let frame = AudioFrame::new(samples, 4, Channels::Stereo).unwrap();

        let slice = frame.slice_frames(1..3).unwrap();
        assert_eq!(slice.samples(), &[1.0, 11.0, 2.0, 12.0]);
        assert_eq!(slice.samples_per_channel(), 2);
        assert!((slice.duration_secs() - 0.5).abs() < f64::EPSILON);

        assert!(frame.slice_frames(3..5).is_err());
    }

    #[test]
    fn test_append_rejects_layout_change() {
        let mut a = AudioFrame::new(vec![0.0; 4], 8000, Channels::Mono).unwrap();
        let b = AudioFrame::new(vec![0.5; 4], 8000, Channels::Mono).unwrap();
        let c = AudioFrame::new(vec![0.5; 4], 16000, Channels::Mono).unwrap();

        a.append(&b).unwrap();
        assert_eq!(a.samples_per_channel(), 8);
        assert!(a.append(&c).is_err());
    }

    #[test]
    fn test_audio_metadata() {
        let metadata = AudioMetadata::new(48000, Channels::Stereo, "mp3".to_string())
            .unwrap()
            .with_bit_depth(BitDepth::I16);

        assert_eq!(metadata.sample_rate, 48000);
        assert_eq!(metadata.channels, Channels::Stereo);
        assert_eq!(metadata.bit_depth, Some(BitDepth::I16));
    }
}
