use crate::core::{AudioFrame, BitDepth, Channels};
use crate::error::{AudioError, AudioResult};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::{Seek, Write};

/// WAV audio encoder
pub struct WavEncoder<W: Write + Seek> {
    writer: Option<WavWriter<W>>,
    sample_rate: u32,
    channels: Channels,
    bit_depth: BitDepth,
}

impl<W: Write + Seek> WavEncoder<W> {
    /// Create a WAV encoder over an already opened writer
    pub fn new(
        inner: W,
        sample_rate: u32,
        channels: Channels,
        bit_depth: BitDepth,
    ) -> AudioResult<Self> {
        let writer = WavWriter::new(inner, wav_spec(sample_rate, channels, bit_depth))?;
        Ok(WavEncoder {
            writer: Some(writer),
            sample_rate,
            channels,
            bit_depth,
        })
    }
}

fn wav_spec(sample_rate: u32, channels: Channels, bit_depth: BitDepth) -> WavSpec {
    WavSpec {
        channels: channels.count() as u16,
        sample_rate,
        bits_per_sample: bit_depth.bits(),
        sample_format: if bit_depth.is_float() {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    }
}

/// Scale a float sample back to a signed integer of `bits` width
fn to_int(sample: f32, bits: u16) -> i32 {
    let scale = (1i64 << (bits - 1)) as f64;
    (sample as f64 * scale).round().clamp(-scale, scale - 1.0) as i32
}

impl<W: Write + Seek> super::Encoder for WavEncoder<W> {
    fn encode(&mut self, frame: &AudioFrame) -> AudioResult<()> {
        if frame.sample_rate() != self.sample_rate {
            return Err(AudioError::InvalidSampleRate {
                rate: frame.sample_rate(),
            });
        }

        if frame.channels() != self.channels {
            return Err(AudioError::InvalidChannels {
                expected: self.channels.count(),
                got: frame.channels().count(),
            });
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AudioError::EncodeError("Encoder already finalized".to_string()))?;

        if self.bit_depth.is_float() {
            for &sample in frame.samples() {
                writer.write_sample(sample)?;
            }
        } else {
            let bits = self.bit_depth.bits();
            for &sample in frame.samples() {
                writer.write_sample(to_int(sample, bits))?;
            }
        }

        Ok(())
    }

    fn finalize(&mut self) -> AudioResult<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}
