use crate::core::{AudioFrame, AudioMetadata, BitDepth, Channels};
use crate::error::{AudioError, AudioResult};
use log::debug;
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::SampleFormat;

/// Malformed packets tolerated in a row before decoding gives up
const MAX_CONSECUTIVE_DECODE_ERRORS: usize = 100;

/// Run of recoverable decode errors since the last good packet
#[derive(Debug, Default)]
struct ErrorRun {
    count: usize,
}

impl ErrorRun {
    fn record(&mut self, err: &str) -> AudioResult<()> {
        self.count += 1;
        if self.count > MAX_CONSECUTIVE_DECODE_ERRORS {
            return Err(AudioError::DecodeError(format!(
                "{} consecutive malformed packets, last: {}",
                self.count, err
            )));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

/// Symphonia-based audio decoder
pub struct SymphoniaDecoder {
    /// Current reader for the audio source
    reader: Box<dyn FormatReader>,
    /// Track information
    track_id: u32,
    /// Stream properties read from the container
    metadata: AudioMetadata,
    /// Whether decoding is finished
    finished: bool,
    /// Malformed packets seen in a row
    errors: ErrorRun,
    /// Current decoder state
    decoder: Box<dyn symphonia::core::codecs::Decoder>,
}

impl SymphoniaDecoder {
    /// Create decoder from file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Self> {
        let path = path.as_ref();

        let file = Box::new(File::open(path)?);
        let mss = MediaSourceStream::new(file, Default::default());

        // Probe the file to detect format
        let mut hint = Hint::new();
        if let Some(ext_str) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(ext_str);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        let reader = probed.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::InvalidMetadata("No audio track found".to_string()))?
            .clone();

        let track_id = track.id;
        let codec_params = &track.codec_params;

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| AudioError::InvalidMetadata("Unknown sample rate".to_string()))?;

        let channels = match codec_params.channels {
            Some(channels) => Channels::from_count(channels.count() as u32)?,
            None => {
                return Err(AudioError::InvalidMetadata(
                    "Unknown channel count".to_string(),
                ));
            }
        };

        let codec_name = symphonia::default::get_codecs()
            .get_codec(codec_params.codec)
            .map(|descriptor| descriptor.short_name)
            .unwrap_or("unknown");

        let is_float = matches!(
            codec_params.sample_format,
            Some(SampleFormat::F32) | Some(SampleFormat::F64)
        );
        let bit_depth = BitDepth::from_bits(codec_params.bits_per_sample, is_float);

        let metadata = AudioMetadata::new(sample_rate, channels, codec_name.to_string())?
            .with_bit_depth(bit_depth);

        let decoder = symphonia::default::get_codecs()
            .make(codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeError(e.to_string()))?;

        debug!(
            "opened {} ({}, {} Hz, {})",
            path.display(),
            codec_name,
            sample_rate,
            channels.name()
        );

        Ok(SymphoniaDecoder {
            reader,
            track_id,
            metadata,
            finished: false,
            errors: ErrorRun::default(),
            decoder,
        })
    }
}

impl super::Decoder for SymphoniaDecoder {
    fn metadata(&self) -> &AudioMetadata {
        &self.metadata
    }

    fn decode_frame(&mut self) -> AudioResult<Option<AudioFrame>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    self.finished = true;
                    return Ok(None);
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    debug!("skipping malformed packet: {}", e);
                    self.errors.record(e)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            // Only process packets from our audio track
            if packet.track_id() != self.track_id {
                continue;
            }

            let audio_buf = match self.decoder.decode(&packet) {
                Ok(audio_buf) => audio_buf,
                Err(SymphoniaError::DecodeError(e)) => {
                    debug!("skipping undecodable packet: {}", e);
                    self.errors.record(e)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            self.errors.reset();

            if audio_buf.frames() == 0 {
                continue;
            }

            let spec = *audio_buf.spec();
            let channels = Channels::from_count(spec.channels.count() as u32)?;
            let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
            sample_buf.copy_interleaved_ref(audio_buf);

            let frame = AudioFrame::new(sample_buf.samples().to_vec(), spec.rate, channels)?;
            return Ok(Some(frame));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use hound::{SampleFormat as WavFormat, WavSpec, WavWriter};
    use tempfile::tempdir;

    #[test]
    fn test_invalid_file() {
        let result = SymphoniaDecoder::from_file("/nonexistent/file.mp3");
        assert!(matches!(result, Err(AudioError::Io(_))));
    }

    #[test]
    fn test_garbage_is_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"this is not a flac stream at all").unwrap();

        let result = SymphoniaDecoder::from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_pcm_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: WavFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for i in 0..8000i32 {
            writer.write_sample((i % 100) as i16).unwrap();
            writer.write_sample(-((i % 100) as i16)).unwrap();
        }
        writer.finalize().unwrap();

        let mut decoder = SymphoniaDecoder::from_file(&path).unwrap();
        assert_eq!(decoder.metadata().sample_rate, 8000);
        assert_eq!(decoder.metadata().channels, Channels::Stereo);
        assert_eq!(decoder.metadata().bit_depth, Some(BitDepth::I16));

        let frame = decoder.decode_all().unwrap();
        assert!(decoder.decode_frame().unwrap().is_none());
        assert_eq!(frame.samples_per_channel(), 8000);
        assert!((frame.samples()[2] - 1.0 / 32768.0).abs() < 1e-6);
        assert!((frame.samples()[3] + 1.0 / 32768.0).abs() < 1e-6);
    }

    #[test]
    fn test_error_run_gives_up_after_limit() {
        let mut run = ErrorRun::default();
        for _ in 0..MAX_CONSECUTIVE_DECODE_ERRORS {
            run.record("bad frame").unwrap();
        }
        let err = run.record("bad frame").unwrap_err();
        assert!(matches!(err, AudioError::DecodeError(_)));
        assert!(err.to_string().contains("101 consecutive malformed packets"));
    }

    #[test]
    fn test_error_run_resets_on_good_packet() {
        let mut run = ErrorRun::default();
        for _ in 0..3 {
            for _ in 0..MAX_CONSECUTIVE_DECODE_ERRORS {
                run.record("bad frame").unwrap();
            }
            run.reset();
        }
        assert!(run.record("bad frame").is_ok());
    }
}
