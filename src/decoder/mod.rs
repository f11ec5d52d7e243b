//! Audio decoder implementations

pub mod symphonia;

pub use self::symphonia::SymphoniaDecoder;

use crate::core::{AudioFrame, AudioMetadata};
use crate::error::{AudioError, AudioResult};
use std::path::Path;

/// Trait for audio decoders
pub trait Decoder: Send {
    /// Stream properties known before decoding
    fn metadata(&self) -> &AudioMetadata;

    /// Get next audio frame from the stream
    fn decode_frame(&mut self) -> AudioResult<Option<AudioFrame>>;

    /// Decode the remaining stream into a single frame
    fn decode_all(&mut self) -> AudioResult<AudioFrame> {
        let mut whole: Option<AudioFrame> = None;
        while let Some(frame) = self.decode_frame()? {
            if let Some(acc) = whole.as_mut() {
                acc.append(&frame)?;
            } else {
                whole = Some(frame);
            }
        }

        whole
            .filter(|frame| !frame.is_empty())
            .ok_or_else(|| AudioError::DecodeError("No audio decoded".to_string()))
    }
}

/// Create a decoder from a file path
pub fn from_file<P: AsRef<Path>>(path: P) -> AudioResult<Box<dyn Decoder>> {
    SymphoniaDecoder::from_file(path).map(|d| Box::new(d) as Box<dyn Decoder>)
}
