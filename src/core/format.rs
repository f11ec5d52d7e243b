use std::fmt;
use std::path::Path;

/// Audio container, inferred from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// MPEG-1/2 Layer III
    Mp3,
    /// RIFF WAVE
    Wav,
    /// MPEG-4 audio
    M4a,
    /// Free Lossless Audio Codec
    Flac,
    /// Raw ADTS AAC
    Aac,
    /// Ogg (Vorbis)
    Ogg,
    /// Windows Media Audio
    Wma,
    /// Opus
    Opus,
}

impl AudioFormat {
    /// Every format picked up by discovery
    pub const ALL: [AudioFormat; 8] = [
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::M4a,
        AudioFormat::Flac,
        AudioFormat::Aac,
        AudioFormat::Ogg,
        AudioFormat::Wma,
        AudioFormat::Opus,
    ];

    /// Canonical lowercase extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac => "aac",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Wma => "wma",
            AudioFormat::Opus => "opus",
        }
    }

    /// Match an extension case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Infer the format of `path`, if it has an allowed extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
