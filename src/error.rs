// SPDX-License-Identifier: MPL-2.0
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Media(MediaError),
}

/// Categorised playback failures.
///
/// The engine turns raw FFmpeg/cpal messages into one of these so the window
/// can show a readable reason next to the file name.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaError {
    /// File format is not recognised by FFmpeg.
    UnsupportedFormat,

    /// A stream uses a codec the local FFmpeg build cannot decode.
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data.
    CorruptedFile,

    /// File opened but holds neither an audio nor a video stream.
    NoPlayableStream,

    /// Decoding failed during playback.
    DecodingFailed(String),

    /// I/O error (file not found, permission denied, etc.)
    Io(String),

    /// The audio output device could not be opened or failed mid-stream.
    AudioDevice(String),

    /// Generic error with raw message.
    Other(String),
}

impl MediaError {
    /// Attempts to parse a raw error message into a specific `MediaError`.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("audio device") || msg_lower.contains("audio output") {
            return MediaError::AudioDevice(msg.to_string());
        }

        // Codec/decoder errors first (they might contain "not found")
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return MediaError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return MediaError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || (msg_lower.contains("not found") && !msg_lower.contains("decoder"))
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return MediaError::Io(msg.to_string());
        }

        if msg_lower.contains("no playable stream") || msg_lower.contains("no audio or video") {
            return MediaError::NoPlayableStream;
        }

        if msg_lower.contains("unknown format") || msg_lower.contains("format not supported") {
            return MediaError::UnsupportedFormat;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return MediaError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("resampl")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
            || msg_lower.contains("unsupported")
        {
            return MediaError::DecodingFailed(msg.to_string());
        }

        MediaError::Other(msg.to_string())
    }

    /// Tries to extract a codec name from an error message.
    fn extract_codec_name(msg: &str) -> Option<String> {
        let codecs = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2", "wmv", "flv", "aac",
            "mp3", "vorbis", "opus", "ac3",
        ];
        codecs
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaError::UnsupportedFormat => write!(f, "Unsupported media format"),
            MediaError::UnsupportedCodec(codec) => write!(f, "Unsupported codec: {}", codec),
            MediaError::CorruptedFile => write!(f, "Media file is corrupted"),
            MediaError::NoPlayableStream => write!(f, "No audio or video stream found"),
            MediaError::DecodingFailed(msg) => write!(f, "Decoding failed: {}", msg),
            MediaError::Io(msg) => write!(f, "I/O error: {}", msg),
            MediaError::AudioDevice(msg) => write!(f, "Audio device error: {}", msg),
            MediaError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Media(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<MediaError> for Error {
    fn from(err: MediaError) -> Self {
        Error::Media(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn media_error_display_is_passed_through() {
        let err: Error = MediaError::NoPlayableStream.into();
        assert_eq!(err.to_string(), "No audio or video stream found");
    }

    #[test]
    fn from_message_io() {
        let err = MediaError::from_message("No such file or directory");
        assert!(matches!(err, MediaError::Io(_)));
    }

    #[test]
    fn from_message_no_stream() {
        let err = MediaError::from_message("File has no audio or video stream");
        assert_eq!(err, MediaError::NoPlayableStream);
    }

    #[test]
    fn from_message_codec() {
        let err = MediaError::from_message("Decoder h264 not found");
        assert!(matches!(err, MediaError::UnsupportedCodec(codec) if codec == "H264"));
    }

    #[test]
    fn from_message_corrupted() {
        let err = MediaError::from_message("Invalid data found when processing input");
        assert_eq!(err, MediaError::CorruptedFile);
    }

    #[test]
    fn from_message_decoding() {
        let err = MediaError::from_message("Packet send failed: error");
        assert!(matches!(err, MediaError::DecodingFailed(_)));
    }

    #[test]
    fn from_message_audio_device() {
        let err = MediaError::from_message("No audio output device found");
        assert!(matches!(err, MediaError::AudioDevice(_)));
    }

    #[test]
    fn from_message_falls_back_to_other() {
        let err = MediaError::from_message("something odd happened");
        assert_eq!(err, MediaError::Other("something odd happened".to_string()));
        assert_eq!(err.to_string(), "something odd happened");
    }
}
