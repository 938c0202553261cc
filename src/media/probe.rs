// SPDX-License-Identifier: MPL-2.0
//! FFmpeg initialisation and container probing.

use crate::error::{Error, MediaError, Result};
use std::path::Path;
use std::sync::Once;

/// Static flag to ensure FFmpeg is initialized only once.
static FFMPEG_INIT: Once = Once::new();

/// Initialize FFmpeg with its own logging lowered to errors only.
///
/// Safe to call repeatedly; only the first call does any work.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Container facts needed before decoding starts.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    /// Total duration in milliseconds (0 when the container does not say).
    pub duration_ms: u64,

    /// A decodable picture stream exists (cover art does not count).
    pub has_video: bool,

    /// An audio stream exists.
    pub has_audio: bool,
}

/// Opens `path` and reads stream layout and duration without decoding.
///
/// # Errors
///
/// Returns [`Error::Media`] when FFmpeg cannot open the file or when it holds
/// neither audio nor video.
pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaInfo> {
    init_ffmpeg()?;

    let path = path.as_ref();
    if !path.exists() {
        return Err(MediaError::Io(format!("File not found: {}", path.display())).into());
    }

    let ictx = ffmpeg_next::format::input(&path)
        .map_err(|e| MediaError::from_message(&format!("Failed to open media: {e}")))?;

    let has_video = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Video)
        .is_some_and(|stream| {
            !stream
                .disposition()
                .contains(ffmpeg_next::format::stream::Disposition::ATTACHED_PIC)
        });
    let has_audio = ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .is_some();

    if !has_video && !has_audio {
        return Err(MediaError::NoPlayableStream.into());
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let duration_ms = if ictx.duration() > 0 {
        // Container duration is in AV_TIME_BASE units (microseconds)
        (ictx.duration() / 1000) as u64
    } else {
        ictx.streams()
            .map(|stream| {
                let tb = stream.time_base();
                if stream.duration() > 0 && tb.denominator() != 0 {
                    (stream.duration() as f64 * f64::from(tb.numerator())
                        / f64::from(tb.denominator())
                        * 1000.0) as u64
                } else {
                    0
                }
            })
            .max()
            .unwrap_or(0)
    };

    Ok(MediaInfo {
        duration_ms,
        has_video,
        has_audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_missing_file_is_io_error() {
        let result = probe("/nonexistent/clip.mp4");
        assert!(matches!(result, Err(Error::Media(MediaError::Io(_)))));
    }

    #[test]
    fn probe_rejects_garbage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("garbage.mp4");
        std::fs::write(&path, b"definitely not a media container").unwrap();

        assert!(matches!(probe(&path), Err(Error::Media(_))));
    }

    #[test]
    fn probe_sample_video_when_present() {
        let path = "tests/data/sample.mp4";
        if !Path::new(path).exists() {
            eprintln!("Test video not found, skipping test");
            return;
        }

        let info = probe(path).unwrap();
        assert!(info.has_video);
        assert!(info.duration_ms > 0);
    }
}
