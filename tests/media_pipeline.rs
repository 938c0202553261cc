// SPDX-License-Identifier: MPL-2.0
//! Probing and decoding against real media files.
//!
//! Sample files live in `tests/data/`; tests that need one return early
//! when it is missing.

use smart_player::engine::audio::{AudioDecoder, AudioDecoderEvent};
use smart_player::engine::audio_output::AudioOutputConfig;
use smart_player::engine::decoder::{DecoderCommand, DecoderEvent, VideoDecoder};
use smart_player::media::{self, probe};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const VIDEO_SAMPLE: &str = "tests/data/sample.mp4";
const AUDIO_SAMPLE: &str = "tests/data/sample.mp3";

fn sample(path: &str) -> Option<&Path> {
    let path = Path::new(path);
    if path.exists() {
        media::init_ffmpeg().expect("FFmpeg should initialize");
        Some(path)
    } else {
        None
    }
}

#[test]
fn probe_rejects_missing_file() {
    media::init_ffmpeg().expect("FFmpeg should initialize");
    assert!(probe("tests/data/does-not-exist.mp4").is_err());
}

#[test]
fn probe_rejects_non_media_file() {
    media::init_ffmpeg().expect("FFmpeg should initialize");
    let mut file = tempfile::Builder::new()
        .suffix(".mp4")
        .tempfile()
        .expect("temp file");
    file.write_all(b"this is not a video, just some text")
        .expect("write temp file");

    assert!(probe(file.path()).is_err());
}

#[test]
fn probe_reads_video_sample() {
    let Some(path) = sample(VIDEO_SAMPLE) else {
        return;
    };

    let info = probe(path).expect("sample should probe");
    assert!(info.has_video);
    assert!(info.duration_ms > 0);
}

#[test]
fn video_decoder_rejects_missing_file() {
    assert!(VideoDecoder::new("tests/data/does-not-exist.mp4").is_err());
}

#[test]
fn video_decoder_produces_first_frame() {
    let Some(path) = sample(VIDEO_SAMPLE) else {
        return;
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    rt.block_on(async {
        let mut decoder = VideoDecoder::new(path).expect("decoder should start");

        let frame = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match decoder.recv_event().await {
                    Some(DecoderEvent::FrameReady(frame)) => return frame,
                    Some(DecoderEvent::Error(msg)) => panic!("decoding error: {msg}"),
                    Some(DecoderEvent::EndOfStream) | None => {
                        panic!("stream ended without a frame")
                    }
                    Some(_) => {}
                }
            }
        })
        .await
        .expect("first frame timed out");

        assert!(frame.width > 0 && frame.height > 0);
        assert_eq!(frame.rgba.len(), (frame.width * frame.height * 4) as usize);

        let _ = decoder.send_command(DecoderCommand::Stop);
    });
}

#[test]
fn video_seek_acknowledges_before_new_frames() {
    let Some(path) = sample(VIDEO_SAMPLE) else {
        return;
    };
    let info = probe(path).expect("sample should probe");
    if info.duration_ms < 2_000 {
        return;
    }
    #[allow(clippy::cast_precision_loss)]
    let target_secs = info.duration_ms as f64 / 2000.0;

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    rt.block_on(async {
        let mut decoder = VideoDecoder::new(path).expect("decoder should start");
        decoder
            .send_command(DecoderCommand::Seek { target_secs })
            .expect("seek should be accepted");

        let frame = tokio::time::timeout(Duration::from_secs(5), async {
            let mut acknowledged = false;
            loop {
                match decoder.recv_event().await {
                    Some(DecoderEvent::Seeked { .. }) => acknowledged = true,
                    Some(DecoderEvent::FrameReady(frame)) if acknowledged => return frame,
                    Some(DecoderEvent::Error(msg)) => panic!("decoding error: {msg}"),
                    None => panic!("decoder exited"),
                    Some(_) => {}
                }
            }
        })
        .await
        .expect("post-seek frame timed out");

        // Keyframe alignment may land slightly before the target
        assert!(frame.pts_secs >= target_secs - 1.0);

        let _ = decoder.send_command(DecoderCommand::Stop);
    });
}

#[test]
fn audio_decoder_produces_buffers_while_playing() {
    let Some(path) = sample(AUDIO_SAMPLE) else {
        return;
    };
    let config = AudioOutputConfig {
        sample_rate: 48_000,
        channels: 2,
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    rt.block_on(async {
        let mut decoder = AudioDecoder::new(path, config).expect("decoder should start");
        decoder
            .send_command(DecoderCommand::Play)
            .expect("play should be accepted");

        let audio = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match decoder.recv_event().await {
                    Some(AudioDecoderEvent::BufferReady(audio)) => return audio,
                    Some(AudioDecoderEvent::Error(msg)) => panic!("decoding error: {msg}"),
                    Some(AudioDecoderEvent::EndOfStream) | None => {
                        panic!("stream ended without audio")
                    }
                    Some(_) => {}
                }
            }
        })
        .await
        .expect("first buffer timed out");

        assert_eq!(audio.channels, 2);
        assert_eq!(audio.sample_rate, 48_000);
        assert!(audio.frame_count() > 0);

        let _ = decoder.send_command(DecoderCommand::Stop);
    });
}
