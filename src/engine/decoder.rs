// SPDX-License-Identifier: MPL-2.0
//! Video frame decoder running on a blocking Tokio thread.
//!
//! Frames are converted to RGBA and paced against the wall clock, then
//! delivered through a small bounded channel so a slow UI applies
//! backpressure instead of piling up frames.

use crate::config::MAX_SEEK_SKIP_FRAMES;
use crate::error::{Error, MediaError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A decoded video frame ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// RGBA pixel data (width × height × 4 bytes).
    pub rgba: Arc<Vec<u8>>,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

impl VideoFrame {
    /// Presentation timestamp in whole milliseconds.
    #[must_use]
    pub fn position_ms(&self) -> u64 {
        secs_to_ms(self.pts_secs)
    }
}

/// Converts a (possibly negative) timestamp in seconds to milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn secs_to_ms(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round() as u64
    } else {
        0
    }
}

/// Commands sent to the decoder thread.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderCommand {
    /// Start or resume decoding at wall-clock pace.
    Play,

    /// Stop delivering frames, keep the position.
    Pause,

    /// Jump to a timestamp. While paused, the frame at the target is shown.
    Seek { target_secs: f64 },

    /// Terminate the thread.
    Stop,
}

/// Events sent from the decoder thread.
#[derive(Debug, Clone)]
pub enum DecoderEvent {
    /// A new frame is ready for display.
    FrameReady(VideoFrame),

    /// Decoding (re)started after play or seek.
    Buffering,

    /// A seek was applied; every frame after this event is post-seek.
    Seeked { target_secs: f64 },

    /// No more frames in the stream.
    EndOfStream,

    /// Something went wrong decoding.
    Error(String),
}

/// Handle to a video decoder thread.
pub struct VideoDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,
    event_rx: mpsc::Receiver<DecoderEvent>,
}

/// Mutable state of the decoder loop.
struct LoopState {
    is_playing: bool,
    /// Decode exactly one frame even though paused (initial frame, paused seek).
    show_single_frame: bool,
    playback_start_time: Option<Instant>,
    first_pts: Option<f64>,
    /// Frames before this timestamp are decoded but not shown.
    seek_target_secs: Option<f64>,
    seek_frames_skipped: u32,
    /// End of input reached; the decoder is being drained.
    draining: bool,
}

impl LoopState {
    fn new() -> Self {
        Self {
            is_playing: false,
            show_single_frame: true,
            playback_start_time: None,
            first_pts: None,
            seek_target_secs: None,
            seek_frames_skipped: 0,
            draining: false,
        }
    }

    fn reset_timing(&mut self) {
        self.playback_start_time = Some(Instant::now());
        self.first_pts = None;
    }
}

enum CommandResult {
    Continue,
    Break,
}

impl VideoDecoder {
    /// Spawns a decoder thread for the best video stream of `path`.
    ///
    /// The first frame is decoded straight away so paused media shows a
    /// picture.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist. Open and codec failures
    /// happen on the thread and arrive as [`DecoderEvent::Error`].
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {}", path.display())));
        }

        // Commands unbounded so the UI never waits; events bounded for backpressure
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(2);

        // FFmpeg contexts are not Send
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::decoder_loop(path, command_rx, event_tx.clone()) {
                log::error!("Video decoder failed: {e}");
                let _ = event_tx.blocking_send(DecoderEvent::Error(e.to_string()));
            }
        });

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    /// Sends a command to the decoder thread.
    pub fn send_command(&self, command: DecoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Video decoder is not running".into()))
    }

    /// Receives the next event, or `None` once the thread has exited.
    pub async fn recv_event(&mut self) -> Option<DecoderEvent> {
        self.event_rx.recv().await
    }

    #[allow(clippy::needless_pass_by_value)]
    fn decoder_loop(
        path: PathBuf,
        mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
        event_tx: mpsc::Sender<DecoderEvent>,
    ) -> Result<()> {
        crate::media::init_ffmpeg()?;

        let mut ictx = ffmpeg_next::format::input(&path)
            .map_err(|e| MediaError::from_message(&format!("Failed to open video: {e}")))?;

        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| Error::Media(MediaError::NoPlayableStream))?;
        let video_stream_index = input.index();

        let time_base = input.time_base();
        let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        let context_decoder =
            ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
                .map_err(|e| MediaError::from_message(&format!("Failed to create codec context: {e}")))?;
        let mut decoder = context_decoder.decoder().video().map_err(|e| {
            MediaError::from_message(&format!("Failed to create video decoder: {e}"))
        })?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(MediaError::from_message(&format!(
                "Invalid video dimensions: {width}x{height}"
            ))
            .into());
        }

        let mut scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| MediaError::from_message(&format!("Failed to create scaler: {e}")))?;

        let mut state = LoopState::new();

        loop {
            // Idle: block until told to do something
            if !state.is_playing && !state.show_single_frame {
                match command_rx.blocking_recv() {
                    Some(command) => {
                        if let CommandResult::Break = Self::handle_command(
                            &command,
                            &mut state,
                            &mut ictx,
                            &mut decoder,
                            &event_tx,
                        ) {
                            break;
                        }
                    }
                    None => break,
                }
                continue;
            }

            match command_rx.try_recv() {
                Ok(command) => {
                    if let CommandResult::Break = Self::handle_command(
                        &command,
                        &mut state,
                        &mut ictx,
                        &mut decoder,
                        &event_tx,
                    ) {
                        break;
                    }
                    continue;
                }
                Err(mpsc::error::TryRecvError::Disconnected) => break,
                Err(mpsc::error::TryRecvError::Empty) => {}
            }

            let Some(decoded_frame) =
                Self::next_frame(&mut ictx, &mut decoder, video_stream_index, &mut state)
            else {
                let _ = event_tx.blocking_send(DecoderEvent::EndOfStream);
                state.is_playing = false;
                state.show_single_frame = false;
                state.playback_start_time = None;
                state.first_pts = None;
                state.seek_target_secs = None;
                continue;
            };

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded_frame
                .timestamp()
                .map_or(0.0, |pts| pts as f64 * time_base_f64);

            // Land seeks on the requested frame rather than the preceding keyframe
            if let Some(target) = state.seek_target_secs {
                if pts_secs + 0.001 < target && state.seek_frames_skipped < MAX_SEEK_SKIP_FRAMES {
                    state.seek_frames_skipped += 1;
                    continue;
                }
                state.seek_target_secs = None;
            }

            // Frame pacing
            if state.is_playing {
                let start_time = *state.playback_start_time.get_or_insert_with(Instant::now);
                let first = *state.first_pts.get_or_insert(pts_secs);
                let frame_delay = pts_secs - first;
                if frame_delay > 0.0 {
                    let target_time = start_time + Duration::from_secs_f64(frame_delay);
                    let now = Instant::now();
                    if target_time > now {
                        std::thread::sleep(target_time - now);
                    }
                }
            }

            let mut rgb_frame = ffmpeg_next::frame::Video::empty();
            if let Err(e) = scaler.run(&decoded_frame, &mut rgb_frame) {
                let _ = event_tx.blocking_send(DecoderEvent::Error(format!("Scaling failed: {e}")));
                continue;
            }

            let frame = VideoFrame {
                rgba: Arc::new(Self::extract_rgba_data(&rgb_frame)),
                width,
                height,
                pts_secs,
            };

            if event_tx
                .blocking_send(DecoderEvent::FrameReady(frame))
                .is_err()
            {
                break;
            }

            state.show_single_frame = false;
        }

        Ok(())
    }

    fn handle_command(
        command: &DecoderCommand,
        state: &mut LoopState,
        ictx: &mut ffmpeg_next::format::context::Input,
        decoder: &mut ffmpeg_next::decoder::Video,
        event_tx: &mpsc::Sender<DecoderEvent>,
    ) -> CommandResult {
        match command {
            DecoderCommand::Play => {
                state.is_playing = true;
                state.reset_timing();
                let _ = event_tx.blocking_send(DecoderEvent::Buffering);
            }
            DecoderCommand::Pause => {
                state.is_playing = false;
                state.playback_start_time = None;
                state.first_pts = None;
            }
            DecoderCommand::Seek { target_secs } => {
                // AV_TIME_BASE is microseconds; ..ts lets FFmpeg land on an earlier keyframe
                #[allow(clippy::cast_possible_truncation)]
                let timestamp = (target_secs * 1_000_000.0) as i64;
                match ictx.seek(timestamp, ..timestamp) {
                    Ok(()) => {
                        decoder.flush();
                        state.draining = false;
                        state.reset_timing();
                        state.seek_target_secs = Some(*target_secs);
                        state.seek_frames_skipped = 0;
                        if !state.is_playing {
                            state.show_single_frame = true;
                        }
                    }
                    Err(e) => {
                        let _ = event_tx
                            .blocking_send(DecoderEvent::Error(format!("Seek failed: {e}")));
                    }
                }
                // Acknowledge either way so the engine stops waiting
                let _ = event_tx.blocking_send(DecoderEvent::Seeked {
                    target_secs: *target_secs,
                });
            }
            DecoderCommand::Stop => return CommandResult::Break,
        }
        CommandResult::Continue
    }

    /// Pulls packets until the decoder yields a frame.
    ///
    /// Returns `None` once the stream is exhausted and the decoder drained.
    fn next_frame(
        ictx: &mut ffmpeg_next::format::context::Input,
        decoder: &mut ffmpeg_next::decoder::Video,
        stream_index: usize,
        state: &mut LoopState,
    ) -> Option<ffmpeg_next::frame::Video> {
        let mut frame = ffmpeg_next::frame::Video::empty();
        loop {
            if decoder.receive_frame(&mut frame).is_ok() {
                return Some(frame);
            }
            if state.draining {
                return None;
            }
            match ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != stream_index {
                        continue;
                    }
                    if let Err(e) = decoder.send_packet(&packet) {
                        log::warn!("Video packet rejected: {e}");
                    }
                }
                None => {
                    let _ = decoder.send_eof();
                    state.draining = true;
                }
            }
        }
    }

    /// Copies RGBA rows out of a frame, dropping stride padding.
    fn extract_rgba_data(frame: &ffmpeg_next::frame::Video) -> Vec<u8> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let data = frame.data(0);
        let stride = frame.stride(0);

        let mut rgba_bytes = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let row_start = y * stride;
            let row_end = row_start + width * 4;
            rgba_bytes.extend_from_slice(&data[row_start..row_end]);
        }

        rgba_bytes
    }
}
