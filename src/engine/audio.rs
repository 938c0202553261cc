// SPDX-License-Identifier: MPL-2.0
//! Audio decoding with FFmpeg.
//!
//! Samples are resampled to the output device's rate and channel count as
//! packed `f32`, then handed to [`super::audio_output::AudioOutput`].

use super::audio_output::AudioOutputConfig;
use super::decoder::DecoderCommand;
use crate::config::{AUDIO_LOOKAHEAD_SECS, MAX_SEEK_SKIP_FRAMES};
use crate::error::{Error, MediaError, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A decoded audio buffer ready for playback.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples normalized to [-1.0, 1.0].
    pub samples: Arc<Vec<f32>>,

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Number of interleaved channels.
    pub channels: u16,

    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

impl DecodedAudio {
    /// Returns the number of frames (samples per channel).
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Playback length of this buffer in seconds.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / f64::from(self.sample_rate)
    }
}

/// Events sent from the audio decoder.
#[derive(Debug, Clone)]
pub enum AudioDecoderEvent {
    /// A decoded audio buffer is ready.
    BufferReady(DecodedAudio),

    /// A seek was applied; later buffers are post-seek.
    Seeked { target_secs: f64 },

    /// End of audio stream reached.
    EndOfStream,

    /// An error occurred during decoding.
    Error(String),
}

struct AudioDecoderState {
    is_playing: bool,
    playback_start_time: Option<Instant>,
    first_pts: Option<f64>,
    seek_target_secs: Option<f64>,
    seek_frames_skipped: u32,
    draining: bool,
}

impl AudioDecoderState {
    fn new() -> Self {
        Self {
            is_playing: false,
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

enum AudioCommandResult {
    Continue,
    Break,
}

fn handle_audio_command(
    command: &DecoderCommand,
    state: &mut AudioDecoderState,
    ictx: &mut ffmpeg_next::format::context::Input,
    decoder: &mut ffmpeg_next::decoder::Audio,
    event_tx: &mpsc::Sender<AudioDecoderEvent>,
) -> AudioCommandResult {
    match command {
        DecoderCommand::Play => {
            state.is_playing = true;
            state.reset_timing();
        }
        DecoderCommand::Pause => {
            state.is_playing = false;
            state.playback_start_time = None;
            state.first_pts = None;
        }
        DecoderCommand::Seek { target_secs } => {
            #[allow(clippy::cast_possible_truncation)]
            let timestamp = (*target_secs * 1_000_000.0) as i64;
            if let Err(e) = ictx.seek(timestamp, ..timestamp) {
                let _ = event_tx
                    .blocking_send(AudioDecoderEvent::Error(format!("Audio seek failed: {e}")));
                state.seek_target_secs = None;
            } else {
                decoder.flush();
                state.draining = false;
                state.reset_timing();
                state.seek_target_secs = Some(*target_secs);
                state.seek_frames_skipped = 0;
            }
            let _ = event_tx.blocking_send(AudioDecoderEvent::Seeked {
                target_secs: *target_secs,
            });
        }
        DecoderCommand::Stop => return AudioCommandResult::Break,
    }
    AudioCommandResult::Continue
}

/// Handle to an audio decoder thread.
pub struct AudioDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,
    event_rx: mpsc::Receiver<AudioDecoderEvent>,
}

impl AudioDecoder {
    /// Spawns a decoder thread for the best audio stream of `path`.
    ///
    /// Output is resampled to `output_config` so the device plays it at the
    /// right speed. The thread starts paused.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist.
    pub fn new<P: AsRef<Path>>(path: P, output_config: AudioOutputConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(Error::Io(format!("Audio file not found: {}", path.display())));
        }

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(4);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::decoder_loop(path, command_rx, event_tx.clone(), output_config)
            {
                log::error!("Audio decoder failed: {e}");
                let _ = event_tx.blocking_send(AudioDecoderEvent::Error(e.to_string()));
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
            .map_err(|_| Error::Io("Audio decoder is not running".into()))
    }

    /// Receives the next event, or `None` once the thread has exited.
    pub async fn recv_event(&mut self) -> Option<AudioDecoderEvent> {
        self.event_rx.recv().await
    }

    #[allow(clippy::needless_pass_by_value, clippy::too_many_lines)]
    fn decoder_loop(
        path: PathBuf,
        mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
        event_tx: mpsc::Sender<AudioDecoderEvent>,
        output_config: AudioOutputConfig,
    ) -> Result<()> {
        crate::media::init_ffmpeg()?;

        let mut ictx = ffmpeg_next::format::input(&path)
            .map_err(|e| MediaError::from_message(&format!("Failed to open audio: {e}")))?;

        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| Error::Media(MediaError::NoPlayableStream))?;
        let audio_stream_index = input.index();

        let time_base = input.time_base();
        let time_base_f64 = f64::from(time_base.numerator()) / f64::from(time_base.denominator());

        let context_decoder =
            ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
                .map_err(|e| MediaError::from_message(&format!("Failed to create codec context: {e}")))?;
        let mut decoder = context_decoder.decoder().audio().map_err(|e| {
            MediaError::from_message(&format!("Failed to create audio decoder: {e}"))
        })?;

        // Some containers leave the layout unset; derive it from the channel count
        let input_layout = if decoder.channel_layout().is_empty() {
            ffmpeg_next::ChannelLayout::default(i32::from(decoder.channels()))
        } else {
            decoder.channel_layout()
        };
        let output_layout = match output_config.channels {
            1 => ffmpeg_next::ChannelLayout::MONO,
            _ => ffmpeg_next::ChannelLayout::STEREO,
        };
        let output_channels: u16 = if output_config.channels == 1 { 1 } else { 2 };

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            input_layout,
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            output_layout,
            output_config.sample_rate,
        )
        .map_err(|e| MediaError::from_message(&format!("Failed to create resampler: {e}")))?;

        let mut state = AudioDecoderState::new();

        loop {
            if !state.is_playing {
                match command_rx.blocking_recv() {
                    Some(command) => {
                        if let AudioCommandResult::Break = handle_audio_command(
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
                    if let AudioCommandResult::Break = handle_audio_command(
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
                Self::next_frame(&mut ictx, &mut decoder, audio_stream_index, &mut state)
            else {
                let _ = event_tx.blocking_send(AudioDecoderEvent::EndOfStream);
                state.is_playing = false;
                state.seek_target_secs = None;
                continue;
            };

            let mut output_audio = ffmpeg_next::frame::Audio::empty();
            if let Err(e) = resampler.run(&decoded_frame, &mut output_audio) {
                let _ = event_tx
                    .blocking_send(AudioDecoderEvent::Error(format!("Resampling failed: {e}")));
                continue;
            }

            let samples = Self::extract_samples(&output_audio, output_channels);

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded_frame
                .timestamp()
                .map_or(0.0, |pts| pts as f64 * time_base_f64);

            let audio = DecodedAudio {
                samples: Arc::new(samples),
                sample_rate: output_config.sample_rate,
                channels: output_channels,
                pts_secs,
            };

            // Precise seeking: drop buffers that end before the target
            if let Some(target) = state.seek_target_secs {
                if pts_secs + audio.duration_secs() < target {
                    state.seek_frames_skipped += 1;
                    if state.seek_frames_skipped >= MAX_SEEK_SKIP_FRAMES {
                        log::warn!("Audio seek gave up after {MAX_SEEK_SKIP_FRAMES} buffers");
                        state.seek_target_secs = None;
                    }
                    continue;
                }
                state.first_pts = Some(target);
                state.seek_target_secs = None;
            }

            // Pacing: stay AUDIO_LOOKAHEAD_SECS ahead of the wall clock
            if let Some(start_time) = state.playback_start_time {
                let first = *state.first_pts.get_or_insert(pts_secs);
                let frame_delay = pts_secs - first - AUDIO_LOOKAHEAD_SECS;
                if frame_delay > 0.0 {
                    let target_time = start_time + Duration::from_secs_f64(frame_delay);
                    let now = Instant::now();
                    if target_time > now {
                        std::thread::sleep(target_time - now);
                    }
                }
            }

            if event_tx
                .blocking_send(AudioDecoderEvent::BufferReady(audio))
                .is_err()
            {
                break;
            }
        }

        Ok(())
    }

    fn next_frame(
        ictx: &mut ffmpeg_next::format::context::Input,
        decoder: &mut ffmpeg_next::decoder::Audio,
        stream_index: usize,
        state: &mut AudioDecoderState,
    ) -> Option<ffmpeg_next::frame::Audio> {
        let mut frame = ffmpeg_next::frame::Audio::empty();
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
                        log::warn!("Audio packet rejected: {e}");
                    }
                }
                None => {
                    let _ = decoder.send_eof();
                    state.draining = true;
                }
            }
        }
    }

    /// Reads packed little-endian f32 samples from a resampled frame.
    fn extract_samples(frame: &ffmpeg_next::frame::Audio, channels: u16) -> Vec<f32> {
        let data = frame.data(0);
        let sample_count = frame.samples() * usize::from(channels);

        data.chunks_exact(4)
            .take(sample_count)
            .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            .collect()
    }
}
