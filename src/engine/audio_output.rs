// SPDX-License-Identifier: MPL-2.0
//! Audio output through the default cpal device.
//!
//! Volume, mute and pause live in atomics read by the device callback, so
//! they take effect on the next callback without locking.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::Volume;
use crate::error::{Error, MediaError, Result};

/// Sample rate and channel count the decoder must resample to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioOutputConfig {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio samples to be played.
/// Interleaved f32 samples normalized to [-1.0, 1.0].
pub type AudioSamples = Arc<Vec<f32>>;

/// Commands for controlling audio output.
#[derive(Debug)]
pub enum AudioOutputCommand {
    /// Play audio samples.
    Play(AudioSamples),

    /// Pause playback.
    Pause,

    /// Resume playback.
    Resume,

    /// Stop playback and clear buffer.
    Stop,

    /// Clear buffer without changing pause state.
    /// Used during seek to discard old audio without interrupting playback.
    ClearBuffer,

    /// Set volume (perceptually scaled, see [`Volume::gain`]).
    SetVolume(Volume),

    /// Set mute state.
    SetMuted(bool),
}

/// Shared state between audio thread and main thread.
struct SharedState {
    /// Current volume (stored as u32 bits of f32 for atomic access).
    volume_bits: AtomicU32,

    /// Mute state.
    muted: AtomicBool,

    /// Pause state.
    paused: AtomicBool,
}

impl SharedState {
    fn new(initial_volume: f32, muted: bool) -> Self {
        Self {
            volume_bits: AtomicU32::new(initial_volume.to_bits()),
            muted: AtomicBool::new(muted),
            paused: AtomicBool::new(true),
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    fn set_volume(&self, volume: f32) {
        self.volume_bits.store(volume.to_bits(), Ordering::Relaxed);
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }
}

/// Playback stream on the system's default output device.
pub struct AudioOutput {
    command_tx: mpsc::UnboundedSender<AudioOutputCommand>,

    shared_state: Arc<SharedState>,

    sample_rate: u32,
    channels: u16,

    /// Dropping the stream stops the device callback.
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default output device, paused.
    ///
    /// [`AudioOutput::config`] tells the decoder what to resample to.
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is found, if the device
    /// configuration cannot be retrieved, or if the audio stream fails to start.
    pub fn new(initial_volume: Volume, muted: bool) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| MediaError::AudioDevice("No audio output device found".to_string()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| MediaError::AudioDevice(format!("Failed to get audio config: {e}")))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();

        let shared_state = Arc::new(SharedState::new(initial_volume.value(), muted));
        let shared_state_clone = Arc::clone(&shared_state);

        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<AudioOutputCommand>();

        // About half a second of audio at most
        let max_buffer_size = (sample_rate as usize) * (channels as usize) / 2;
        let buffer: Arc<std::sync::Mutex<Vec<f32>>> =
            Arc::new(std::sync::Mutex::new(Vec::with_capacity(max_buffer_size)));
        let buffer_clone = Arc::clone(&buffer);

        // Commands are applied off the device thread
        let buffer_for_task = Arc::clone(&buffer);
        let shared_for_task = Arc::clone(&shared_state);
        let max_buffer_for_task = max_buffer_size;
        tokio::spawn(async move {
            while let Some(cmd) = command_rx.recv().await {
                match cmd {
                    AudioOutputCommand::Play(samples) => {
                        if let Ok(mut buf) = buffer_for_task.lock() {
                            let available_space = max_buffer_for_task.saturating_sub(buf.len());
                            if available_space >= samples.len() {
                                buf.extend_from_slice(&samples);
                            } else if available_space > 0 {
                                // Add partial samples if some space available
                                buf.extend_from_slice(&samples[..available_space]);
                            }
                        }
                    }
                    AudioOutputCommand::Pause => {
                        shared_for_task.set_paused(true);
                    }
                    AudioOutputCommand::Resume => {
                        shared_for_task.set_paused(false);
                    }
                    AudioOutputCommand::Stop => {
                        if let Ok(mut buf) = buffer_for_task.lock() {
                            buf.clear();
                        }
                        shared_for_task.set_paused(true);
                    }
                    AudioOutputCommand::ClearBuffer => {
                        if let Ok(mut buf) = buffer_for_task.lock() {
                            buf.clear();
                        }
                    }
                    AudioOutputCommand::SetVolume(volume) => {
                        shared_for_task.set_volume(volume.value());
                    }
                    AudioOutputCommand::SetMuted(muted) => {
                        shared_for_task.set_muted(muted);
                    }
                }
            }
        });

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &supported_config.into(),
                buffer_clone,
                shared_state_clone,
            )?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &supported_config.into(),
                buffer_clone,
                shared_state_clone,
            )?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &supported_config.into(),
                buffer_clone,
                shared_state_clone,
            )?,
            other => {
                return Err(MediaError::AudioDevice(format!(
                    "Unsupported audio sample format: {other:?}"
                ))
                .into())
            }
        };

        stream
            .play()
            .map_err(|e| MediaError::AudioDevice(format!("Failed to start audio stream: {e}")))?;

        Ok(Self {
            command_tx,
            shared_state,
            sample_rate,
            channels,
            _stream: stream,
        })
    }

    /// Builds an audio output stream for a specific sample format.
    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        buffer: Arc<std::sync::Mutex<Vec<f32>>>,
        shared_state: Arc<SharedState>,
    ) -> Result<cpal::Stream> {
        let stream = device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let volume = shared_state.volume();
                    let muted = shared_state.is_muted();
                    let paused = shared_state.is_paused();

                    if muted || paused {
                        // Output silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    // Get samples from buffer
                    let Ok(mut buf) = buffer.lock() else {
                        // Mutex poisoned, output silence
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    };

                    let gain = Volume::new(volume).gain();

                    for (i, sample) in data.iter_mut().enumerate() {
                        if i < buf.len() {
                            // Just below 1.0: from_sample overflows i16 at exactly 1.0
                            let amplified = (buf[i] * gain).clamp(-1.0, 0.999_999_9);
                            *sample = T::from_sample(amplified);
                        } else {
                            *sample = T::from_sample(0.0f32);
                        }
                    }

                    // Remove consumed samples
                    let consumed = data.len().min(buf.len());
                    buf.drain(..consumed);
                },
                |err| {
                    log::error!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| MediaError::AudioDevice(format!("Failed to build audio stream: {e}")))?;

        Ok(stream)
    }

    /// Sends a command to the audio output.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn send_command(&self, command: AudioOutputCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Audio output channel closed".into()))
    }

    /// Queues audio samples for playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn play(&self, samples: AudioSamples) -> Result<()> {
        self.send_command(AudioOutputCommand::Play(samples))
    }

    /// Pauses audio playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn pause(&self) -> Result<()> {
        self.send_command(AudioOutputCommand::Pause)
    }

    /// Resumes audio playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn resume(&self) -> Result<()> {
        self.send_command(AudioOutputCommand::Resume)
    }

    /// Stops playback and clears the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn stop(&self) -> Result<()> {
        self.send_command(AudioOutputCommand::Stop)
    }

    /// Clears the audio buffer without changing pause state.
    /// Used during seek to discard old audio without interrupting playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn clear_buffer(&self) -> Result<()> {
        self.send_command(AudioOutputCommand::ClearBuffer)
    }

    /// Sets the volume.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn set_volume(&self, volume: Volume) -> Result<()> {
        self.send_command(AudioOutputCommand::SetVolume(volume))
    }

    /// Sets the mute state.
    ///
    /// # Errors
    ///
    /// Returns an error if the audio output channel is closed.
    pub fn set_muted(&self, muted: bool) -> Result<()> {
        self.send_command(AudioOutputCommand::SetMuted(muted))
    }

    /// Returns the current volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.shared_state.volume()
    }

    /// Returns whether audio is muted.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.shared_state.is_muted()
    }

    /// Format the decoder has to produce for this device.
    #[must_use]
    pub fn config(&self) -> AudioOutputConfig {
        AudioOutputConfig {
            sample_rate: self.sample_rate,
            channels: self.channels,
        }
    }
}
