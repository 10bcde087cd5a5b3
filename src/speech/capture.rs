use crate::{Result, VeraError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Microphone capture feeding mono samples into a channel.
///
/// The stream stays alive for the lifetime of the capture; a shared
/// flag gates whether the callback forwards samples, so start/stop
/// are cheap and idempotent.
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    is_capturing: Arc<Mutex<bool>>,
}

impl AudioCapture {
    /// Create a capture handle on the default input device
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| VeraError::AudioDeviceError("No input device available".into()))?;

        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let config = device
            .default_input_config()
            .map_err(|e| {
                VeraError::AudioDeviceError(format!("Failed to get input config: {}", e))
            })?
            .into();

        Ok(Self {
            device,
            config,
            stream: None,
            is_capturing: Arc::new(Mutex::new(false)),
        })
    }

    /// Sample rate of the input device
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    /// Start forwarding samples to `audio_tx`. Safe no-op when already
    /// capturing.
    pub fn start(&mut self, audio_tx: Sender<Vec<f32>>) -> Result<()> {
        if *self.is_capturing.lock() {
            warn!("Already capturing");
            return Ok(());
        }

        if self.stream.is_none() {
            let channels = self.config.channels as usize;
            let is_capturing = Arc::clone(&self.is_capturing);

            let err_fn = |err| {
                error!("Audio input stream error: {}", err);
            };

            let stream = self
                .device
                .build_input_stream(
                    &self.config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if !*is_capturing.lock() {
                            return;
                        }

                        // Mix down to mono
                        let samples = if channels == 1 {
                            data.to_vec()
                        } else {
                            data.chunks(channels)
                                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                                .collect()
                        };

                        if let Err(e) = audio_tx.try_send(samples) {
                            debug!("Failed to send audio data: {}", e);
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|e| {
                    VeraError::AudioDeviceError(format!("Failed to build input stream: {}", e))
                })?;

            stream.play().map_err(|e| {
                VeraError::AudioDeviceError(format!("Failed to start input stream: {}", e))
            })?;

            self.stream = Some(stream);
        }

        *self.is_capturing.lock() = true;
        info!("Started audio capture");
        Ok(())
    }

    /// Stop forwarding samples. Safe no-op when already stopped.
    pub fn stop(&mut self) {
        let mut capturing = self.is_capturing.lock();
        if !*capturing {
            return;
        }
        *capturing = false;
        info!("Stopped audio capture");
    }
}
