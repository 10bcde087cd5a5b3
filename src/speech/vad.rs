use crate::{Result, VeraError};
use tracing::info;
use voice_activity_detector::VoiceActivityDetector;

/// Speech detection using Silero VAD
pub struct SpeechDetector {
    detector: VoiceActivityDetector,
    chunk_size: usize,
    threshold: f32,
}

impl SpeechDetector {
    /// Create a new detector.
    ///
    /// `sample_rate` must be 8000 or 16000. `threshold` is the speech
    /// probability above which a chunk counts as speech.
    pub fn new(sample_rate: u32, threshold: f32) -> Result<Self> {
        if ![8000, 16000].contains(&sample_rate) {
            return Err(VeraError::ConfigError(format!(
                "Invalid sample rate: {}. Must be 8000 or 16000",
                sample_rate
            )));
        }

        // 32ms chunks at either supported rate
        let chunk_size: usize = match sample_rate {
            8000 => 256,
            _ => 512,
        };

        let detector = VoiceActivityDetector::builder()
            .sample_rate(sample_rate as i32)
            .chunk_size(chunk_size)
            .build()
            .map_err(|e| {
                VeraError::AudioProcessingError(format!("Failed to create VAD: {:?}", e))
            })?;

        info!(
            "Initialized VAD with sample rate: {}, threshold: {}",
            sample_rate, threshold
        );

        Ok(Self {
            detector,
            chunk_size,
            threshold,
        })
    }

    /// Create a detector with default parameters (16kHz, 0.5 threshold)
    pub fn default_16khz() -> Result<Self> {
        Self::new(super::WHISPER_SAMPLE_RATE, 0.5)
    }

    /// Number of samples the detector expects per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Detect whether the audio chunk contains speech
    pub fn is_speech(&mut self, audio: &[f32]) -> bool {
        self.detector.predict(audio.iter().copied()) >= self.threshold
    }

    /// Reset the VAD session state
    pub fn reset(&mut self) {
        self.detector.reset();
    }
}
