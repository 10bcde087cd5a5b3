use tracing::debug;

use super::WHISPER_SAMPLE_RATE;

/// Tuning for VAD-driven utterance segmentation
#[derive(Clone, Debug)]
pub struct SegmenterConfig {
    /// Silence duration that ends an utterance (seconds)
    pub silence_threshold: f32,

    /// Segments shorter than this are discarded (seconds)
    pub min_segment_duration: f32,

    /// Segments are force-flushed at this length (seconds)
    pub max_segment_duration: f32,

    /// How often to surface the accumulating segment for an interim
    /// transcription pass (seconds of speech)
    pub interim_interval: f32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            silence_threshold: 0.5,
            min_segment_duration: 0.5,
            max_segment_duration: 30.0,
            interim_interval: 1.0,
        }
    }
}

/// What the segmenter produced for a pushed chunk
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentOutput {
    /// Nothing to report
    None,

    /// Speech is still in progress; transcribe the buffer so far for a
    /// preview the engine may still revise
    Interim(Vec<f32>),

    /// A complete utterance the engine will not revise further
    Final(Vec<f32>),
}

/// VAD-driven segmentation state machine.
///
/// Pure over (chunk, is_speech) inputs so the silence/interim/flush
/// behavior is testable without audio hardware.
pub struct Segmenter {
    config: SegmenterConfig,
    buffer: Vec<f32>,
    in_speech: bool,
    silence_duration: f32,
    speech_since_interim: f32,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
            in_speech: false,
            silence_duration: 0.0,
            speech_since_interim: 0.0,
        }
    }

    /// Feed one audio chunk plus its VAD verdict
    pub fn push(&mut self, chunk: &[f32], is_speech: bool) -> SegmentOutput {
        let chunk_duration = chunk.len() as f32 / WHISPER_SAMPLE_RATE as f32;

        if is_speech {
            if !self.in_speech {
                self.in_speech = true;
                self.buffer.clear();
                self.speech_since_interim = 0.0;
                debug!("Speech started");
            }

            self.buffer.extend_from_slice(chunk);
            self.silence_duration = 0.0;
            self.speech_since_interim += chunk_duration;

            if self.buffer_duration() >= self.config.max_segment_duration {
                debug!("Maximum segment duration reached, flushing");
                return SegmentOutput::Final(self.take_buffer());
            }

            if self.speech_since_interim >= self.config.interim_interval {
                self.speech_since_interim = 0.0;
                return SegmentOutput::Interim(self.buffer.clone());
            }

            return SegmentOutput::None;
        }

        if self.in_speech {
            self.buffer.extend_from_slice(chunk);
            self.silence_duration += chunk_duration;

            if self.silence_duration >= self.config.silence_threshold {
                let duration = self.buffer_duration();
                if duration >= self.config.min_segment_duration {
                    debug!("Silence threshold reached, flushing {:.2}s segment", duration);
                    return SegmentOutput::Final(self.take_buffer());
                }

                debug!("Segment too short ({:.2}s), discarding", duration);
                self.reset();
            }
        }

        SegmentOutput::None
    }

    /// Discard any accumulated audio and return to idle
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.in_speech = false;
        self.silence_duration = 0.0;
        self.speech_since_interim = 0.0;
    }

    fn buffer_duration(&self) -> f32 {
        self.buffer.len() as f32 / WHISPER_SAMPLE_RATE as f32
    }

    fn take_buffer(&mut self) -> Vec<f32> {
        let segment = std::mem::take(&mut self.buffer);
        self.reset();
        segment
    }
}
