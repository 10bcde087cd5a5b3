//! Local speech recognition.
//!
//! Wraps microphone capture, voice activity detection, and Whisper
//! transcription behind a single continuous-recognition session that
//! emits interim and final transcripts. The capability is optional:
//! when no input device or model is available, construction fails and
//! the application degrades to text-only input.

#[cfg(feature = "audio-io")]
mod capture;
mod recognition;
mod resample;
mod segmenter;
mod vad;

#[cfg(feature = "audio-io")]
pub use capture::AudioCapture;
pub use recognition::{RecognitionConfig, RecognitionEvent, RecognitionSession, Transcriber};
#[cfg(test)]
pub(crate) use recognition::SessionControl;
pub use resample::StreamResampler;
pub use segmenter::{Segmenter, SegmenterConfig, SegmentOutput};
pub use vad::SpeechDetector;

/// Sample rate Whisper expects
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;
