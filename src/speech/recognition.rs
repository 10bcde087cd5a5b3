use super::SegmenterConfig;
#[cfg(feature = "audio-io")]
use super::{AudioCapture, SegmentOutput, Segmenter, SpeechDetector, StreamResampler, WHISPER_SAMPLE_RATE};
use crate::{Result, VeraError};
#[cfg(feature = "audio-io")]
use crossbeam_channel::bounded;
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

/// Configuration for the recognition session
#[derive(Clone, Debug)]
pub struct RecognitionConfig {
    /// Path to the Whisper model file
    pub model_path: PathBuf,

    /// Language to transcribe (None for auto-detection)
    pub language: Option<String>,

    /// Number of threads to use for transcription
    pub n_threads: i32,

    /// Utterance segmentation tuning
    pub segmenter: SegmenterConfig,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/ggml-base.en.bin"),
            language: Some("en".to_string()),
            n_threads: 4,
            segmenter: SegmenterConfig::default(),
        }
    }
}

/// Events emitted by a recognition session
#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    /// Recognition has started listening
    Started,

    /// A transcript the engine may still revise
    Interim(String),

    /// A transcript the engine will not revise further
    Final(String),

    /// Recognition has stopped listening
    Ended,

    /// Recoverable recognition failure
    Error(String),
}

/// Whisper transcription engine
pub struct Transcriber {
    language: Option<String>,
    n_threads: i32,
    context: WhisperContext,
}

impl Transcriber {
    pub fn new(config: &RecognitionConfig) -> Result<Self> {
        info!("Loading Whisper model from: {:?}", config.model_path);

        if !config.model_path.exists() {
            return Err(VeraError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| VeraError::ModelLoadError("Invalid model path".to_string()))?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| VeraError::ModelLoadError(format!("Failed to load Whisper model: {:?}", e)))?;

        info!("Whisper model loaded successfully");

        Ok(Self {
            language: config.language.clone(),
            n_threads: config.n_threads,
            context,
        })
    }

    /// Transcribe a mono 16kHz segment
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        if samples.is_empty() {
            return Err(VeraError::RecognitionError("Empty audio segment".to_string()));
        }

        debug!("Transcribing segment: {} samples", samples.len());

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_n_threads(self.n_threads);
        params.set_translate(false);
        params.set_print_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);

        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| VeraError::RecognitionError(format!("Failed to create state: {:?}", e)))?;

        state
            .full(params, samples)
            .map_err(|e| VeraError::RecognitionError(format!("Transcription failed: {:?}", e)))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| VeraError::RecognitionError(format!("Failed to get segments: {:?}", e)))?;

        let mut text = String::new();
        for i in 0..num_segments {
            let segment_text = state.full_get_segment_text(i).map_err(|e| {
                VeraError::RecognitionError(format!("Failed to get segment text: {:?}", e))
            })?;
            text.push_str(&segment_text);
        }

        debug!("Transcription result: '{}'", text.trim());

        Ok(text.trim().to_string())
    }
}

#[derive(Debug)]
pub(crate) enum SessionControl {
    Start,
    Stop,
    Shutdown,
}

/// Continuous speech-recognition session.
///
/// Owns microphone capture and a worker thread that resamples, runs
/// VAD segmentation, and transcribes. Emits [`RecognitionEvent`]s that
/// the owner polls. Construction fails when the capability is absent
/// (no input device, no model, or the `audio-io` feature is off);
/// callers hold an `Option<RecognitionSession>` and degrade silently.
pub struct RecognitionSession {
    #[cfg(feature = "audio-io")]
    capture: Option<AudioCapture>,
    audio_tx: Sender<Vec<f32>>,
    control_tx: Sender<SessionControl>,
    event_rx: Receiver<RecognitionEvent>,
    running: bool,
}

impl RecognitionSession {
    #[cfg(not(feature = "audio-io"))]
    pub fn new(_config: RecognitionConfig) -> Result<Self> {
        Err(VeraError::AudioDeviceError(
            "audio input disabled at build time".into(),
        ))
    }

    #[cfg(feature = "audio-io")]
    pub fn new(config: RecognitionConfig) -> Result<Self> {
        // Fail fast on missing capability; the full model load happens
        // on the worker because it is slow.
        if !config.model_path.exists() {
            return Err(VeraError::ModelLoadError(format!(
                "Model file not found: {:?}",
                config.model_path
            )));
        }

        let capture = AudioCapture::new()?;
        let input_rate = capture.sample_rate();

        let (audio_tx, audio_rx) = bounded::<Vec<f32>>(64);
        let (control_tx, control_rx) = bounded::<SessionControl>(16);
        let (event_tx, event_rx) = bounded::<RecognitionEvent>(64);

        Self::spawn_worker(config, input_rate, audio_rx, control_rx, event_tx);

        Ok(Self {
            capture: Some(capture),
            audio_tx,
            control_tx,
            event_rx,
            running: false,
        })
    }

    /// Session over injected channels, with no microphone attached.
    /// Lets the start/stop guard be exercised without audio hardware.
    #[cfg(test)]
    pub(crate) fn from_channels(
        audio_tx: Sender<Vec<f32>>,
        control_tx: Sender<SessionControl>,
        event_rx: Receiver<RecognitionEvent>,
    ) -> Self {
        Self {
            #[cfg(feature = "audio-io")]
            capture: None,
            audio_tx,
            control_tx,
            event_rx,
            running: false,
        }
    }

    /// Get a receiver for recognition events
    pub fn event_receiver(&self) -> Receiver<RecognitionEvent> {
        self.event_rx.clone()
    }

    /// Whether the session is currently listening
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start listening. Safe no-op when already running.
    pub fn start(&mut self) -> Result<()> {
        if self.running {
            debug!("Recognition already running");
            return Ok(());
        }

        #[cfg(feature = "audio-io")]
        if let Some(capture) = self.capture.as_mut() {
            capture.start(self.audio_tx.clone())?;
        }

        self.control_tx
            .send(SessionControl::Start)
            .map_err(|e| VeraError::ChannelError(format!("Recognition worker gone: {}", e)))?;

        self.running = true;
        Ok(())
    }

    /// Stop listening. Safe no-op when already stopped.
    pub fn stop(&mut self) {
        if !self.running {
            debug!("Recognition already stopped");
            return;
        }

        #[cfg(feature = "audio-io")]
        if let Some(capture) = self.capture.as_mut() {
            capture.stop();
        }

        if self.control_tx.send(SessionControl::Stop).is_err() {
            warn!("Recognition worker gone on stop");
        }

        self.running = false;
    }

    #[cfg(feature = "audio-io")]
    fn spawn_worker(
        config: RecognitionConfig,
        input_rate: u32,
        audio_rx: Receiver<Vec<f32>>,
        control_rx: Receiver<SessionControl>,
        event_tx: Sender<RecognitionEvent>,
    ) {
        std::thread::spawn(move || {
            info!("Recognition worker started");

            let transcriber = match Transcriber::new(&config) {
                Ok(t) => t,
                Err(e) => {
                    error!("Failed to initialize transcriber: {}", e);
                    let _ = event_tx.send(RecognitionEvent::Error(e.to_string()));
                    let _ = event_tx.send(RecognitionEvent::Ended);
                    return;
                }
            };

            let mut resampler = match StreamResampler::new(input_rate, WHISPER_SAMPLE_RATE) {
                Ok(r) => r,
                Err(e) => {
                    error!("Failed to create resampler: {}", e);
                    let _ = event_tx.send(RecognitionEvent::Error(e.to_string()));
                    return;
                }
            };

            let mut vad = match SpeechDetector::default_16khz() {
                Ok(v) => v,
                Err(e) => {
                    error!("Failed to create VAD: {}", e);
                    let _ = event_tx.send(RecognitionEvent::Error(e.to_string()));
                    return;
                }
            };

            let mut segmenter = Segmenter::new(config.segmenter.clone());
            let mut vad_pending: Vec<f32> = Vec::new();
            let mut active = false;

            loop {
                crossbeam_channel::select! {
                    recv(control_rx) -> msg => match msg {
                        Ok(SessionControl::Start) => {
                            if !active {
                                active = true;
                                resampler.reset();
                                vad.reset();
                                segmenter.reset();
                                vad_pending.clear();
                                let _ = event_tx.send(RecognitionEvent::Started);
                            }
                        }
                        Ok(SessionControl::Stop) => {
                            if active {
                                active = false;
                                segmenter.reset();
                                let _ = event_tx.send(RecognitionEvent::Ended);
                            }
                        }
                        Ok(SessionControl::Shutdown) | Err(_) => break,
                    },
                    recv(audio_rx) -> msg => match msg {
                        Ok(samples) => {
                            if !active {
                                continue;
                            }

                            let resampled = match resampler.process(&samples) {
                                Ok(r) => r,
                                Err(e) => {
                                    warn!("Resampling failed: {}", e);
                                    continue;
                                }
                            };
                            vad_pending.extend_from_slice(&resampled);

                            let chunk_size = vad.chunk_size();
                            while vad_pending.len() >= chunk_size {
                                let frame: Vec<f32> = vad_pending.drain(..chunk_size).collect();
                                let is_speech = vad.is_speech(&frame);

                                match segmenter.push(&frame, is_speech) {
                                    SegmentOutput::None => {}
                                    SegmentOutput::Interim(buffer) => {
                                        match transcriber.transcribe(&buffer) {
                                            Ok(text) if !text.is_empty() => {
                                                let _ = event_tx
                                                    .send(RecognitionEvent::Interim(text));
                                            }
                                            Ok(_) => {}
                                            Err(e) => {
                                                debug!("Interim transcription failed: {}", e);
                                            }
                                        }
                                    }
                                    SegmentOutput::Final(buffer) => {
                                        match transcriber.transcribe(&buffer) {
                                            Ok(text) if !text.is_empty() => {
                                                let _ =
                                                    event_tx.send(RecognitionEvent::Final(text));
                                            }
                                            Ok(_) => {}
                                            Err(e) => {
                                                warn!("Transcription failed: {}", e);
                                                let _ = event_tx.send(RecognitionEvent::Error(
                                                    e.to_string(),
                                                ));
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        Err(_) => break,
                    },
                }
            }

            info!("Recognition worker stopped");
        });
    }
}

impl Drop for RecognitionSession {
    fn drop(&mut self) {
        self.stop();
        let _ = self.control_tx.send(SessionControl::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_config_default() {
        let config = RecognitionConfig::default();
        assert_eq!(config.language, Some("en".to_string()));
        assert_eq!(config.n_threads, 4);
        assert!(config.model_path.to_string_lossy().contains("ggml"));
    }

    #[test]
    fn test_double_start_and_stop_send_one_control_each() {
        let (audio_tx, _audio_rx) = crossbeam_channel::bounded(4);
        let (control_tx, control_rx) = crossbeam_channel::bounded(16);
        let (_event_tx, event_rx) = crossbeam_channel::bounded::<RecognitionEvent>(4);
        let mut session = RecognitionSession::from_channels(audio_tx, control_tx, event_rx);

        session.start().unwrap();
        assert!(session.is_running());
        session.start().unwrap();

        assert!(matches!(control_rx.try_recv(), Ok(SessionControl::Start)));
        assert!(
            control_rx.try_recv().is_err(),
            "second start must not reach the worker"
        );

        session.stop();
        session.stop();
        assert!(!session.is_running());

        assert!(matches!(control_rx.try_recv(), Ok(SessionControl::Stop)));
        assert!(
            control_rx.try_recv().is_err(),
            "second stop must not reach the worker"
        );
    }

    #[test]
    fn test_missing_model_is_a_clean_failure() {
        let config = RecognitionConfig {
            model_path: PathBuf::from("/nonexistent/model.bin"),
            ..Default::default()
        };
        let result = RecognitionSession::new(config);
        assert!(result.is_err());
    }
}
