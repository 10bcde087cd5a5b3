//! Application state management
//!
//! This module provides the central state for the Vera UI. All
//! transitions are plain methods over owned state, driven by discrete
//! events (user input, channel events, timer checks), so they are
//! testable without a running backend or microphone.

use crate::backend::{AskCommand, AskEvent};
use crate::messages::{Message, MessageStore};
use crate::speech::{RecognitionEvent, RecognitionSession};
use crossbeam_channel::{Receiver, Sender as ChannelSender};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Fixed assistant-authored apology shown for any backend failure
pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting. Please try again later.";

/// How long the voice-overlay transcript stays visible after its last update
pub const TRANSCRIPT_FADE: Duration = Duration::from_secs(2);

/// Central application state
pub struct AppState {
    /// Conversation history
    pub messages: MessageStore,

    /// Current draft input
    pub input_text: String,

    /// True while exactly one backend request is in flight
    pub is_responding: bool,

    /// Landing screen visibility; transitions to false once and never back
    pub show_landing: bool,

    /// Whether the live voice overlay is active
    pub voice_mode: bool,

    /// Whether the recognition session is listening
    pub is_listening: bool,

    /// Latest interim transcript; overwritten by each update
    pub interim_transcript: String,

    /// Single-slot fade timer for the transcript preview. Each update
    /// replaces the deadline; there is never more than one pending fade.
    transcript_deadline: Option<Instant>,

    /// Id of the one in-flight backend request; events carrying any
    /// other id are stale and dropped.
    pending_request: Option<Uuid>,

    /// Channel to send backend commands
    pub ask_command_tx: Option<ChannelSender<AskCommand>>,

    /// Channel to receive backend events
    pub ask_event_rx: Option<Receiver<AskEvent>>,

    /// Channel to receive recognition events
    pub recognition_event_rx: Option<Receiver<RecognitionEvent>>,

    /// Optional speech capability; absent when no device or model
    pub recognition: Option<RecognitionSession>,

    /// Last error message, for diagnostics
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            messages: MessageStore::new(),
            input_text: String::new(),
            is_responding: false,
            show_landing: true,
            voice_mode: false,
            is_listening: false,
            interim_transcript: String::new(),
            transcript_deadline: None,
            pending_request: None,
            ask_command_tx: None,
            ask_event_rx: None,
            recognition_event_rx: None,
            recognition: None,
            last_error: None,
        }
    }

    /// One-way landing dismissal
    pub fn dismiss_landing(&mut self) {
        if self.show_landing {
            self.show_landing = false;
        }
    }

    /// Called after the draft text changed; the first non-empty edit
    /// dismisses the landing screen.
    pub fn note_draft_edited(&mut self) {
        if !self.input_text.is_empty() {
            self.dismiss_landing();
        }
    }

    /// Send whatever is currently in the draft
    pub fn send_draft(&mut self) {
        let text = self.input_text.trim().to_string();
        self.send_text(&text);
    }

    /// Send a message, bypassing the draft.
    ///
    /// Trims and no-ops on empty text. Appends exactly one user message
    /// and issues exactly one backend request; the matching assistant
    /// message (reply or apology) arrives via [`Self::apply_ask_event`].
    /// Calls while a request is pending are ignored.
    pub fn send_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        if self.is_responding {
            debug!("Ignoring send while a request is pending");
            return;
        }

        self.dismiss_landing();
        self.messages.add(Message::user(text));
        self.input_text.clear();

        let Some(tx) = &self.ask_command_tx else {
            warn!("No backend wired; answering with the fallback message");
            self.messages.add(Message::assistant(CONNECTION_APOLOGY));
            return;
        };

        let request_id = Uuid::new_v4();
        match tx.send(AskCommand::Ask {
            message: text.to_string(),
            request_id,
        }) {
            Ok(()) => {
                self.is_responding = true;
                self.pending_request = Some(request_id);
            }
            Err(e) => {
                warn!("Backend channel closed: {}", e);
                self.last_error = Some(e.to_string());
                self.messages.add(Message::assistant(CONNECTION_APOLOGY));
            }
        }
    }

    /// Drain and apply all pending backend and recognition events
    pub fn poll_events(&mut self, now: Instant) {
        let ask_events: Vec<AskEvent> = match &self.ask_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in ask_events {
            self.apply_ask_event(event);
        }

        let recognition_events: Vec<RecognitionEvent> = match &self.recognition_event_rx {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in recognition_events {
            self.apply_recognition_event(event, now);
        }
    }

    /// Apply one backend event
    pub fn apply_ask_event(&mut self, event: AskEvent) {
        match event {
            AskEvent::Reply { text, request_id } => {
                if self.pending_request == Some(request_id) {
                    self.messages.add(Message::assistant(text));
                    self.finish_request();
                } else {
                    debug!("Dropping stale reply for request {}", request_id);
                }
            }
            AskEvent::Failed { error, request_id } => {
                if self.pending_request == Some(request_id) {
                    warn!("Backend request failed: {}", error);
                    self.last_error = Some(error);
                    self.messages.add(Message::assistant(CONNECTION_APOLOGY));
                    self.finish_request();
                } else {
                    debug!("Dropping stale failure for request {}", request_id);
                }
            }
            AskEvent::Shutdown => {
                debug!("Backend worker shut down");
            }
        }
    }

    /// Apply one recognition event
    pub fn apply_recognition_event(&mut self, event: RecognitionEvent, now: Instant) {
        match event {
            RecognitionEvent::Started => {
                self.is_listening = true;
            }
            RecognitionEvent::Ended => {
                self.is_listening = false;
                self.interim_transcript.clear();
                self.transcript_deadline = None;
            }
            RecognitionEvent::Interim(text) => {
                self.interim_transcript = text;
                self.transcript_deadline = Some(now + TRANSCRIPT_FADE);
            }
            RecognitionEvent::Final(text) => {
                self.interim_transcript.clear();
                self.transcript_deadline = None;

                let text = text.trim().to_string();
                if self.voice_mode {
                    // Voice mode sends directly, never touching the draft
                    self.send_text(&text);
                } else {
                    self.input_text = text;
                }
            }
            RecognitionEvent::Error(error) => {
                warn!("Recognition error: {}", error);
                self.last_error = Some(error);
            }
        }
    }

    /// Toggle the microphone for dictation into the draft. No-op when
    /// the speech capability is absent.
    pub fn toggle_mic(&mut self) {
        if self.recognition.is_none() {
            return;
        }
        self.dismiss_landing();

        let listening = self.is_listening;
        let Some(session) = self.recognition.as_mut() else {
            return;
        };

        if listening {
            session.stop();
        } else if let Err(e) = session.start() {
            warn!("Failed to start recognition: {}", e);
            self.last_error = Some(e.to_string());
        }
    }

    /// Activate the live voice overlay and start recognition
    pub fn open_voice_mode(&mut self) {
        self.voice_mode = true;
        if let Some(session) = self.recognition.as_mut() {
            if let Err(e) = session.start() {
                warn!("Failed to start recognition: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Close the live voice overlay and stop recognition
    pub fn close_voice_mode(&mut self) {
        self.voice_mode = false;
        if let Some(session) = self.recognition.as_mut() {
            session.stop();
        }
    }

    /// Whether the transcript preview should currently be shown
    pub fn transcript_visible(&self, now: Instant) -> bool {
        !self.interim_transcript.is_empty()
            && self.transcript_deadline.is_some_and(|deadline| now < deadline)
    }

    /// Opacity for the overlay's transcript preview: fully visible for
    /// most of the fade window, easing out over the final stretch
    pub fn transcript_opacity(&self, now: Instant) -> f32 {
        const EASE_OUT_SECS: f32 = 0.4;

        match self.transcript_deadline {
            Some(deadline) if now < deadline => {
                let remaining = deadline.duration_since(now).as_secs_f32();
                (remaining / EASE_OUT_SECS).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn finish_request(&mut self) {
        self.is_responding = false;
        self.pending_request = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{RecognitionSession, SessionControl};
    use crossbeam_channel::bounded;

    #[test]
    fn test_mic_toggle_with_capability_dismisses_landing_and_starts() {
        let (audio_tx, _audio_rx) = bounded(4);
        let (control_tx, control_rx) = bounded(16);
        let (_event_tx, event_rx) = bounded(4);

        let mut state = AppState::new();
        state.recognition = Some(RecognitionSession::from_channels(
            audio_tx, control_tx, event_rx,
        ));
        assert!(state.show_landing);

        state.toggle_mic();

        assert!(!state.show_landing);
        assert!(matches!(control_rx.try_recv(), Ok(SessionControl::Start)));
    }
}
