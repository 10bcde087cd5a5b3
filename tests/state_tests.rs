//! State-transition tests for the chat shell and voice mode
//!
//! These drive `AppState` directly with injected channels and events,
//! so no backend, microphone, or model is needed.

use crossbeam_channel::{unbounded, Receiver};
use std::time::{Duration, Instant};
use uuid::Uuid;
use vera::backend::{AskCommand, AskEvent};
use vera::messages::Sender;
use vera::speech::RecognitionEvent;
use vera::ui::{AppState, CONNECTION_APOLOGY, TRANSCRIPT_FADE};

/// State with a captured backend command channel
fn wired_state() -> (AppState, Receiver<AskCommand>) {
    let (tx, rx) = unbounded();
    let mut state = AppState::new();
    state.ask_command_tx = Some(tx);
    (state, rx)
}

/// Pull the request id of the one command the state sent
fn sent_request_id(rx: &Receiver<AskCommand>) -> Uuid {
    match rx.try_recv().expect("expected one command") {
        AskCommand::Ask { request_id, .. } => request_id,
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_empty_and_whitespace_sends_are_no_ops() {
    let (mut state, rx) = wired_state();

    state.send_text("");
    state.send_text("   ");
    state.input_text = "   ".to_string();
    state.send_draft();

    assert!(state.messages.is_empty());
    assert!(!state.is_responding);
    assert!(state.show_landing);
    assert!(rx.try_recv().is_err(), "no command should have been sent");
}

#[test]
fn test_send_appends_user_message_and_clears_draft() {
    let (mut state, rx) = wired_state();
    state.input_text = "Hello".to_string();

    state.send_draft();

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "Hello");
    assert_eq!(state.input_text, "");
    assert!(state.is_responding);
    assert!(!state.show_landing);

    match rx.try_recv().unwrap() {
        AskCommand::Ask { message, .. } => assert_eq!(message, "Hello"),
        other => panic!("unexpected command: {:?}", other),
    }
    assert!(rx.try_recv().is_err(), "exactly one outbound request");
}

#[test]
fn test_reply_appends_exactly_one_assistant_message() {
    let (mut state, rx) = wired_state();
    state.input_text = "Hello".to_string();
    state.send_draft();
    let request_id = sent_request_id(&rx);

    state.apply_ask_event(AskEvent::Reply {
        text: "Hi there".to_string(),
        request_id,
    });

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert_eq!(messages[1].text, "Hi there");
    assert!(!state.is_responding);
}

#[test]
fn test_failure_appends_fixed_apology() {
    let (mut state, rx) = wired_state();
    state.send_text("anyone there?");
    let request_id = sent_request_id(&rx);

    state.apply_ask_event(AskEvent::Failed {
        error: "connection refused".to_string(),
        request_id,
    });

    let last = state.messages.last().unwrap();
    assert_eq!(last.sender, Sender::Assistant);
    assert_eq!(last.text, CONNECTION_APOLOGY);
    assert!(!state.is_responding);
    assert!(state.last_error.is_some());
}

#[test]
fn test_stale_reply_is_dropped() {
    let (mut state, rx) = wired_state();
    state.send_text("question");
    let request_id = sent_request_id(&rx);

    // A reply from some superseded request must not be applied
    state.apply_ask_event(AskEvent::Reply {
        text: "stale answer".to_string(),
        request_id: Uuid::new_v4(),
    });
    assert_eq!(state.messages.len(), 1);
    assert!(state.is_responding, "still waiting for the real reply");

    // The matching reply settles the request
    state.apply_ask_event(AskEvent::Reply {
        text: "real answer".to_string(),
        request_id,
    });
    assert_eq!(state.messages.last().unwrap().text, "real answer");
    assert!(!state.is_responding);
}

#[test]
fn test_overlapping_send_is_ignored_while_pending() {
    let (mut state, rx) = wired_state();
    state.send_text("first");
    let _ = sent_request_id(&rx);

    state.send_text("second");

    assert_eq!(state.messages.len(), 1, "second send ignored");
    assert!(rx.try_recv().is_err(), "no second outbound request");
}

#[test]
fn test_landing_dismissal_is_one_way() {
    let mut state = AppState::new();
    assert!(state.show_landing);

    // Empty edits do not dismiss
    state.note_draft_edited();
    assert!(state.show_landing);

    state.input_text = "h".to_string();
    state.note_draft_edited();
    assert!(!state.show_landing);

    // Clearing the draft never brings the landing back
    state.input_text.clear();
    state.note_draft_edited();
    assert!(!state.show_landing);
}

#[test]
fn test_send_without_backend_falls_back_immediately() {
    let mut state = AppState::new();

    state.send_text("hello?");

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[1].text, CONNECTION_APOLOGY);
    assert!(!state.is_responding);
}

#[test]
fn test_recognition_end_clears_interim_transcript() {
    let mut state = AppState::new();
    let now = Instant::now();

    state.apply_recognition_event(RecognitionEvent::Started, now);
    assert!(state.is_listening);

    state.apply_recognition_event(RecognitionEvent::Interim("hel".to_string()), now);
    assert_eq!(state.interim_transcript, "hel");
    assert!(state.transcript_visible(now));

    state.apply_recognition_event(RecognitionEvent::Ended, now);
    assert!(!state.is_listening);
    assert!(state.interim_transcript.is_empty());
    assert!(!state.transcript_visible(now));
}

#[test]
fn test_voice_mode_final_transcript_sends_directly() {
    let (mut state, rx) = wired_state();
    state.open_voice_mode();
    assert!(state.voice_mode);

    let now = Instant::now();
    state.apply_recognition_event(
        RecognitionEvent::Final("what is the weather".to_string()),
        now,
    );

    // Sent as a user message without ever populating the draft
    assert_eq!(state.input_text, "");
    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "what is the weather");
    assert!(state.is_responding);
    let _ = sent_request_id(&rx);
}

#[test]
fn test_final_transcript_outside_voice_mode_fills_draft() {
    let mut state = AppState::new();
    let now = Instant::now();

    state.apply_recognition_event(
        RecognitionEvent::Final("  hello there  ".to_string()),
        now,
    );

    assert_eq!(state.input_text, "hello there");
    assert!(state.messages.is_empty());
    assert!(!state.is_responding);
}

#[test]
fn test_transcript_fade_is_a_single_restarting_timer() {
    let mut state = AppState::new();
    let t0 = Instant::now();

    state.apply_recognition_event(RecognitionEvent::Interim("a".to_string()), t0);
    assert!(state.transcript_visible(t0 + Duration::from_millis(1900)));
    assert!(!state.transcript_visible(t0 + TRANSCRIPT_FADE));

    // A new value before the fade elapses restarts the timer
    let t1 = t0 + Duration::from_secs(1);
    state.apply_recognition_event(RecognitionEvent::Interim("ab".to_string()), t1);
    assert_eq!(state.interim_transcript, "ab");
    assert!(state.transcript_visible(t0 + Duration::from_millis(2500)));
    assert!(!state.transcript_visible(t1 + TRANSCRIPT_FADE));
}

#[test]
fn test_overlay_closed_before_fade_clears_via_end_path() {
    let mut state = AppState::new();
    let t0 = Instant::now();

    state.open_voice_mode();
    state.apply_recognition_event(RecognitionEvent::Interim("closing soon".to_string()), t0);

    // Overlay closed within the fade window; recognition end clears the
    // transcript before any fade deadline elapses
    state.close_voice_mode();
    state.apply_recognition_event(RecognitionEvent::Ended, t0 + Duration::from_millis(500));

    assert!(!state.voice_mode);
    assert!(state.interim_transcript.is_empty());
    assert!(!state.transcript_visible(t0 + Duration::from_millis(600)));
}

#[test]
fn test_mic_toggle_without_capability_is_inert() {
    let mut state = AppState::new();
    assert!(state.recognition.is_none());

    state.toggle_mic();

    assert!(!state.is_listening);
    assert!(state.show_landing, "landing untouched when capability absent");
}

#[test]
fn test_poll_events_drains_both_channels() {
    let (mut state, command_rx) = wired_state();

    let (ask_tx, ask_rx) = unbounded();
    state.ask_event_rx = Some(ask_rx);
    let (rec_tx, rec_rx) = unbounded();
    state.recognition_event_rx = Some(rec_rx);

    state.send_text("ping");
    let request_id = sent_request_id(&command_rx);

    ask_tx
        .send(AskEvent::Reply {
            text: "pong".to_string(),
            request_id,
        })
        .unwrap();
    rec_tx.send(RecognitionEvent::Started).unwrap();
    rec_tx
        .send(RecognitionEvent::Interim("pi".to_string()))
        .unwrap();

    let now = Instant::now();
    state.poll_events(now);

    assert_eq!(state.messages.last().unwrap().text, "pong");
    assert!(!state.is_responding);
    assert!(state.is_listening);
    assert_eq!(state.interim_transcript, "pi");
}

#[test]
fn test_full_conversation_scenario() {
    let (mut state, rx) = wired_state();

    state.input_text = "Hello".to_string();
    state.send_draft();

    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.input_text, "");
    assert!(state.is_responding);

    let request_id = sent_request_id(&rx);
    state.apply_ask_event(AskEvent::Reply {
        text: "Hi there".to_string(),
        request_id,
    });

    let messages = state.messages.get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(
        (messages[0].sender, messages[0].text.as_str()),
        (Sender::User, "Hello")
    );
    assert_eq!(
        (messages[1].sender, messages[1].text.as_str()),
        (Sender::Assistant, "Hi there")
    );
    assert!(!state.is_responding);
}
