//! Main application struct and eframe integration

use crate::backend::{AskCommand, AskWorker, BackendConfig};
use crate::speech::{RecognitionConfig, RecognitionSession};
use crate::ui::components::{InputBar, MessageList, VoiceOverlay};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Instant;
use tracing::info;

/// Main Vera application
pub struct VeraApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
    /// Whether backend and speech wiring has happened
    initialized: bool,
}

impl VeraApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state: AppState::new(),
            theme,
            initialized: false,
        }
    }

    /// Wire up the backend worker and the optional speech capability
    /// (called on first frame)
    fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        let worker = AskWorker::new(BackendConfig::default());
        self.state.ask_command_tx = Some(worker.command_sender());
        self.state.ask_event_rx = Some(worker.event_receiver());
        let _ = worker.start_worker();

        match RecognitionSession::new(RecognitionConfig::default()) {
            Ok(session) => {
                self.state.recognition_event_rx = Some(session.event_receiver());
                self.state.recognition = Some(session);
                info!("Speech recognition ready");
            }
            Err(e) => {
                // Silent degradation: voice controls become no-ops
                info!("Speech recognition unavailable: {}", e);
            }
        }

        self.initialized = true;
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Vera")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("AI Assistant")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if self.state.is_listening {
                            ui.label(
                                RichText::new("● listening")
                                    .size(12.0)
                                    .color(self.theme.listening),
                            );
                        }
                    });
                });
            });
    }

    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for VeraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Wire workers on first frame
        self.initialize();

        // Apply backend and recognition events
        self.state.poll_events(now);

        self.show_header(ctx);
        if !self.state.voice_mode {
            self.show_input_area(ctx);
        }
        self.show_content(ctx);

        if self.state.voice_mode {
            let overlay = VoiceOverlay::new(&self.state, &self.theme).show(ctx, now);
            if overlay.close_requested {
                self.state.close_voice_mode();
            }
        }

        // Keep polling while something is in flight
        if self.state.is_responding || self.state.is_listening || self.state.voice_mode {
            ctx.request_repaint();
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(session) = self.state.recognition.as_mut() {
            session.stop();
        }
        if let Some(tx) = &self.state.ask_command_tx {
            let _ = tx.send(AskCommand::Shutdown);
        }
        info!("Vera shutting down");
    }
}
