//! Input bar component
//!
//! Provides the draft text input, microphone toggle, live session
//! button, and send control.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Input bar for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    self.show_text_input(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_mic_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_live_button(ui);
                    ui.add_space(self.theme.spacing_sm);
                    self.show_send_button(ui);
                });
            });
    }

    fn show_text_input(&mut self, ui: &mut egui::Ui) {
        let is_responding = self.state.is_responding;
        let hint = if is_responding {
            "Vera is thinking..."
        } else {
            "Ask anything"
        };

        // Reserve space for the three buttons
        let available_width = ui.available_width() - 170.0;

        let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
            .hint_text(hint)
            .desired_width(available_width)
            .font(egui::TextStyle::Body)
            .margin(egui::Margin::symmetric(12.0, 8.0));

        let response = ui.add_enabled(!is_responding, text_edit);

        if response.changed() {
            self.state.note_draft_edited();
        }

        if response.has_focus() {
            let enter_pressed = ui.input(|i| i.key_pressed(Key::Enter));
            if enter_pressed {
                self.state.send_draft();
            }
        }
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        let is_listening = self.state.is_listening;
        let mic_available = self.state.recognition.is_some();

        let color = if is_listening {
            self.theme.listening
        } else {
            self.theme.text_secondary
        };

        let mut button = egui::Button::new(RichText::new("🎤").size(18.0).color(color))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding);

        if is_listening {
            button = button.fill(self.theme.listening.gamma_multiply(0.2));
        }

        let tooltip = if !mic_available {
            "Voice input unavailable"
        } else if is_listening {
            "Stop listening"
        } else {
            "Dictate into the message field"
        };

        let response = ui.add_enabled(!self.state.is_responding, button);
        if response.clicked() {
            self.state.toggle_mic();
        }
        response.on_hover_text(tooltip);
    }

    fn show_live_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(
            RichText::new("〰").size(18.0).color(self.theme.text_secondary),
        )
        .min_size(Vec2::splat(44.0))
        .rounding(self.theme.button_rounding);

        let response = ui.add_enabled(!self.state.is_responding, button);
        if response.clicked() {
            self.state.open_voice_mode();
        }
        response.on_hover_text("Start a live voice session");
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty() && !self.state.is_responding;

        let fill = if can_send {
            self.theme.primary
        } else {
            self.theme.bg_tertiary
        };

        let button = egui::Button::new(
            RichText::new("➤").size(18.0).color(egui::Color32::WHITE),
        )
        .min_size(Vec2::splat(44.0))
        .rounding(self.theme.button_rounding)
        .fill(fill);

        let response = ui.add_enabled(can_send, button);
        if response.clicked() {
            self.state.send_draft();
        }
        response.on_hover_text("Send message (Enter)");
    }
}
