//! Live voice-mode overlay
//!
//! Full-screen layer shown while voice mode is active: an animated
//! waveform, a listening prompt, and a fading transcript preview.
//! Purely reactive over the app state; the close action is returned to
//! the parent, which owns the recognition session.

use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align2, Color32, FontId, Order, Pos2, Rect, RichText, Vec2};
use std::time::Instant;

const BAR_COUNT: usize = 15;

/// What the overlay asked the parent to do this frame
#[derive(Debug, Default)]
pub struct OverlayResponse {
    pub close_requested: bool,
}

/// Voice-mode overlay component
pub struct VoiceOverlay<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> VoiceOverlay<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ctx: &egui::Context, now: Instant) -> OverlayResponse {
        let mut response = OverlayResponse::default();
        let screen = ctx.screen_rect();

        egui::Area::new(egui::Id::new("voice_overlay"))
            .order(Order::Foreground)
            .fixed_pos(screen.min)
            .show(ctx, |ui| {
                ui.set_min_size(screen.size());

                let painter = ui.painter();
                painter.rect_filled(screen, 0.0, self.theme.overlay_backdrop);

                self.draw_waveform(ui, screen);
                self.draw_listening_text(ui, screen);
                self.draw_transcript(ui, screen, now);

                // Close control, top right
                let close_rect = Rect::from_min_size(
                    Pos2::new(screen.right() - 60.0, screen.top() + 20.0),
                    Vec2::splat(40.0),
                );
                let close = ui.put(
                    close_rect,
                    egui::Button::new(
                        RichText::new("✕").size(20.0).color(self.theme.text_secondary),
                    )
                    .fill(Color32::TRANSPARENT)
                    .rounding(self.theme.button_rounding),
                );
                if close.clicked() {
                    response.close_requested = true;
                }
            });

        // Keep the waveform moving
        ctx.request_repaint();

        response
    }

    fn draw_waveform(&self, ui: &egui::Ui, screen: Rect) {
        let painter = ui.painter();
        let t = ui.ctx().input(|i| i.time);

        let center = Pos2::new(screen.center().x, screen.center().y - 40.0);
        let bar_width = 6.0;
        let bar_gap = 8.0;
        let total_width = BAR_COUNT as f32 * (bar_width + bar_gap) - bar_gap;
        let left = center.x - total_width / 2.0;
        let max_height = 90.0;

        for i in 0..BAR_COUNT {
            // Each bar oscillates with its own phase; quiet when idle
            let phase = i as f64 * 0.45;
            let wave = ((t * 4.0 + phase).sin() * 0.5 + 0.5) as f32;
            let (height, color) = if self.state.is_listening {
                (12.0 + wave * max_height, self.theme.waveform_active)
            } else {
                (8.0 + wave * 6.0, self.theme.waveform_inactive)
            };

            let x = left + i as f32 * (bar_width + bar_gap) + bar_width / 2.0;
            let bar_rect = Rect::from_center_size(
                Pos2::new(x, center.y),
                Vec2::new(bar_width, height),
            );

            let gradient_factor = 1.0 - (i as f32 / BAR_COUNT as f32 - 0.5).abs() * 0.6;
            painter.rect_filled(bar_rect, 3.0, color.gamma_multiply(gradient_factor));
        }
    }

    fn draw_listening_text(&self, ui: &egui::Ui, screen: Rect) {
        let painter = ui.painter();
        let center_x = screen.center().x;
        let base_y = screen.center().y + 60.0;

        painter.text(
            Pos2::new(center_x, base_y),
            Align2::CENTER_CENTER,
            "Vera Listening",
            FontId::proportional(24.0),
            self.theme.text_primary,
        );

        painter.text(
            Pos2::new(center_x, base_y + 32.0),
            Align2::CENTER_CENTER,
            "Speak naturally...",
            FontId::proportional(14.0),
            self.theme.text_muted,
        );
    }

    fn draw_transcript(&self, ui: &egui::Ui, screen: Rect, now: Instant) {
        if !self.state.transcript_visible(now) {
            return;
        }

        let opacity = self.state.transcript_opacity(now);
        let painter = ui.painter();

        painter.text(
            Pos2::new(screen.center().x, screen.bottom() - 80.0),
            Align2::CENTER_CENTER,
            &self.state.interim_transcript,
            FontId::proportional(18.0),
            self.theme.text_primary.gamma_multiply(opacity),
        );
    }
}
