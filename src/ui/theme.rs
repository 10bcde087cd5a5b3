//! Visual theme for the Vera UI

use egui::{Color32, Rounding};

/// Color palette, spacing, and rounding shared by all components
#[derive(Clone, Debug)]
pub struct Theme {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    pub primary: Color32,
    pub user_bubble: Color32,
    pub assistant_bubble: Color32,

    pub listening: Color32,
    pub waveform_active: Color32,
    pub waveform_inactive: Color32,
    pub overlay_backdrop: Color32,

    pub spacing: f32,
    pub spacing_sm: f32,

    pub card_rounding: Rounding,
    pub bubble_rounding: Rounding,
    pub button_rounding: Rounding,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg_primary: Color32::from_rgb(18, 18, 22),
            bg_secondary: Color32::from_rgb(28, 28, 34),
            bg_tertiary: Color32::from_rgb(40, 40, 48),

            text_primary: Color32::from_rgb(235, 235, 240),
            text_secondary: Color32::from_rgb(190, 190, 200),
            text_muted: Color32::from_rgb(130, 130, 145),

            primary: Color32::from_rgb(99, 102, 241),
            user_bubble: Color32::from_rgb(99, 102, 241),
            assistant_bubble: Color32::from_rgb(40, 40, 48),

            listening: Color32::from_rgb(239, 68, 68),
            waveform_active: Color32::from_rgb(129, 140, 248),
            waveform_inactive: Color32::from_rgb(70, 70, 82),
            overlay_backdrop: Color32::from_rgba_premultiplied(10, 10, 14, 245),

            spacing: 12.0,
            spacing_sm: 6.0,

            card_rounding: Rounding::same(10.0),
            bubble_rounding: Rounding::same(14.0),
            button_rounding: Rounding::same(22.0),
        }
    }

    /// Apply the theme to the egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.override_text_color = Some(self.text_primary);
        ctx.set_visuals(visuals);
    }
}
