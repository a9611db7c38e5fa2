use super::app::ScreenEvent;
use super::prompt::Notice;
use super::theme::{
    accent_button, heading, parse_hex_color, to_hex, Skin, Theme, Themeable, PRESET_ACCENTS,
};
use eframe::egui::{self, Color32, RichText, Sense, Ui};

pub struct ThemePanel {
    skin: Skin,
    pub dark_mode: bool,
    /// Chosen accent, not yet applied.
    pub accent_hex: String,
    custom_hex: String,
}

impl ThemePanel {
    pub fn new(theme: &Theme) -> Self {
        Self {
            skin: Skin::of(theme),
            dark_mode: theme.dark_mode,
            accent_hex: theme.accent_hex.clone(),
            custom_hex: theme.accent_hex.clone(),
        }
    }

    pub fn use_custom(&mut self) -> ScreenEvent {
        match parse_hex_color(&self.custom_hex) {
            Some(color) => {
                self.accent_hex = to_hex(color);
                self.custom_hex = self.accent_hex.clone();
                ScreenEvent::None
            }
            None => ScreenEvent::Notice(Notice::error(
                "Invalid Colour",
                format!("'{}' is not a #RRGGBB colour.", self.custom_hex.trim()),
            )),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        let mut event = ScreenEvent::None;
        ui.label(heading("Theme Settings", &self.skin));
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.label("Dark Mode:");
            if ui.checkbox(&mut self.dark_mode, "").changed() {
                event = ScreenEvent::PreviewTheme {
                    dark_mode: self.dark_mode,
                };
            }
            let mode = if self.dark_mode { "Dark" } else { "Light" };
            ui.label(RichText::new(mode).color(self.skin.palette.text_secondary));
        });
        ui.add_space(12.0);

        let chosen = parse_hex_color(&self.accent_hex).unwrap_or(self.skin.accent);
        ui.horizontal(|ui| {
            ui.label("Accent Color:");
            swatch(ui, chosen, egui::vec2(60.0, 24.0));
            ui.label(RichText::new(&self.accent_hex).monospace());
        });
        ui.add_space(8.0);

        ui.label("Preset Colors:");
        ui.horizontal_wrapped(|ui| {
            for preset in PRESET_ACCENTS {
                let Some(color) = parse_hex_color(preset) else {
                    continue;
                };
                if swatch(ui, color, egui::vec2(32.0, 32.0))
                    .on_hover_text(preset)
                    .clicked()
                {
                    self.accent_hex = preset.to_string();
                    self.custom_hex = preset.to_string();
                }
            }
        });
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label("Custom Color:");
            ui.add(egui::TextEdit::singleline(&mut self.custom_hex).desired_width(90.0));
            if ui.button("Use Color").clicked() {
                event = self.use_custom();
            }
        });
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            if ui.add(accent_button("Apply Theme", &self.skin)).clicked() {
                event = ScreenEvent::ApplyTheme {
                    accent_hex: self.accent_hex.clone(),
                    dark_mode: self.dark_mode,
                };
            }
            if ui.button("Reset to Default").clicked() {
                event = ScreenEvent::ResetTheme;
            }
        });
        event
    }
}

fn swatch(ui: &mut Ui, color: Color32, size: egui::Vec2) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(size, Sense::click());
    let stroke = if response.hovered() {
        egui::Stroke::new(2.0, ui.visuals().strong_text_color())
    } else {
        egui::Stroke::new(1.0, ui.visuals().weak_text_color())
    };
    ui.painter().rect(rect, 4.0, color, stroke);
    response
}

impl Themeable for ThemePanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_colour_is_normalised_or_rejected() {
        let mut panel = ThemePanel::new(&Theme::default());
        panel.custom_hex = " 9c27b0 ".into();
        assert!(matches!(panel.use_custom(), ScreenEvent::None));
        assert_eq!(panel.accent_hex, "#9C27B0");

        panel.custom_hex = "#12".into();
        assert!(matches!(panel.use_custom(), ScreenEvent::Notice(_)));
        assert_eq!(panel.accent_hex, "#9C27B0");
    }
}
