use super::app::ScreenEvent;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::calculator::{Calculator, EQUALS_KEY, KEYPAD};
use eframe::egui::{self, FontId, Key, RichText, Ui};

pub struct CalculatorPanel {
    skin: Skin,
    pub calc: Calculator,
}

impl CalculatorPanel {
    pub fn new(theme: &Theme) -> Self {
        Self {
            skin: Skin::of(theme),
            calc: Calculator::default(),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        ui.label(heading("Calculator", &self.skin));
        ui.add_space(12.0);

        let width = 4.0 * 72.0 + 3.0 * 8.0;
        let display = ui.add(
            egui::TextEdit::singleline(&mut self.calc.buffer)
                .font(FontId::monospace(26.0))
                .horizontal_align(egui::Align::RIGHT)
                .desired_width(width),
        );
        if display.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.calc.evaluate();
        }
        ui.add_space(10.0);

        egui::Grid::new("calculator_keypad")
            .spacing([8.0, 8.0])
            .show(ui, |ui| {
                for row in KEYPAD {
                    for key in row {
                        let label = RichText::new(key).size(20.0);
                        let button = if key == EQUALS_KEY {
                            accent_button(key, &self.skin)
                        } else {
                            egui::Button::new(label.color(self.skin.palette.text_primary))
                                .fill(self.skin.palette.bg_secondary)
                        };
                        if ui.add(button.min_size(egui::vec2(72.0, 52.0))).clicked() {
                            self.calc.press(key);
                        }
                    }
                    ui.end_row();
                }
            });
        ScreenEvent::None
    }
}

impl Themeable for CalculatorPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}
