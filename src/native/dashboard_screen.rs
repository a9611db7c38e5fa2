use super::app::ScreenEvent;
use super::prompt::Notice;
use super::shell_screen::APP_NAME;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::tips::{greeting, random_idea, today_line, DAILY_PROGRESS, HELP_TEXT};
use chrono::{Local, Timelike};
use eframe::egui::{self, RichText, Ui};

pub struct DashboardPanel {
    skin: Skin,
    greeting: String,
    date: String,
    idea: &'static str,
}

impl DashboardPanel {
    pub fn new(theme: &Theme) -> Self {
        let now = Local::now();
        Self {
            skin: Skin::of(theme),
            greeting: format!("{}, student!", greeting(now.hour())),
            date: today_line(&now),
            idea: random_idea(),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        let mut event = ScreenEvent::None;
        ui.label(heading(&self.greeting, &self.skin).size(26.0));
        ui.label(RichText::new(&self.date).color(self.skin.palette.text_secondary));
        ui.add_space(8.0);
        ui.label(format!("Welcome to {APP_NAME}. Pick a tool from the sidebar to get started."));
        ui.add_space(20.0);

        section(ui, &self.skin, "Quick Ideas", |ui, skin| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(self.idea).size(15.0).color(skin.palette.text_primary));
                if ui.small_button("Another").clicked() {
                    self.idea = random_idea();
                }
            });
        });
        ui.add_space(16.0);

        section(ui, &self.skin, "Daily Progress", |ui, skin| {
            ui.add(
                egui::ProgressBar::new(DAILY_PROGRESS)
                    .fill(skin.accent)
                    .show_percentage(),
            );
        });
        ui.add_space(20.0);

        if ui.add(accent_button("Help", &self.skin)).clicked() {
            event = ScreenEvent::Notice(Notice::info("Help Guide", HELP_TEXT));
        }
        event
    }
}

fn section(ui: &mut Ui, skin: &Skin, title: &str, body: impl FnOnce(&mut Ui, &Skin)) {
    egui::Frame::none()
        .fill(skin.palette.bg_secondary)
        .rounding(6.0)
        .inner_margin(14.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).strong().color(skin.accent));
            ui.add_space(6.0);
            body(ui, skin);
        });
}

impl Themeable for DashboardPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}
