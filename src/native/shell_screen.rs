use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use super::worker::PanelKind;
use eframe::egui::{self, Key, RichText, Ui};

pub const APP_NAME: &str = "StudyDesk";

// ── Login ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginEvent {
    None,
    Submit,
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: String,
    pub password: String,
    focus_password: bool,
    skin: Skin,
}

impl LoginScreen {
    pub fn new(theme: &Theme) -> Self {
        Self {
            skin: Skin::of(theme),
            ..Default::default()
        }
    }

    /// Clears the password and moves focus back to it.
    pub fn reject(&mut self) {
        self.password.clear();
        self.focus_password = true;
    }

    pub fn ui(&mut self, ui: &mut Ui) -> LoginEvent {
        let mut event = LoginEvent::None;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            egui::Frame::none()
                .fill(self.skin.palette.bg_secondary)
                .rounding(8.0)
                .inner_margin(24.0)
                .show(ui, |ui| {
                    ui.set_width(320.0);
                    ui.label(heading(&format!("Welcome to {APP_NAME}"), &self.skin));
                    ui.add_space(16.0);

                    ui.label("Username:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.username).desired_width(260.0),
                    );
                    ui.add_space(6.0);
                    ui.label("Password:");
                    let password = ui.add(
                        egui::TextEdit::singleline(&mut self.password)
                            .password(true)
                            .desired_width(260.0),
                    );
                    if self.focus_password {
                        password.request_focus();
                        self.focus_password = false;
                    }
                    if password.lost_focus() && take_enter(ui) {
                        event = LoginEvent::Submit;
                    }

                    ui.add_space(12.0);
                    if ui.add(accent_button("Login", &self.skin)).clicked() {
                        event = LoginEvent::Submit;
                    }
                    ui.add_space(12.0);
                    ui.label(
                        RichText::new("Default Login: username 'student', password 'learn123'")
                            .small()
                            .color(self.skin.palette.text_secondary),
                    );
                });
        });
        event
    }
}

/// Consumes a pending Enter press so nothing later in the frame reacts to it.
pub(crate) fn take_enter(ui: &Ui) -> bool {
    ui.ctx()
        .input_mut(|i| i.consume_key(egui::Modifiers::NONE, Key::Enter))
}

impl Themeable for LoginScreen {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}

// ── Sidebar ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    None,
    Navigate(PanelKind),
    Advice,
}

const NAV_ENTRIES: [(&str, Option<PanelKind>); 8] = [
    ("Dashboard", Some(PanelKind::Dashboard)),
    ("AI Essay Writer", Some(PanelKind::Essay)),
    ("AI Assistant", Some(PanelKind::Chat)),
    ("Study Timer", Some(PanelKind::Timer)),
    ("To-Do List", Some(PanelKind::Todo)),
    ("Theme Settings", Some(PanelKind::Theme)),
    ("Random Advice", None),
    ("Calculator", Some(PanelKind::Calculator)),
];

#[derive(Debug, Default)]
pub struct Sidebar {
    skin: Skin,
}

impl Sidebar {
    pub fn new(theme: &Theme) -> Self {
        Self {
            skin: Skin::of(theme),
        }
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    pub fn ui(&mut self, ui: &mut Ui, active: PanelKind) -> SidebarEvent {
        let mut event = SidebarEvent::None;
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(APP_NAME)
                    .size(24.0)
                    .strong()
                    .color(self.skin.accent),
            );
        });
        ui.add_space(24.0);
        for (label, target) in NAV_ENTRIES {
            let selected = target == Some(active);
            let text = RichText::new(label).size(15.0).color(if selected {
                self.skin.palette.text_inverse
            } else {
                self.skin.accent
            });
            let mut button = egui::Button::new(text).min_size(egui::vec2(ui.available_width(), 34.0));
            button = if selected {
                button.fill(self.skin.accent)
            } else {
                button.fill(self.skin.palette.sidebar_bg)
            };
            if ui.add(button).clicked() {
                event = match target {
                    Some(kind) => SidebarEvent::Navigate(kind),
                    None => SidebarEvent::Advice,
                };
            }
            ui.add_space(6.0);
        }
        event
    }
}

impl Themeable for Sidebar {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}
