use super::app::ScreenEvent;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::backend::BackendError;
use crate::core::chat::{
    backend_error_message, route_message, ChatRoute, ChatSender, Transcript, MATH_REPLY_DELAY,
};
use eframe::egui::{self, Key, RichText, Ui};
use std::time::Instant;

pub struct ChatPanel {
    skin: Skin,
    pub transcript: Transcript,
    pub input: String,
    /// Local answers waiting out their reply delay.
    pending: Vec<(Instant, String)>,
    awaiting: usize,
    refocus: bool,
}

impl ChatPanel {
    pub fn new(theme: &Theme) -> Self {
        Self {
            skin: Skin::of(theme),
            transcript: Transcript::with_welcome(),
            input: String::new(),
            pending: Vec::new(),
            awaiting: 0,
            refocus: true,
        }
    }

    pub fn send(&mut self, now: Instant) -> ScreenEvent {
        let Some(route) = route_message(&self.input) else {
            return ScreenEvent::None;
        };
        self.transcript
            .push(ChatSender::User, self.input.trim().to_string());
        self.input.clear();
        match route {
            ChatRoute::Math(answer) => {
                self.pending.push((now + MATH_REPLY_DELAY, answer));
                ScreenEvent::None
            }
            ChatRoute::Backend(prompt) => {
                self.awaiting += 1;
                ScreenEvent::AskAssistant { prompt }
            }
        }
    }

    /// Posts every local answer whose delay has passed and returns the next
    /// deadline, if any.
    pub fn release_due(&mut self, now: Instant) -> Option<Instant> {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|(at, _)| *at <= now);
        self.pending = waiting;
        for (_, answer) in due {
            self.transcript.push(ChatSender::Assistant, answer);
        }
        self.pending.iter().map(|(at, _)| *at).min()
    }

    pub fn on_reply(&mut self, reply: Result<String, BackendError>) {
        self.awaiting = self.awaiting.saturating_sub(1);
        match reply {
            Ok(text) => self.transcript.push(ChatSender::Assistant, text),
            Err(err) => {
                log::warn!("assistant request failed: {err}");
                self.transcript
                    .push(ChatSender::System, backend_error_message(&err.to_string()));
            }
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        let now = Instant::now();
        if let Some(next) = self.release_due(now) {
            ui.ctx().request_repaint_after(next.saturating_duration_since(now));
        }

        let mut event = ScreenEvent::None;
        ui.label(heading("AI Assistant", &self.skin));
        ui.add_space(8.0);
        ui.label(RichText::new("Chat History:").strong());

        let input_row = 48.0;
        egui::Frame::none()
            .fill(self.skin.palette.bg_secondary)
            .inner_margin(10.0)
            .rounding(6.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height((ui.available_height() - input_row).max(120.0))
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in self.transcript.entries() {
                            ui.label(
                                RichText::new(entry.header())
                                    .strong()
                                    .color(self.skin.sender),
                            );
                            ui.label(RichText::new(&entry.message).color(self.skin.message));
                            ui.add_space(6.0);
                        }
                        if self.awaiting > 0 {
                            ui.label(
                                RichText::new("AI Assistant is thinking...")
                                    .italics()
                                    .color(self.skin.palette.text_secondary),
                            );
                        }
                    });
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label("Your question:");
            let width = (ui.available_width() - 80.0).max(120.0);
            let field = ui.add(egui::TextEdit::singleline(&mut self.input).desired_width(width));
            if self.refocus {
                field.request_focus();
                self.refocus = false;
            }
            let entered = field.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if ui.add(accent_button("Send", &self.skin)).clicked() || entered {
                event = self.send(now);
                self.refocus = true;
            }
        });
        event
    }
}

impl Themeable for ChatPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}
