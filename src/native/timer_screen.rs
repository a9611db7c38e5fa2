use super::app::ScreenEvent;
use super::prompt::Notice;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::timer::{
    SessionKind, StudyTimer, TimerEvent, TimerState, BREAK_MINUTES_RANGE, WORK_MINUTES_RANGE,
};
use chrono::Local;
use eframe::egui::{self, RichText, Ui};
use std::time::Instant;

pub struct TimerPanel {
    skin: Skin,
    pub timer: StudyTimer,
    work_minutes: u32,
    break_minutes: u32,
    /// `(HH:MM, text)` pairs, oldest first.
    pub session_log: Vec<(String, String)>,
}

impl TimerPanel {
    pub fn new(theme: &Theme) -> Self {
        let timer = StudyTimer::default();
        let mut panel = Self {
            skin: Skin::of(theme),
            work_minutes: timer.work_minutes(),
            break_minutes: timer.break_minutes(),
            timer,
            session_log: Vec::new(),
        };
        panel.log("Study Timer Ready");
        panel
    }

    fn log(&mut self, text: &str) {
        self.session_log
            .push((Local::now().format("%H:%M").to_string(), text.to_string()));
    }

    /// Logs each event; a completion also yields its notice.
    pub fn record(&mut self, events: Vec<TimerEvent>) -> Option<Notice> {
        let mut notice = None;
        for event in events {
            self.log(event.describe());
            if let Some(text) = event.notice() {
                let title = match event {
                    TimerEvent::SessionComplete {
                        finished: SessionKind::Break,
                    } => "Break Complete",
                    _ => "Session Complete",
                };
                notice = Some(Notice::info(title, text));
            }
        }
        notice
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        let now = Instant::now();
        let ticked = self.timer.poll(now);
        let mut notice = self.record(ticked);
        if let Some(next) = self.timer.next_tick() {
            ui.ctx()
                .request_repaint_after(next.saturating_duration_since(now));
        }

        ui.label(heading("Study Timer", &self.skin));
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(self.timer.display())
                    .monospace()
                    .size(64.0)
                    .strong()
                    .color(self.skin.accent),
            );
            ui.label(
                RichText::new(self.timer.status_text())
                    .size(16.0)
                    .color(self.skin.palette.text_secondary),
            );
        });
        ui.add_space(12.0);

        let mut events = Vec::new();
        ui.horizontal(|ui| {
            let running = self.timer.state() == TimerState::Running;
            let start_label = if self.timer.state() == TimerState::Paused {
                "Resume"
            } else {
                "Start"
            };
            if ui
                .add_enabled(!running, accent_button(start_label, &self.skin))
                .clicked()
            {
                events.extend(self.timer.start(Instant::now()));
            }
            if ui
                .add_enabled(running, egui::Button::new("Pause"))
                .clicked()
            {
                events.extend(self.timer.pause());
            }
            if ui.button("Reset").clicked() {
                events.push(self.timer.reset());
            }
        });
        if !events.is_empty() {
            ui.ctx().request_repaint();
        }
        notice = self.record(events).or(notice);

        ui.add_space(16.0);
        ui.group(|ui| {
            ui.label(RichText::new("Timer Settings").strong().color(self.skin.accent));
            ui.horizontal(|ui| {
                ui.label("Work Duration (min):");
                let changed = ui
                    .add(egui::Slider::new(
                        &mut self.work_minutes,
                        WORK_MINUTES_RANGE.0..=WORK_MINUTES_RANGE.1,
                    ))
                    .changed();
                if changed {
                    self.timer.set_work_minutes(self.work_minutes);
                }
            });
            ui.horizontal(|ui| {
                ui.label("Break Duration (min):");
                let changed = ui
                    .add(egui::Slider::new(
                        &mut self.break_minutes,
                        BREAK_MINUTES_RANGE.0..=BREAK_MINUTES_RANGE.1,
                    ))
                    .changed();
                if changed {
                    self.timer.set_break_minutes(self.break_minutes);
                }
            });
        });

        ui.add_space(16.0);
        ui.label(RichText::new("Work Session Log").strong().color(self.skin.accent));
        egui::Frame::none()
            .fill(self.skin.palette.bg_secondary)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for (stamp, text) in &self.session_log {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(format!("[{stamp}]"))
                                        .strong()
                                        .color(self.skin.sender),
                                );
                                ui.label(RichText::new(text).color(self.skin.message));
                            });
                        }
                    });
            });

        match notice {
            Some(notice) => ScreenEvent::Notice(notice),
            None => ScreenEvent::None,
        }
    }
}

impl Themeable for TimerPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::timer::WORK_DONE_NOTICE;

    #[test]
    fn completion_is_logged_and_announced() {
        let mut panel = TimerPanel::new(&Theme::default());
        assert_eq!(panel.session_log.len(), 1);
        panel.timer.set_work_minutes(1);
        let started = panel.timer.start(Instant::now());
        assert!(panel.record(started.into_iter().collect()).is_none());

        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(panel.timer.tick());
        }
        let notice = panel.record(events).unwrap();
        assert_eq!(notice.message, WORK_DONE_NOTICE);
        assert_eq!(panel.timer.kind(), SessionKind::Break);
        let texts: Vec<_> = panel.session_log.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Study Timer Ready", "Session started", "Work session completed"]
        );
    }
}
