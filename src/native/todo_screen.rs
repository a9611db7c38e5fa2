use super::app::{AppContext, ScreenEvent};
use super::prompt::Notice;
use super::shell_screen::take_enter;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::todo::TodoList;
use eframe::egui::{self, RichText, Ui};

enum RowAction {
    Toggle(usize),
    Delete(usize),
}

pub struct TodoPanel {
    pub(crate) skin: Skin,
    pub draft: String,
    pub list: TodoList,
}

impl TodoPanel {
    pub fn new(context: &AppContext) -> Self {
        Self {
            skin: Skin::of(&context.theme),
            draft: String::new(),
            list: TodoList::load(context.paths.todo_file()),
        }
    }

    pub fn add_draft(&mut self) -> ScreenEvent {
        match self.list.add(&self.draft) {
            Ok(()) => {
                self.draft.clear();
                ScreenEvent::None
            }
            Err(err) => ScreenEvent::Notice(Notice::error("Error", err.to_string())),
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) -> ScreenEvent {
        let mut event = ScreenEvent::None;
        ui.label(heading("To-Do List", &self.skin));
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.label("New Task:");
            let width = (ui.available_width() - 100.0).max(120.0);
            let field = ui.add(egui::TextEdit::singleline(&mut self.draft).desired_width(width));
            let entered = field.lost_focus() && take_enter(ui);
            if ui.add(accent_button("Add Task", &self.skin)).clicked() || entered {
                event = self.add_draft();
                field.request_focus();
            }
        });
        ui.add_space(10.0);

        let mut action = None;
        egui::Frame::none()
            .fill(self.skin.palette.bg_secondary)
            .inner_margin(10.0)
            .rounding(6.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height((ui.available_height() - 60.0).max(120.0))
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        if self.list.items().is_empty() {
                            ui.label(
                                RichText::new("No tasks yet.")
                                    .italics()
                                    .color(self.skin.palette.text_secondary),
                            );
                        }
                        for (idx, item) in self.list.items().iter().enumerate() {
                            ui.horizontal(|ui| {
                                let mut done = item.completed;
                                if ui.checkbox(&mut done, "").changed() {
                                    action = Some(RowAction::Toggle(idx));
                                }
                                let text = if item.completed {
                                    RichText::new(&item.text)
                                        .strikethrough()
                                        .color(self.skin.palette.text_secondary)
                                } else {
                                    RichText::new(&item.text).color(self.skin.palette.text_primary)
                                };
                                ui.label(text);
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    if ui.small_button("×").clicked() {
                                        action = Some(RowAction::Delete(idx));
                                    }
                                });
                            });
                        }
                    });
            });

        match action {
            Some(RowAction::Toggle(idx)) => {
                if let Err(err) = self.list.toggle(idx) {
                    log::warn!("{err}");
                }
            }
            Some(RowAction::Delete(idx)) => {
                if let Err(err) = self.list.delete(idx) {
                    log::warn!("{err}");
                }
            }
            None => {}
        }

        ui.add_space(12.0);
        if ui
            .add(egui::Button::new(
                RichText::new("Clear Completed Tasks").color(self.skin.accent),
            ))
            .clicked()
        {
            let removed = self.list.clear_completed();
            log::info!("cleared {removed} completed tasks");
        }
        event
    }
}

impl Themeable for TodoPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;

    fn panel_in(dir: &std::path::Path) -> TodoPanel {
        TodoPanel::new(&AppContext::load(AppPaths::new(dir)))
    }

    #[test]
    fn blank_draft_raises_a_notice_and_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = panel_in(dir.path());
        panel.draft = "   ".into();
        match panel.add_draft() {
            ScreenEvent::Notice(notice) => assert_eq!(notice.message, "Please enter a task!"),
            other => panic!("expected a notice, got {other:?}"),
        }
        assert_eq!(panel.draft, "   ");
        assert!(panel.list.items().is_empty());
    }

    #[test]
    fn added_draft_is_cleared_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut panel = panel_in(dir.path());
        panel.draft = " Outline essay ".into();
        assert!(matches!(panel.add_draft(), ScreenEvent::None));
        assert!(panel.draft.is_empty());
        assert_eq!(panel.list.items()[0].text, "Outline essay");

        let reopened = panel_in(dir.path());
        assert_eq!(reopened.list.items().len(), 1);
        assert!(!reopened.list.items()[0].completed);
    }
}
