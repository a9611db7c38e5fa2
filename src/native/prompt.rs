use super::theme::{accent_button, Skin};
use eframe::egui::{self, Align2, Context, Id, Key, RichText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Blocking message box; the panels underneath stay disabled until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Returns `true` once the notice is dismissed (OK button, or Enter/Escape
/// when `keys` is set). Pass `keys = false` on the frame the notice opens so
/// the key press that raised it cannot also close it.
pub fn draw_notice(ctx: &Context, notice: &Notice, skin: &Skin, keys: bool) -> bool {
    let mut dismissed = keys
        && ctx.input_mut(|i| {
            i.consume_key(egui::Modifiers::NONE, Key::Enter)
                || i.consume_key(egui::Modifiers::NONE, Key::Escape)
        });

    let screen = ctx.screen_rect();
    egui::Area::new(Id::new("notice_backdrop"))
        .fixed_pos(screen.min)
        .order(egui::Order::Middle)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(96));
        });

    let title_color = match notice.kind {
        NoticeKind::Info => skin.accent,
        NoticeKind::Error => egui::Color32::from_rgb(0xF4, 0x43, 0x36),
    };
    egui::Window::new(RichText::new(&notice.title).strong().color(title_color))
        .id(Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .order(egui::Order::Foreground)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(280.0);
            ui.add_space(4.0);
            ui.label(RichText::new(&notice.message).color(skin.palette.text_primary));
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                if ui.add(accent_button("OK", skin)).clicked() {
                    dismissed = true;
                }
            });
        });
    dismissed
}
