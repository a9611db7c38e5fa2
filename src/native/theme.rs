use crate::config::{Settings, DEFAULT_ACCENT_COLOR};
use eframe::egui::{self, Color32, Context, Rounding, Stroke};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_inverse: Color32,
    pub input_bg: Color32,
    pub input_text: Color32,
    pub sidebar_bg: Color32,
    pub hover_bg: Color32,
}

pub const LIGHT_PALETTE: Palette = Palette {
    bg_primary: Color32::from_rgb(0xF0, 0xF2, 0xF5),
    bg_secondary: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    text_primary: Color32::from_rgb(0x33, 0x33, 0x33),
    text_secondary: Color32::from_rgb(0x66, 0x66, 0x66),
    text_inverse: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    input_bg: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    input_text: Color32::from_rgb(0x33, 0x33, 0x33),
    sidebar_bg: Color32::from_rgb(0xE8, 0xEC, 0xF0),
    hover_bg: Color32::from_rgb(0xE8, 0xE8, 0xE8),
};

pub const DARK_PALETTE: Palette = Palette {
    bg_primary: Color32::from_rgb(0x1E, 0x1E, 0x1E),
    bg_secondary: Color32::from_rgb(0x2D, 0x2D, 0x30),
    text_primary: Color32::from_rgb(0xE8, 0xE8, 0xE8),
    text_secondary: Color32::from_rgb(0xBB, 0xBB, 0xBB),
    text_inverse: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    input_bg: Color32::from_rgb(0x3E, 0x3E, 0x42),
    input_text: Color32::from_rgb(0xFF, 0xFF, 0xFF),
    sidebar_bg: Color32::from_rgb(0x25, 0x25, 0x26),
    hover_bg: Color32::from_rgb(0x3E, 0x3E, 0x42),
};

pub const PRESET_ACCENTS: [&str; 8] = [
    "#2A7FFF", "#FF5722", "#4CAF50", "#9C27B0", "#F44336", "#009688", "#FFC107", "#795548",
];

const LIGHT_SENDER: Color32 = Color32::from_rgb(0x00, 0x66, 0xCC);
const DARK_SENDER: Color32 = Color32::from_rgb(0x7A, 0xDB, 0xFC);

/// `#RRGGBB` (the `#` is optional).
pub fn parse_hex_color(raw: &str) -> Option<Color32> {
    let hex = raw.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

pub fn to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

// ── Theme ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub dark_mode: bool,
    pub palette: Palette,
    pub accent: Color32,
    pub accent_hex: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(false, DEFAULT_ACCENT_COLOR)
    }
}

impl Theme {
    /// An unparseable accent falls back to the default one.
    pub fn new(dark_mode: bool, accent_hex: &str) -> Self {
        let (accent, accent_hex) = match parse_hex_color(accent_hex) {
            Some(color) => (color, to_hex(color)),
            None => {
                log::warn!("invalid accent colour '{accent_hex}', using {DEFAULT_ACCENT_COLOR}");
                (
                    parse_hex_color(DEFAULT_ACCENT_COLOR).unwrap_or(Color32::LIGHT_BLUE),
                    DEFAULT_ACCENT_COLOR.to_string(),
                )
            }
        };
        Self {
            dark_mode,
            palette: if dark_mode { DARK_PALETTE } else { LIGHT_PALETTE },
            accent,
            accent_hex,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.dark_mode, &settings.accent_color)
    }

    pub fn with_dark_mode(&self, dark_mode: bool) -> Self {
        Self::new(dark_mode, &self.accent_hex)
    }

    pub fn sender_color(&self) -> Color32 {
        if self.dark_mode {
            DARK_SENDER
        } else {
            LIGHT_SENDER
        }
    }

    pub fn message_color(&self) -> Color32 {
        self.palette.text_primary
    }
}

/// Colours a panel paints with, captured from the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub palette: Palette,
    pub accent: Color32,
    pub sender: Color32,
    pub message: Color32,
}

impl Skin {
    pub fn of(theme: &Theme) -> Self {
        Self {
            palette: theme.palette,
            accent: theme.accent,
            sender: theme.sender_color(),
            message: theme.message_color(),
        }
    }
}

impl Default for Skin {
    fn default() -> Self {
        Self::of(&Theme::default())
    }
}

pub trait Themeable {
    fn apply_theme(&mut self, theme: &Theme);
}

pub fn apply_to_all(targets: &mut [&mut dyn Themeable], theme: &Theme) {
    for target in targets.iter_mut() {
        target.apply_theme(theme);
    }
}

pub fn configure_visuals(ctx: &Context, theme: &Theme) {
    let p = theme.palette;
    let mut visuals = if theme.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.override_text_color = Some(p.text_primary);
    visuals.window_fill = p.bg_secondary;
    visuals.panel_fill = p.bg_primary;
    visuals.extreme_bg_color = p.input_bg;
    visuals.faint_bg_color = p.bg_secondary;
    visuals.widgets.noninteractive.bg_fill = p.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke.color = p.text_primary;
    visuals.widgets.inactive.bg_fill = p.bg_secondary;
    visuals.widgets.inactive.weak_bg_fill = p.bg_secondary;
    visuals.widgets.inactive.fg_stroke.color = p.text_primary;
    visuals.widgets.hovered.bg_fill = p.hover_bg;
    visuals.widgets.hovered.weak_bg_fill = p.hover_bg;
    visuals.widgets.hovered.fg_stroke.color = p.text_primary;
    visuals.widgets.active.bg_fill = theme.accent;
    visuals.widgets.active.weak_bg_fill = theme.accent;
    visuals.widgets.active.fg_stroke.color = p.text_inverse;
    visuals.selection.bg_fill = theme.accent;
    visuals.selection.stroke = Stroke::new(1.0, p.text_inverse);
    visuals.hyperlink_color = theme.accent;
    visuals.window_rounding = Rounding::same(6.0);
    ctx.set_visuals(visuals);
}

/// Filled accent button with inverse text.
pub fn accent_button(text: &str, skin: &Skin) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(skin.palette.text_inverse))
        .fill(skin.accent)
}

pub fn heading(text: &str, skin: &Skin) -> egui::RichText {
    egui::RichText::new(text.to_string())
        .size(20.0)
        .strong()
        .color(skin.accent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(
            parse_hex_color("#2A7FFF"),
            Some(Color32::from_rgb(0x2A, 0x7F, 0xFF))
        );
        assert_eq!(
            parse_hex_color("ff5722"),
            Some(Color32::from_rgb(0xFF, 0x57, 0x22))
        );
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#ÄÄÄ"), None);
    }

    #[test]
    fn invalid_accent_falls_back_to_default() {
        let theme = Theme::new(true, "not-a-colour");
        assert_eq!(theme.accent_hex, DEFAULT_ACCENT_COLOR);
        assert_eq!(theme.palette, DARK_PALETTE);
    }

    #[test]
    fn transcript_colours_follow_mode() {
        let light = Theme::new(false, "#4CAF50");
        assert_eq!(to_hex(light.sender_color()), "#0066CC");
        assert_eq!(to_hex(light.message_color()), "#333333");
        let dark = light.with_dark_mode(true);
        assert_eq!(to_hex(dark.sender_color()), "#7ADBFC");
        assert_eq!(to_hex(dark.message_color()), "#E8E8E8");
        assert_eq!(dark.accent_hex, "#4CAF50");
    }

    struct Probe(Option<Color32>);

    impl Themeable for Probe {
        fn apply_theme(&mut self, theme: &Theme) {
            self.0 = Some(theme.palette.bg_primary);
        }
    }

    #[test]
    fn every_target_is_recoloured() {
        let (mut a, mut b) = (Probe(None), Probe(None));
        apply_to_all(&mut [&mut a, &mut b], &Theme::new(true, "#2A7FFF"));
        assert_eq!(a.0, Some(DARK_PALETTE.bg_primary));
        assert_eq!(b.0, Some(DARK_PALETTE.bg_primary));
    }
}
