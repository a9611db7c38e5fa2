use super::app::{AppContext, ScreenEvent};
use super::prompt::Notice;
use super::theme::{accent_button, heading, Skin, Theme, Themeable};
use crate::core::essay::{
    classify_line, export_essay, EssayError, EssayOutcome, EssayRequest, LineKind,
    GENERATED_NOTICE, GENERATING_PLACEHOLDER, MAX_WORDS, MIN_WORDS,
};
use chrono::Local;
use eframe::egui::{self, text::LayoutJob, FontId, TextFormat, Ui};

pub struct EssayPanel {
    skin: Skin,
    pub topic: String,
    pub word_count: u32,
    pub headers: bool,
    pub bullets: bool,
    pub result: String,
    pub generating: bool,
}

impl EssayPanel {
    pub fn new(context: &AppContext) -> Self {
        Self {
            skin: Skin::of(&context.theme),
            topic: String::new(),
            word_count: context
                .settings
                .get()
                .last_word_count
                .clamp(MIN_WORDS, MAX_WORDS),
            headers: true,
            bullets: true,
            result: String::new(),
            generating: false,
        }
    }

    /// Validates the form and swaps in the placeholder.
    pub fn submit(&mut self) -> ScreenEvent {
        match EssayRequest::new(&self.topic, self.word_count, self.headers, self.bullets) {
            Ok(req) => {
                self.result = GENERATING_PLACEHOLDER.to_string();
                self.generating = true;
                ScreenEvent::GenerateEssay(req)
            }
            Err(err) => ScreenEvent::Notice(Notice::error("Error", err.to_string())),
        }
    }

    pub fn on_result(&mut self, outcome: EssayOutcome) -> Option<Notice> {
        self.result = outcome.text;
        self.generating = false;
        outcome
            .generated
            .then(|| Notice::info("Success", GENERATED_NOTICE))
    }

    fn export(&self, context: &AppContext) -> Notice {
        match export_essay(
            context.paths.export_dir(),
            &self.topic,
            &self.result,
            &Local::now(),
        ) {
            Ok(path) => Notice::info("Success", format!("Essay exported to {}", path.display())),
            Err(err @ EssayError::NothingToExport) => Notice::error("Error", err.to_string()),
            Err(err) => {
                log::error!("{err}");
                Notice::error("Error", format!("Failed to export essay: {err}"))
            }
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, context: &AppContext) -> ScreenEvent {
        let mut event = ScreenEvent::None;
        ui.label(heading("AI Essay Writer", &self.skin));
        ui.add_space(12.0);

        egui::Grid::new("essay_form")
            .num_columns(2)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label("Essay Topic:");
                ui.add(egui::TextEdit::singleline(&mut self.topic).desired_width(360.0));
                ui.end_row();

                ui.label("Word Count:");
                ui.add(
                    egui::Slider::new(&mut self.word_count, MIN_WORDS..=MAX_WORDS)
                        .step_by(10.0)
                        .suffix(" words"),
                );
                ui.end_row();

                ui.label("Format Options:");
                ui.horizontal(|ui| {
                    ui.checkbox(&mut self.headers, "Add Headers");
                    ui.checkbox(&mut self.bullets, "Add Bullet Points");
                });
                ui.end_row();
            });

        ui.add_space(10.0);
        let generate = ui.add_enabled(
            !self.generating,
            accent_button("Generate Essay", &self.skin),
        );
        if generate.clicked() {
            event = self.submit();
        }

        ui.add_space(12.0);
        ui.label(egui::RichText::new("Generated Essay:").strong());
        let skin = self.skin;
        let mut layouter = |ui: &Ui, text: &str, wrap_width: f32| {
            let mut job = essay_layout_job(text, &skin);
            job.wrap.max_width = wrap_width;
            ui.fonts(|f| f.layout_job(job))
        };
        let footer = 44.0;
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - footer).max(120.0))
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.result)
                        .desired_width(f32::INFINITY)
                        .desired_rows(16)
                        .layouter(&mut layouter),
                );
            });

        ui.add_space(8.0);
        if ui.add(accent_button("Export as TXT", &self.skin)).clicked() {
            event = ScreenEvent::Notice(self.export(context));
        }
        event
    }
}

impl Themeable for EssayPanel {
    fn apply_theme(&mut self, theme: &Theme) {
        self.skin = Skin::of(theme);
    }
}

/// Styles each line by its kind; the text itself is kept byte-for-byte.
pub fn essay_layout_job(text: &str, skin: &Skin) -> LayoutJob {
    let mut job = LayoutJob::default();
    for line in text.split_inclusive('\n') {
        let body = FontId::proportional(14.0);
        let format = match classify_line(line) {
            LineKind::Header => TextFormat::simple(FontId::proportional(18.0), skin.accent),
            LineKind::Bullet => TextFormat {
                background: skin.palette.bg_secondary,
                ..TextFormat::simple(body, skin.palette.text_primary)
            },
            LineKind::Plain => TextFormat::simple(body, skin.palette.text_primary),
        };
        job.append(line, 0.0, format);
    }
    job
}
