use super::calculator_screen::CalculatorPanel;
use super::chat_screen::ChatPanel;
use super::dashboard_screen::DashboardPanel;
use super::essay_screen::EssayPanel;
use super::prompt::{draw_notice, Notice};
use super::shell_screen::{LoginEvent, LoginScreen, Sidebar, SidebarEvent};
use super::theme::{apply_to_all, configure_visuals, Theme, Themeable};
use super::theme_screen::ThemePanel;
use super::timer_screen::TimerPanel;
use super::todo_screen::TodoPanel;
use super::worker::{Job, JobOutput, Origin, PanelKind, Worker, WorkerResult};
use crate::config::{load_api_key, AppPaths, SettingsStore, DEFAULT_ACCENT_COLOR};
use crate::core::auth::{verify_login, LOGIN_FAILED};
use crate::core::backend::GenerationBackend;
use crate::core::essay::EssayRequest;
use crate::core::tips::random_tip;
use eframe::egui::{self, Context};
use std::sync::Arc;

pub const THEME_APPLIED: &str = "Theme settings have been applied successfully!";

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything the panels read: where files live, persisted settings, the
/// active theme and the optional API key.
pub struct AppContext {
    pub paths: AppPaths,
    pub settings: SettingsStore,
    pub theme: Theme,
    pub api_key: Option<String>,
}

impl AppContext {
    pub fn load(paths: AppPaths) -> Self {
        let settings = SettingsStore::load(paths.settings_file());
        let theme = Theme::from_settings(settings.get());
        let api_key = load_api_key(&paths.credential_file());
        log::info!(
            "data directory {} ({})",
            paths.data_dir.display(),
            if api_key.is_some() { "online" } else { "offline" }
        );
        Self {
            paths,
            settings,
            theme,
            api_key,
        }
    }
}

// ── Screens ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum ScreenEvent {
    None,
    Notice(Notice),
    GenerateEssay(EssayRequest),
    AskAssistant { prompt: String },
    PreviewTheme { dark_mode: bool },
    ApplyTheme { accent_hex: String, dark_mode: bool },
    ResetTheme,
}

enum Screen {
    Dashboard(DashboardPanel),
    Essay(EssayPanel),
    Chat(ChatPanel),
    Timer(TimerPanel),
    Todo(TodoPanel),
    Theme(ThemePanel),
    Calculator(CalculatorPanel),
}

impl Screen {
    fn build(kind: PanelKind, context: &AppContext) -> Self {
        let theme = &context.theme;
        match kind {
            PanelKind::Dashboard => Screen::Dashboard(DashboardPanel::new(theme)),
            PanelKind::Essay => Screen::Essay(EssayPanel::new(context)),
            PanelKind::Chat => Screen::Chat(ChatPanel::new(theme)),
            PanelKind::Timer => Screen::Timer(TimerPanel::new(theme)),
            PanelKind::Todo => Screen::Todo(TodoPanel::new(context)),
            PanelKind::Theme => Screen::Theme(ThemePanel::new(theme)),
            PanelKind::Calculator => Screen::Calculator(CalculatorPanel::new(theme)),
        }
    }

    fn kind(&self) -> PanelKind {
        match self {
            Screen::Dashboard(_) => PanelKind::Dashboard,
            Screen::Essay(_) => PanelKind::Essay,
            Screen::Chat(_) => PanelKind::Chat,
            Screen::Timer(_) => PanelKind::Timer,
            Screen::Todo(_) => PanelKind::Todo,
            Screen::Theme(_) => PanelKind::Theme,
            Screen::Calculator(_) => PanelKind::Calculator,
        }
    }

    fn themeable(&mut self) -> &mut dyn Themeable {
        match self {
            Screen::Dashboard(p) => p,
            Screen::Essay(p) => p,
            Screen::Chat(p) => p,
            Screen::Timer(p) => p,
            Screen::Todo(p) => p,
            Screen::Theme(p) => p,
            Screen::Calculator(p) => p,
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui, context: &AppContext) -> ScreenEvent {
        match self {
            Screen::Dashboard(p) => p.ui(ui),
            Screen::Essay(p) => p.ui(ui, context),
            Screen::Chat(p) => p.ui(ui),
            Screen::Timer(p) => p.ui(ui),
            Screen::Todo(p) => p.ui(ui),
            Screen::Theme(p) => p.ui(ui),
            Screen::Calculator(p) => p.ui(ui),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct StudyDeskApp {
    context: AppContext,
    /// `Some` until the credential check passes.
    login: Option<LoginScreen>,
    sidebar: Sidebar,
    screen: Screen,
    visit: u64,
    notice: Option<Notice>,
    worker: Worker,
    repaint: Option<Context>,
    visuals_dirty: bool,
}

impl StudyDeskApp {
    pub fn new(context: AppContext, backend: Arc<dyn GenerationBackend>) -> Self {
        let theme = context.theme.clone();
        Self {
            login: Some(LoginScreen::new(&theme)),
            sidebar: Sidebar::new(&theme),
            screen: Screen::build(PanelKind::Dashboard, &context),
            context,
            visit: 0,
            notice: None,
            worker: Worker::new(backend),
            repaint: None,
            visuals_dirty: true,
        }
    }

    /// Discards the current panel and builds `kind` fresh.
    pub fn navigate(&mut self, kind: PanelKind) {
        self.visit += 1;
        self.screen = Screen::build(kind, &self.context);
        log::debug!("navigated to {kind:?} (visit {})", self.visit);
    }

    fn origin(&self) -> Origin {
        Origin {
            panel: self.screen.kind(),
            visit: self.visit,
        }
    }

    fn attempt_login(&mut self) {
        let Some(login) = self.login.as_mut() else {
            return;
        };
        if verify_login(&login.username, &login.password) {
            log::info!("login accepted for '{}'", login.username.trim());
            self.login = None;
            self.navigate(PanelKind::Dashboard);
        } else {
            log::info!("login rejected");
            login.reject();
            self.notice = Some(Notice::error("Login Failed", LOGIN_FAILED));
        }
    }

    fn recolour(&mut self) {
        let theme = self.context.theme.clone();
        let mut targets: Vec<&mut dyn Themeable> = Vec::with_capacity(3);
        targets.push(&mut self.sidebar);
        targets.push(self.screen.themeable());
        if let Some(login) = self.login.as_mut() {
            targets.push(login);
        }
        apply_to_all(&mut targets, &theme);
        self.visuals_dirty = true;
    }

    pub fn handle_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::None => {}
            ScreenEvent::Notice(notice) => self.notice = Some(notice),
            ScreenEvent::GenerateEssay(req) => {
                let words = req.word_count;
                self.context.settings.update(|s| s.last_word_count = words);
                log::info!("generating essay on '{}' ({} words)", req.topic, words);
                self.worker
                    .dispatch(self.origin(), Job::Essay(req), self.repaint.clone());
            }
            ScreenEvent::AskAssistant { prompt } => {
                self.worker
                    .dispatch(self.origin(), Job::Chat { prompt }, self.repaint.clone());
            }
            ScreenEvent::PreviewTheme { dark_mode } => {
                self.context.theme = self.context.theme.with_dark_mode(dark_mode);
                self.recolour();
            }
            ScreenEvent::ApplyTheme {
                accent_hex,
                dark_mode,
            } => {
                self.context.theme = Theme::new(dark_mode, &accent_hex);
                let accent = self.context.theme.accent_hex.clone();
                self.context.settings.update(|s| {
                    s.accent_color = accent;
                    s.dark_mode = dark_mode;
                });
                self.recolour();
                log::info!("theme applied");
                self.notice = Some(Notice::info("Theme Applied", THEME_APPLIED));
            }
            ScreenEvent::ResetTheme => {
                self.context.theme = Theme::new(false, DEFAULT_ACCENT_COLOR);
                self.context.settings.update(|s| {
                    s.accent_color = DEFAULT_ACCENT_COLOR.to_string();
                    s.dark_mode = false;
                });
                self.recolour();
                self.navigate(PanelKind::Dashboard);
            }
        }
    }

    /// Hands a worker result to the panel that asked for it, unless the user
    /// has navigated away since.
    pub fn apply_result(&mut self, result: WorkerResult) {
        if result.origin != self.origin() {
            log::debug!(
                "dropping stale {:?} result from visit {} (now {:?} visit {})",
                result.origin.panel,
                result.origin.visit,
                self.screen.kind(),
                self.visit
            );
            return;
        }
        match (&mut self.screen, result.output) {
            (Screen::Essay(panel), JobOutput::Essay(outcome)) => {
                if let Some(notice) = panel.on_result(outcome) {
                    self.notice = Some(notice);
                }
            }
            (Screen::Chat(panel), JobOutput::Chat(reply)) => panel.on_reply(reply),
            (_, output) => log::debug!("result {output:?} does not fit the current panel"),
        }
    }

    fn handle_sidebar(&mut self, event: SidebarEvent) {
        match event {
            SidebarEvent::None => {}
            SidebarEvent::Navigate(kind) => self.navigate(kind),
            SidebarEvent::Advice => {
                self.notice = Some(Notice::info("Random Advice", random_tip()));
            }
        }
    }
}

impl StudyDeskApp {
    /// One frame of the whole window.
    fn show(&mut self, ctx: &Context) {
        if self.repaint.is_none() {
            self.repaint = Some(ctx.clone());
        }
        if self.visuals_dirty {
            configure_visuals(ctx, &self.context.theme);
            self.visuals_dirty = false;
        }

        for result in self.worker.drain() {
            self.apply_result(result);
        }

        let enabled = self.notice.is_none();
        let notice_was_open = !enabled;
        let palette = self.context.theme.palette;

        if let Some(login) = self.login.as_mut() {
            let event = egui::CentralPanel::default()
                .frame(egui::Frame::none().fill(palette.bg_primary))
                .show(ctx, |ui| ui.add_enabled_ui(enabled, |ui| login.ui(ui)).inner)
                .inner;
            if event == LoginEvent::Submit {
                self.attempt_login();
            }
        } else {
            let active = self.screen.kind();
            let sidebar_event = egui::SidePanel::left("nav_sidebar")
                .resizable(false)
                .exact_width(210.0)
                .frame(
                    egui::Frame::none()
                        .fill(palette.sidebar_bg)
                        .inner_margin(12.0),
                )
                .show(ctx, |ui| {
                    ui.add_enabled_ui(enabled, |ui| self.sidebar.ui(ui, active))
                        .inner
                })
                .inner;
            self.handle_sidebar(sidebar_event);

            let screen_event = egui::CentralPanel::default()
                .frame(
                    egui::Frame::none()
                        .fill(palette.bg_primary)
                        .inner_margin(20.0),
                )
                .show(ctx, |ui| {
                    ui.add_enabled_ui(enabled, |ui| self.screen.ui(ui, &self.context))
                        .inner
                })
                .inner;
            self.handle_event(screen_event);
        }

        if let Some(notice) = &self.notice {
            if draw_notice(ctx, notice, self.sidebar.skin(), notice_was_open) {
                self.notice = None;
            }
        }
    }
}

impl eframe::App for StudyDeskApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::OfflineBackend;
    use crate::core::chat::ChatSender;
    use crate::core::essay::EssayOutcome;
    use crate::native::theme::DARK_PALETTE;

    fn app_in(dir: &std::path::Path) -> StudyDeskApp {
        let context = AppContext::load(AppPaths::new(dir));
        StudyDeskApp::new(context, Arc::new(OfflineBackend))
    }

    fn log_in(app: &mut StudyDeskApp) {
        let login = app.login.as_mut().unwrap();
        login.username = "student".into();
        login.password = "learn123".into();
        app.attempt_login();
    }

    #[test]
    fn wrong_password_keeps_the_gate_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let login = app.login.as_mut().unwrap();
        login.username = "student".into();
        login.password = "nope".into();
        app.attempt_login();

        let login = app.login.as_ref().unwrap();
        assert!(login.password.is_empty());
        assert_eq!(login.username, "student");
        assert_eq!(app.notice.as_ref().unwrap().message, LOGIN_FAILED);

        app.notice = None;
        log_in(&mut app);
        assert!(app.login.is_none());
        assert_eq!(app.screen.kind(), PanelKind::Dashboard);
    }

    fn run_frame(app: &mut StudyDeskApp, ctx: &Context, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1100.0, 760.0),
            )),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| app.show(ctx));
    }

    fn enter_press() -> egui::Event {
        egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn enter_on_wrong_password_leaves_the_error_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let ctx = Context::default();
        let login = app.login.as_mut().unwrap();
        login.reject();
        login.username = "student".into();
        login.password = "nope".into();

        // First frame focuses the password field, second presses Enter in it.
        run_frame(&mut app, &ctx, Vec::new());
        run_frame(&mut app, &ctx, vec![enter_press()]);

        assert!(app.login.is_some());
        assert_eq!(app.notice.as_ref().unwrap().message, LOGIN_FAILED);
        assert!(app.login.as_ref().unwrap().password.is_empty());

        // A later Enter closes it without submitting again.
        run_frame(&mut app, &ctx, vec![enter_press()]);
        assert!(app.notice.is_none());
        assert!(app.login.is_some());
    }

    #[test]
    fn open_notice_closes_on_enter() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        let ctx = Context::default();
        app.notice = Some(Notice::info("Random Advice", "Take breaks"));
        run_frame(&mut app, &ctx, Vec::new());
        assert!(app.notice.is_some());
        run_frame(&mut app, &ctx, vec![enter_press()]);
        assert!(app.notice.is_none());
    }

    #[test]
    fn navigation_rebuilds_panels() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        app.navigate(PanelKind::Todo);
        if let Screen::Todo(panel) = &mut app.screen {
            panel.draft = "half typed".into();
        }
        app.navigate(PanelKind::Calculator);
        app.navigate(PanelKind::Todo);
        match &app.screen {
            Screen::Todo(panel) => assert!(panel.draft.is_empty()),
            _ => panic!("expected the to-do panel"),
        }
    }

    #[test]
    fn stale_results_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        app.navigate(PanelKind::Chat);
        let first_visit = app.origin();

        app.navigate(PanelKind::Essay);
        app.navigate(PanelKind::Chat);
        app.apply_result(WorkerResult {
            origin: first_visit,
            output: JobOutput::Chat(Ok("late reply".into())),
        });
        let Screen::Chat(panel) = &app.screen else {
            panic!("expected the chat panel");
        };
        assert_eq!(panel.transcript.len(), 1);

        let current = app.origin();
        app.apply_result(WorkerResult {
            origin: current,
            output: JobOutput::Chat(Ok("fresh reply".into())),
        });
        let Screen::Chat(panel) = &app.screen else {
            panic!("expected the chat panel");
        };
        assert_eq!(panel.transcript.len(), 2);
        let last = panel.transcript.entries().last().unwrap();
        assert_eq!(last.sender, ChatSender::Assistant);
        assert_eq!(last.message, "fresh reply");
    }

    #[test]
    fn essay_result_lands_and_word_count_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        app.navigate(PanelKind::Essay);
        let event = match &mut app.screen {
            Screen::Essay(panel) => {
                panel.topic = "gravity".into();
                panel.word_count = 320;
                panel.submit()
            }
            _ => panic!("expected the essay panel"),
        };
        assert!(matches!(event, ScreenEvent::GenerateEssay(_)));
        app.handle_event(event);
        assert_eq!(app.context.settings.get().last_word_count, 320);

        let origin = app.origin();
        app.apply_result(WorkerResult {
            origin,
            output: JobOutput::Essay(EssayOutcome {
                text: "TITLE: GRAVITY\n\nbody".into(),
                generated: true,
            }),
        });
        let Screen::Essay(panel) = &app.screen else {
            panic!("expected the essay panel");
        };
        assert_eq!(panel.result, "TITLE: GRAVITY\n\nbody");
        assert!(!panel.generating);
        assert!(app.notice.is_some());

        let reopened = app_in(dir.path());
        assert_eq!(reopened.context.settings.get().last_word_count, 320);
    }

    #[test]
    fn applying_dark_mode_recolours_live_panels_and_keeps_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        app.navigate(PanelKind::Todo);
        if let Screen::Todo(panel) = &mut app.screen {
            panel.draft = "Revise chapter 3".into();
        }

        app.handle_event(ScreenEvent::ApplyTheme {
            accent_hex: "#FF5722".into(),
            dark_mode: true,
        });

        assert_eq!(app.sidebar.skin().palette, DARK_PALETTE);
        let Screen::Todo(panel) = &app.screen else {
            panic!("expected the to-do panel");
        };
        assert_eq!(panel.skin.palette.bg_primary, DARK_PALETTE.bg_primary);
        assert_eq!(panel.skin.palette.text_primary, DARK_PALETTE.text_primary);
        assert_eq!(panel.draft, "Revise chapter 3");
        assert_eq!(app.notice.as_ref().unwrap().message, THEME_APPLIED);
        assert!(app.visuals_dirty);

        let reopened = app_in(dir.path());
        assert!(reopened.context.settings.get().dark_mode);
        assert_eq!(reopened.context.settings.get().accent_color, "#FF5722");
        assert_eq!(reopened.context.theme.palette, DARK_PALETTE);
    }

    #[test]
    fn reset_restores_default_theme_and_returns_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        log_in(&mut app);
        app.handle_event(ScreenEvent::ApplyTheme {
            accent_hex: "#009688".into(),
            dark_mode: true,
        });
        app.navigate(PanelKind::Theme);
        app.handle_event(ScreenEvent::ResetTheme);
        assert_eq!(app.screen.kind(), PanelKind::Dashboard);
        assert!(!app.context.theme.dark_mode);
        assert_eq!(app.context.settings.get().accent_color, DEFAULT_ACCENT_COLOR);
    }
}
