use chrono::{DateTime, Local};
use rand::seq::SliceRandom;

pub const STUDY_TIPS: [&str; 10] = [
    "Break large study tasks into smaller, manageable chunks.",
    "Use active recall instead of passive re-reading.",
    "Teach what you've learned to someone else to reinforce your knowledge.",
    "Take short breaks every 25-30 minutes of focused study.",
    "Create mind maps to visualize connections between concepts.",
    "Study in different locations to improve retention.",
    "Review material before sleep to enhance memory consolidation.",
    "Use spaced repetition to review content at optimal intervals.",
    "Stay hydrated and maintain healthy snacks during study sessions.",
    "Set specific goals for each study session.",
];

pub const QUICK_IDEAS: [&str; 4] = [
    "Create study flashcards for upcoming test",
    "Research topic for next essay",
    "Organize notes from today's lecture",
    "Review chapter summaries",
];

pub const DAILY_PROGRESS: f32 = 0.5;

pub const HELP_TEXT: &str = "StudyDesk helps you study more effectively.\n\n\
Features:\n\
• Essay Generator: draft an essay on any topic, with optional headers and bullet points\n\
• AI Assistant: ask homework questions; simple arithmetic is answered locally\n\
• Study Timer: alternate focused work sessions with short breaks\n\
• To-Do List: keep track of study tasks between sessions\n\
• Calculator: evaluate arithmetic expressions\n\
• Theme Settings: switch dark mode and choose an accent colour\n\n\
Default login: student / learn123";

pub fn random_tip() -> &'static str {
    STUDY_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(STUDY_TIPS[0])
}

pub fn random_idea() -> &'static str {
    QUICK_IDEAS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUICK_IDEAS[0])
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// e.g. `Monday, October 19, 2026`.
pub fn today_line(now: &DateTime<Local>) -> String {
    now.format("%A, %B %d, %Y").to_string()
}
