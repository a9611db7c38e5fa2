//! Chat transcript and message routing.
//!
//! Arithmetic questions are answered locally; everything else becomes a
//! prompt for the generation backend.

use crate::core::expr::evaluate_to_string;
use chrono::{DateTime, Local};
use std::time::Duration;

pub const CHAT_MAX_TOKENS: u32 = 300;
pub const MATH_REPLY_DELAY: Duration = Duration::from_millis(500);
pub const WELCOME: &str =
    "Hello! I'm your AI assistant. How can I help you with your studies today?";

const MATH_OPERATORS: &[char] = &['+', '-', '*', '/', '^'];
const MATH_CHARS: &[char] = &['+', '-', '*', '/', '^', '(', ')', '.'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Assistant,
    System,
}

impl ChatSender {
    pub fn label(self) -> &'static str {
        match self {
            ChatSender::User => "You",
            ChatSender::Assistant => "AI Assistant",
            ChatSender::System => "System",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatEntry {
    pub sender: ChatSender,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl ChatEntry {
    pub fn new(sender: ChatSender, message: impl Into<String>) -> Self {
        Self {
            sender,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// `HH:MM Sender:`
    pub fn header(&self) -> String {
        format!("{} {}:", self.timestamp.format("%H:%M"), self.sender.label())
    }
}

/// Append-only, in-memory.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
}

impl Transcript {
    pub fn with_welcome() -> Self {
        let mut t = Self::default();
        t.push(ChatSender::Assistant, WELCOME);
        t
    }

    pub fn push(&mut self, sender: ChatSender, message: impl Into<String>) {
        self.entries.push(ChatEntry::new(sender, message));
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatRoute {
    /// Local answer, posted after [`MATH_REPLY_DELAY`].
    Math(String),
    /// Prompt for the generation backend.
    Backend(String),
}

/// Lowercased with spaces removed, the message holds an operator and more
/// than half of its characters are digits or arithmetic symbols.
pub fn is_math_question(message: &str) -> bool {
    let compact: String = message
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ')
        .collect();
    if !compact.contains(MATH_OPERATORS) {
        return false;
    }
    let total = compact.chars().count();
    let mathy = compact
        .chars()
        .filter(|c| c.is_ascii_digit() || MATH_CHARS.contains(c))
        .count();
    mathy * 2 > total
}

/// Keeps digits, operators, parentheses, `.` and spaces.
pub fn sanitize_math(message: &str) -> String {
    message
        .chars()
        .filter(|c| c.is_ascii_digit() || MATH_CHARS.contains(c) || *c == ' ')
        .collect()
}

pub fn answer_math(message: &str) -> Option<String> {
    match evaluate_to_string(&sanitize_math(message)) {
        Ok(value) => Some(format!("The answer is {value}")),
        Err(err) => {
            log::debug!("math heuristic matched but evaluation failed: {err}");
            None
        }
    }
}

pub fn build_prompt(message: &str) -> String {
    format!("You are a helpful educational AI assistant. User: {message}\nAI Assistant:")
}

/// `None` for blank input.
pub fn route_message(message: &str) -> Option<ChatRoute> {
    let message = message.trim();
    if message.is_empty() {
        return None;
    }
    if is_math_question(message) {
        if let Some(answer) = answer_math(message) {
            return Some(ChatRoute::Math(answer));
        }
    }
    Some(ChatRoute::Backend(build_prompt(message)))
}

pub fn backend_error_message(err: &str) -> String {
    format!("API Error: {err}\nPlease check your internet connection and API key")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_detected_and_answered() {
        assert!(is_math_question("12 + 7 * 3"));
        assert_eq!(
            route_message("12 + 7 * 3"),
            Some(ChatRoute::Math("The answer is 33".into()))
        );
        assert_eq!(answer_math("(2 + 3) ^ 2").as_deref(), Some("The answer is 25"));
    }

    #[test]
    fn prose_goes_to_the_backend() {
        assert!(!is_math_question("What is photosynthesis?"));
        assert!(!is_math_question("what is 2+2 in binary, explain"));
        assert_eq!(
            route_message("What is photosynthesis?"),
            Some(ChatRoute::Backend(
                "You are a helpful educational AI assistant. User: What is photosynthesis?\nAI Assistant:"
                    .into()
            ))
        );
    }

    #[test]
    fn numbers_without_operators_are_not_math() {
        assert!(!is_math_question("2024"));
        assert!(!is_math_question(""));
    }

    #[test]
    fn failed_evaluation_falls_through_to_backend() {
        assert!(is_math_question("5/0"));
        assert!(matches!(route_message("5/0"), Some(ChatRoute::Backend(_))));
    }

    #[test]
    fn blank_messages_are_ignored() {
        assert_eq!(route_message("   "), None);
    }

    #[test]
    fn transcript_starts_with_welcome_and_formats_headers() {
        let mut t = Transcript::with_welcome();
        assert_eq!(t.len(), 1);
        assert_eq!(t.entries()[0].sender, ChatSender::Assistant);
        assert_eq!(t.entries()[0].message, WELCOME);

        t.push(ChatSender::System, backend_error_message("timeout"));
        let entry = &t.entries()[1];
        assert!(entry.header().ends_with(" System:"));
        assert_eq!(entry.header().len(), "HH:MM System:".len());
        assert_eq!(
            entry.message,
            "API Error: timeout\nPlease check your internet connection and API key"
        );
    }
}
