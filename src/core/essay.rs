//! Essay requests, the offline template, post-processing and export.

use crate::core::backend::GenerationBackend;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MIN_WORDS: u32 = 100;
pub const MAX_WORDS: u32 = 500;
pub const GENERATING_PLACEHOLDER: &str = "Generating your essay... Please wait...";
pub const GENERATED_NOTICE: &str = "Essay generated successfully!";
const MAX_TOPIC_IN_FILE_NAME: usize = 20;

#[derive(Debug, Error)]
pub enum EssayError {
    #[error("Please enter a topic!")]
    EmptyTopic,
    #[error("No essay to export!")]
    NothingToExport,
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayRequest {
    pub topic: String,
    pub word_count: u32,
    pub headers: bool,
    pub bullets: bool,
}

impl EssayRequest {
    /// Trims the topic and clamps the word count into range.
    pub fn new(
        topic: &str,
        word_count: u32,
        headers: bool,
        bullets: bool,
    ) -> Result<Self, EssayError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(EssayError::EmptyTopic);
        }
        Ok(Self {
            topic: topic.to_string(),
            word_count: word_count.clamp(MIN_WORDS, MAX_WORDS),
            headers,
            bullets,
        })
    }

    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Write an essay about {} that is approximately {} words long.",
            self.topic, self.word_count
        );
        if self.headers {
            prompt.push_str(
                " Structure it with a clear title at the top, and include section headers like 'Introduction', 'Main Points', and 'Conclusion'.",
            );
        }
        if self.bullets {
            prompt.push_str(" Use bullet points (with • symbols) to list key information and arguments.");
        }
        prompt
    }

    pub fn max_tokens(&self) -> u32 {
        self.word_count * 2
    }
}

// ── Offline template ──────────────────────────────────────────────────────────

const BODY_SECTIONS: [&str; 4] = [
    "Understanding {topic} requires analysis of its key components. Researchers have identified several factors that contribute to this subject.",
    "The history of {topic} provides valuable context. Over time, significant developments have shaped our understanding of this area.",
    "When considering the practical applications of {topic}, we can identify numerous examples across different domains.",
    "Recent advances related to {topic} have opened new possibilities for research and development in this field.",
];
const BODY_SECTIONS_USED: usize = 3;

pub fn offline_essay(req: &EssayRequest) -> String {
    let topic = req.topic.as_str();
    let mut parts: Vec<String> = Vec::new();

    if req.headers {
        parts.push("# Introduction".to_string());
    }
    parts.push(format!(
        "Introduction to {topic}\n\nAn essay exploring the various aspects of {topic}. This topic is interesting for several reasons and merits thorough examination."
    ));

    for (i, section) in BODY_SECTIONS.iter().take(BODY_SECTIONS_USED).enumerate() {
        if req.headers {
            parts.push(format!("\n# Section {}", i + 1));
        }
        parts.push(section.replace("{topic}", topic));
        if req.bullets {
            parts.push("\nKey points:".to_string());
            for j in 1..=3 {
                parts.push(format!(
                    "• Important aspect {j} related to this section of {topic}"
                ));
            }
        }
    }

    if req.headers {
        parts.push("\n# Conclusion".to_string());
    }
    parts.push(format!(
        "In conclusion, {topic} represents an important area of study with numerous implications. Further research and practical applications will continue to enhance our understanding."
    ));

    parts.join("\n\n")
}

// ── Post-processing ───────────────────────────────────────────────────────────

pub fn post_process(text: &str, req: &EssayRequest) -> String {
    let mut out = text.to_string();

    if req.headers && !out.contains("TITLE:") && !out.contains("Title:") {
        out = format!("TITLE: {}\n\n{out}", req.topic.to_uppercase());
    }

    if req.bullets && !out.contains('-') && !out.contains('•') {
        out = out
            .lines()
            .map(|line| {
                let lower = line.to_lowercase();
                if lower.contains("key point") || lower.contains("important") {
                    format!("• {line}")
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
    }

    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Bullet,
    Plain,
}

pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.starts_with('#') || is_shouting(trimmed) {
        LineKind::Header
    } else if trimmed.starts_with(['•', '-', '*']) {
        LineKind::Bullet
    } else {
        LineKind::Plain
    }
}

/// All cased characters upper-case, at least one of them, longer than 3 chars.
fn is_shouting(line: &str) -> bool {
    line.chars().count() > 3
        && line.chars().any(char::is_alphabetic)
        && !line.chars().any(char::is_lowercase)
}

pub fn fallback_essay(topic: &str, err: &str) -> String {
    [
        format!("Error: {err}\n\n"),
        "Offline mode: Here's a sample essay structure instead:\n\n".to_string(),
        format!("# Introduction to {topic}\n\n"),
        "• Key point 1\n• Key point 2\n• Key point 3\n\n".to_string(),
        "# Main Arguments\n\n".to_string(),
        "Write your main arguments here...\n\n".to_string(),
        "# Conclusion\n\n".to_string(),
        "Write your conclusion here...\n".to_string(),
    ]
    .concat()
}

// ── Generation ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayOutcome {
    pub text: String,
    /// `false` when the text is the error fallback block.
    pub generated: bool,
}

/// Runs on a worker thread. Never fails: backend errors become the fallback
/// block.
pub fn generate(req: &EssayRequest, backend: &dyn GenerationBackend) -> EssayOutcome {
    let raw = if backend.is_configured() {
        backend.generate(&req.prompt(), req.max_tokens())
    } else {
        log::info!("essay '{}' assembled from offline template", req.topic);
        Ok(offline_essay(req))
    };
    match raw {
        Ok(text) => EssayOutcome {
            text: post_process(text.trim(), req),
            generated: true,
        },
        Err(err) => {
            log::warn!("essay generation failed: {err}");
            EssayOutcome {
                text: fallback_essay(&req.topic, &err.to_string()),
                generated: false,
            }
        }
    }
}

// ── Export ────────────────────────────────────────────────────────────────────

/// Spaces become `_`; anything not alphanumeric, `_` or `-` is dropped.
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .take(MAX_TOPIC_IN_FILE_NAME)
        .collect()
}

pub fn export_file_name(topic: &str, now: &DateTime<Local>) -> String {
    format!(
        "essay_{}_{}.txt",
        sanitize_topic(topic),
        now.format("%Y%m%d_%H%M%S")
    )
}

pub fn export_essay(
    dir: &Path,
    topic: &str,
    text: &str,
    now: &DateTime<Local>,
) -> Result<PathBuf, EssayError> {
    if text.trim().is_empty() || text.trim() == GENERATING_PLACEHOLDER {
        return Err(EssayError::NothingToExport);
    }
    let path = dir.join(export_file_name(topic, now));
    std::fs::write(&path, text).map_err(|source| EssayError::Write {
        path: path.clone(),
        source,
    })?;
    log::info!("essay exported to {}", path.display());
    Ok(path)
}
