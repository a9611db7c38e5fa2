use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

// ── Paths ─────────────────────────────────────────────────────────────────────

pub const SETTINGS_FILE: &str = "settings.json";
pub const CREDENTIAL_FILE: &str = "config.json";
pub const TODO_FILE: &str = "todo_list.json";
pub const API_KEY_ENV: &str = "COHERE_API_KEY";

/// Where every file the app reads or writes lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
}

impl AppPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The working directory, or `.` when it cannot be resolved.
    pub fn from_cwd() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn credential_file(&self) -> PathBuf {
        self.data_dir.join(CREDENTIAL_FILE)
    }

    pub fn todo_file(&self) -> PathBuf {
        self.data_dir.join(TODO_FILE)
    }

    pub fn export_dir(&self) -> &Path {
        &self.data_dir
    }
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

/// Reads `path` as JSON. A missing file is `Ok(None)`; unreadable or malformed
/// content is an error.
pub fn try_load_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(value))
}

/// Like [`try_load_json`], but falls back to `T::default()` and logs the reason.
pub fn load_json<T: for<'de> Deserialize<'de> + Default>(path: &Path) -> T {
    match try_load_json(path) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(err) => {
            log::warn!("{err:#}; using defaults");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ── Settings ──────────────────────────────────────────────────────────────────

pub const DEFAULT_ACCENT_COLOR: &str = "#2A7FFF";
pub const DEFAULT_WORD_COUNT: u32 = 250;

fn default_accent_color() -> String {
    DEFAULT_ACCENT_COLOR.to_string()
}

const fn default_last_word_count() -> u32 {
    DEFAULT_WORD_COUNT
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_last_word_count")]
    pub last_word_count: u32,
    /// Keys written by other versions are carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            dark_mode: false,
            last_word_count: DEFAULT_WORD_COUNT,
            extra: Map::new(),
        }
    }
}

/// Owns the settings document and the file it is mirrored to.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads the settings file, backfilling missing keys, and writes the
    /// complete document back so the file always carries every default.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings: Settings = load_json(&path);
        let store = Self { path, settings };
        if let Err(err) = store.save() {
            log::warn!("could not write settings: {err:#}");
        }
        store
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.settings)
    }

    /// Applies `f` and rewrites the whole file. Write failures are logged.
    pub fn update<F: FnOnce(&mut Settings)>(&mut self, f: F) {
        f(&mut self.settings);
        if let Err(err) = self.save() {
            log::warn!("could not write settings: {err:#}");
        }
    }
}

// ── Credential ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialConfig {
    #[serde(default)]
    pub cohere_api_key: Option<String>,
}

/// Resolves the API key: a non-empty environment override wins, then the
/// credential file. Anything unreadable just means "offline".
pub fn load_api_key(path: &Path) -> Option<String> {
    let from_env = std::env::var(API_KEY_ENV).ok();
    resolve_api_key(from_env, path)
}

fn resolve_api_key(from_env: Option<String>, path: &Path) -> Option<String> {
    if let Some(key) = from_env.map(|k| k.trim().to_string()) {
        if !key.is_empty() {
            return Some(key);
        }
    }
    let config: CredentialConfig = load_json(path);
    config
        .cohere_api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
