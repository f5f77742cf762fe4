use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MIN_POLL_INTERVAL_MS: u64 = 250;
const MAX_POLL_INTERVAL_MS: u64 = 30_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const MIN_CAPTURE_LINES: usize = 10;
const MAX_CAPTURE_LINES: usize = 5_000;
const DEFAULT_CAPTURE_LINES: usize = 50;
const MIN_STATUS_TIMEOUT_MS: u64 = 500;
const MAX_STATUS_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_STATUS_TIMEOUT_MS: u64 = 3_000;
const DEFAULT_ASSISTANT_COMMAND: &str = "gemini";
const DEFAULT_PROMPT_FLAG: &str = "-i";
const DEFAULT_YOLO_FLAG: &str = "--yolo";
const DEFAULT_DETACH_KEY: &str = "C-q";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub poll_interval_ms: u64,
    pub capture_lines: usize,
    pub status_timeout_ms: u64,
    pub assistant_command: String,
    pub prompt_flag: String,
    pub yolo_flag: String,
    pub detach_key: String,
    pub keybindings: HashMap<String, Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            capture_lines: DEFAULT_CAPTURE_LINES,
            status_timeout_ms: DEFAULT_STATUS_TIMEOUT_MS,
            assistant_command: DEFAULT_ASSISTANT_COMMAND.to_string(),
            prompt_flag: DEFAULT_PROMPT_FLAG.to_string(),
            yolo_flag: DEFAULT_YOLO_FLAG.to_string(),
            detach_key: DEFAULT_DETACH_KEY.to_string(),
            keybindings: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("taskmux");
        path.push("settings.toml");
        Some(path)
    }

    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        Self::load_from_path(&path)
    }

    fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(mut settings) => {
                    settings.validate();
                    settings
                }
                Err(error) => {
                    warn!(
                        "failed to parse settings config '{}': {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                warn!(
                    "failed to read settings config '{}': {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| anyhow!("unable to determine config path"))?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    fn save_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("invalid settings config path"))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory '{}'", parent.display()))?;

        let mut validated = self.clone();
        validated.validate();
        let contents =
            toml::to_string_pretty(&validated).context("failed to serialize settings to TOML")?;

        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("invalid settings config file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary settings file '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "failed to atomically rename settings file '{}' to '{}'",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }

    /// Binary that must be on PATH for sessions to start.
    pub fn assistant_binary(&self) -> &str {
        self.assistant_command
            .split_whitespace()
            .next()
            .unwrap_or(DEFAULT_ASSISTANT_COMMAND)
    }

    fn validate(&mut self) {
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.capture_lines = self
            .capture_lines
            .clamp(MIN_CAPTURE_LINES, MAX_CAPTURE_LINES);
        self.status_timeout_ms = self
            .status_timeout_ms
            .clamp(MIN_STATUS_TIMEOUT_MS, MAX_STATUS_TIMEOUT_MS);

        if self.assistant_command.trim().is_empty() {
            warn!(
                "empty assistant_command in settings config; falling back to {}",
                DEFAULT_ASSISTANT_COMMAND
            );
            self.assistant_command = DEFAULT_ASSISTANT_COMMAND.to_string();
        }

        if self.detach_key.trim().is_empty() {
            warn!(
                "empty detach_key in settings config; falling back to {}",
                DEFAULT_DETACH_KEY
            );
            self.detach_key = DEFAULT_DETACH_KEY.to_string();
        }
        self.detach_key = self.detach_key.trim().to_string();
    }
}
