//! JSON document storage for the task collection

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::types::Task;

const DATA_FILE_ENV: &str = "TASKMUX_DATA_FILE";

#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Clone)]
pub struct JsonTaskStore {
    path: PathBuf,
}

impl JsonTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(default_store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("invalid task store path '{}'", self.path.display()))?;
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create data directory '{}'", parent.display()))
    }

    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read task store '{}'", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: TaskDocument = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse task store '{}'", self.path.display()))?;
        Ok(document.tasks)
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.init()?;

        let document = TaskDocument {
            tasks: tasks.to_vec(),
        };
        let contents =
            serde_json::to_string_pretty(&document).context("failed to serialize tasks")?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| anyhow!("invalid task store file name"))?
            .to_string_lossy()
            .to_string();
        let tmp_path = self.path.with_file_name(format!(".{file_name}.tmp"));

        fs::write(&tmp_path, contents).with_context(|| {
            format!(
                "failed to write temporary task store '{}'",
                tmp_path.display()
            )
        })?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to atomically rename task store '{}' to '{}'",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

pub fn default_store_path() -> Result<PathBuf> {
    if let Ok(raw) = std::env::var(DATA_FILE_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let mut path = dirs::config_dir().ok_or_else(|| anyhow!("unable to determine config path"))?;
    path.push("taskmux");
    path.push("tasks.json");
    Ok(path)
}
