//! Interpreter configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How imported file modules are reused across `import` statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Execute each module once; later imports share its export table.
    #[default]
    Reuse,
    /// Re-read the file on every import and re-execute it only when its
    /// content digest changed.
    Revalidate,
    /// Execute the module on every import.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Directory the entry program's relative imports resolve against.
    pub base_dir: PathBuf,
    pub module_cache: CachePolicy,
    /// Display name of the entry source in diagnostics.
    pub file_name: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            module_cache: CachePolicy::default(),
            file_name: "<main>".to_string(),
        }
    }
}

impl InterpreterConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&read_config(path)?)
    }

    /// Configuration for running the script at `script`: imports resolve
    /// next to it and diagnostics carry its path.
    pub fn for_script(script: &Path) -> Self {
        let base_dir = match script.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            base_dir,
            file_name: script.display().to_string(),
            ..Self::default()
        }
    }
}

/// A config file layered over a base configuration: only the keys it
/// spells out replace the base values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigOverlay {
    pub base_dir: Option<PathBuf>,
    pub module_cache: Option<CachePolicy>,
    pub file_name: Option<String>,
}

impl ConfigOverlay {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&read_config(path)?)
    }

    pub fn apply(self, config: &mut InterpreterConfig) {
        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(policy) = self.module_cache {
            config.module_cache = policy;
        }
        if let Some(file_name) = self.file_name {
            config.file_name = file_name;
        }
    }
}

fn read_config(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}
