//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::TaskId;

/// Task runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Application id shared by every task of one deployment
    #[serde(rename = "application-id")]
    pub application_id: String,

    /// State storage configuration
    pub state: StateConfig,

    /// Commit cadence configuration
    pub commit: CommitConfig,
}

impl TaskConfig {
    /// Validate configuration before use
    ///
    /// Call this early so a missing application id fails fast instead
    /// of producing a state directory named after nothing.
    pub fn validate(&self) -> Result<()> {
        if self.application_id.is_empty() {
            return Err(eyre::eyre!(
                "application-id must be set; tasks of one deployment share it"
            ));
        }
        if self.commit.interval_ms == 0 {
            return Err(eyre::eyre!("commit interval-ms must be greater than zero"));
        }
        Ok(())
    }

    /// State directory for one task: `<state-dir>/<application-id>/<task-id>`
    pub fn task_state_dir(&self, task: TaskId) -> PathBuf {
        self.state
            .state_dir
            .join(&self.application_id)
            .join(task.to_string())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path)
                .context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .streamtask.yml
        let local_config = PathBuf::from(".streamtask.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/streamtask/streamtask.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("streamtask").join("streamtask.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// State storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Base directory for per-task state stores
    #[serde(rename = "state-dir")]
    pub state_dir: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/streamtask on Linux)
        let state_dir = dirs::data_dir()
            .map(|d| d.join("streamtask"))
            .unwrap_or_else(|| PathBuf::from(".streamtask"));

        Self { state_dir }
    }
}

/// Commit cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Interval between commits in milliseconds
    #[serde(rename = "interval-ms")]
    pub interval_ms: u64,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self { interval_ms: 30_000 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TaskConfig::default();

        assert!(config.application_id.is_empty());
        assert_eq!(config.commit.interval_ms, 30_000);
        assert!(config.state.state_dir.ends_with("streamtask") || config.state.state_dir == PathBuf::from(".streamtask"));
    }

    #[test]
    fn test_validate_requires_application_id() {
        let config = TaskConfig::default();
        assert!(config.validate().is_err());

        let config = TaskConfig {
            application_id: "wordcount".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_commit_interval() {
        let config = TaskConfig {
            application_id: "wordcount".to_string(),
            commit: CommitConfig { interval_ms: 0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
application-id: wordcount

state:
  state-dir: /var/lib/streamtask

commit:
  interval-ms: 5000
"#;

        let config: TaskConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.application_id, "wordcount");
        assert_eq!(config.state.state_dir, PathBuf::from("/var/lib/streamtask"));
        assert_eq!(config.commit.interval_ms, 5000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
application-id: wordcount
"#;

        let config: TaskConfig = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.application_id, "wordcount");

        // Defaults for unspecified
        assert_eq!(config.commit.interval_ms, 30_000);
    }

    #[test]
    fn test_task_state_dir_layout() {
        let config = TaskConfig {
            application_id: "wordcount".to_string(),
            state: StateConfig {
                state_dir: PathBuf::from("/var/lib/streamtask"),
            },
            ..Default::default()
        };

        assert_eq!(
            config.task_state_dir(TaskId::new(1, 2)),
            PathBuf::from("/var/lib/streamtask/wordcount/1_2")
        );
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("streamtask.yml");
        fs::write(&path, "application-id: clickstream\n").unwrap();

        let config = TaskConfig::load(Some(&path)).unwrap();
        assert_eq!(config.application_id, "clickstream");
    }

    #[test]
    fn test_load_explicit_path_missing_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("does-not-exist.yml");

        assert!(TaskConfig::load(Some(&path)).is_err());
    }
}
