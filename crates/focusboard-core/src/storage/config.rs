//! TOML-based application configuration.
//!
//! Holds the externally supplied pieces of the dashboard:
//! - the ordered tip sequence
//! - defaults for new tasks
//! - the focus tick interval
//! - the initial distraction watchlist
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::task::Priority;

/// Defaults applied to newly added tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TasksConfig {
    #[serde(default)]
    pub default_priority: Priority,
    #[serde(default = "default_time_estimate")]
    pub default_time_estimate: u32,
}

/// Focus timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Period between elapsed-time ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Watchlist seeded on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocklistConfig {
    #[serde(default = "default_blocked_sites")]
    pub defaults: Vec<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered tip sequence for the daily tip.
    #[serde(default = "default_tips")]
    pub tips: Vec<String>,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub focus: FocusConfig,
    #[serde(default)]
    pub blocklist: BlocklistConfig,
}

fn default_time_estimate() -> u32 {
    30
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_blocked_sites() -> Vec<String> {
    ["facebook.com", "twitter.com", "reddit.com"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_tips() -> Vec<String> {
    [
        "Use the Pomodoro Technique: Work for 25 minutes, then take a 5-minute break.",
        "Start your day with the most important task (MIT) - your top priority.",
        "Batch similar tasks together to reduce context switching.",
        "Turn off notifications during focus sessions for deep work.",
        "Take regular breaks to maintain high energy and focus levels.",
        "Use the 2-minute rule: If a task takes less than 2 minutes, do it now.",
        "Set specific times to check email instead of constantly monitoring.",
        "Create a distraction-free workspace for focused work.",
        "Use the Eisenhower Matrix to prioritize: Urgent vs Important.",
        "Review and plan your day every morning for 10 minutes.",
        "Track your time to understand where it actually goes.",
        "Single-task instead of multitasking for better quality work.",
        "Set boundaries and learn to say no to non-essential tasks.",
        "Keep your workspace clean and organized to reduce mental clutter.",
        "Use time blocking to allocate specific times for different activities.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            default_priority: Priority::default(),
            default_time_estimate: default_time_estimate(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for BlocklistConfig {
    fn default() -> Self {
        Self {
            defaults: default_blocked_sites(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tips: default_tips(),
            tasks: TasksConfig::default(),
            focus: FocusConfig::default(),
            blocklist: BlocklistConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            return Self::load_from(&path);
        }
        let cfg = Self::default();
        cfg.save_to(&path)?;
        Ok(cfg)
    }

    /// Load from an explicit path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field it targets.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.tips.len(), 15);
        assert_eq!(parsed.tasks.default_priority, Priority::Medium);
        assert_eq!(parsed.blocklist.defaults, cfg.blocklist.defaults);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[focus]\ntick_interval_ms = 250\n").unwrap();
        assert_eq!(parsed.focus.tick_interval_ms, 250);
        assert_eq!(parsed.tasks.default_time_estimate, 30);
        assert_eq!(parsed.tips.len(), 15);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("tasks.default_priority").as_deref(), Some("medium"));
        assert_eq!(cfg.get("focus.tick_interval_ms").as_deref(), Some("1000"));
        assert!(cfg.get("tasks.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("tasks.default_time_estimate", "45").unwrap();
        assert_eq!(cfg.tasks.default_time_estimate, 45);
    }

    #[test]
    fn set_updates_priority_by_name() {
        let mut cfg = Config::default();
        cfg.set("tasks.default_priority", "high").unwrap();
        assert_eq!(cfg.tasks.default_priority, Priority::High);
    }

    #[test]
    fn set_rejects_unknown_priority() {
        let mut cfg = Config::default();
        let err = cfg.set("tasks.default_priority", "urgent").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(cfg.tasks.default_priority, Priority::Medium);
    }

    #[test]
    fn set_replaces_tip_list_from_json() {
        let mut cfg = Config::default();
        cfg.set("tips", r#"["one", "two"]"#).unwrap();
        assert_eq!(cfg.tips, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("focus.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
    }

    #[test]
    fn set_rejects_invalid_number() {
        let mut cfg = Config::default();
        let result = cfg.set("focus.tick_interval_ms", "soon");
        assert!(result.is_err());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("blocklist.defaults", r#"["news.example"]"#).unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.blocklist.defaults, vec!["news.example".to_string()]);
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.focus.tick_interval_ms, 1000);
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "tips = 7 = 8").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
