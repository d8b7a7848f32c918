//! TOML-based application configuration.
//!
//! Stores:
//! - Scheduling preferences (work hours, slot duration, work days, rest cadence)
//! - GitHub repository coordinates
//! - Notes API coordinates (vault REST endpoint)
//! - Calendar API coordinates
//! - LLM endpoint settings
//!
//! Configuration is stored at `~/.config/slotplan/config.toml`.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::scheduler::SlotPlannerConfig;

/// Scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    #[serde(default = "default_work_start")]
    pub work_start: String,
    #[serde(default = "default_work_end")]
    pub work_end: String,
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// Two-letter day codes, `MO` through `SU`. Empty means every day.
    #[serde(default)]
    pub work_days: Vec<String>,
    #[serde(default = "default_rest_days")]
    pub rest_days_per_week: u32,
}

/// GitHub repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
}

/// Notes vault REST API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesConfig {
    #[serde(default = "default_notes_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub vault: String,
    #[serde(default = "default_projects_root")]
    pub projects_root: String,
}

/// Calendar API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_calendar_api_base")]
    pub api_base: String,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
}

/// LLM completion endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_api_base")]
    pub api_base: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/slotplan/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

// Default functions
fn default_work_start() -> String {
    "09:00".into()
}
fn default_work_end() -> String {
    "18:00".into()
}
fn default_slot_minutes() -> u32 {
    45
}
fn default_rest_days() -> u32 {
    1
}
fn default_notes_api_base() -> String {
    "https://127.0.0.1:27124".into()
}
fn default_projects_root() -> String {
    "Projects".into()
}
fn default_calendar_api_base() -> String {
    "https://www.googleapis.com/calendar/v3".into()
}
fn default_calendar_id() -> String {
    "primary".into()
}
fn default_llm_api_base() -> String {
    "https://api.openai.com/v1".into()
}
fn default_llm_model() -> String {
    "gpt-4.1-mini".into()
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            work_start: default_work_start(),
            work_end: default_work_end(),
            slot_minutes: default_slot_minutes(),
            work_days: Vec::new(),
            rest_days_per_week: default_rest_days(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            api_base: default_notes_api_base(),
            vault: String::new(),
            projects_root: default_projects_root(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: default_calendar_api_base(),
            calendar_id: default_calendar_id(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_llm_api_base(),
            model: default_llm_model(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduling: SchedulingConfig::default(),
            github: GithubConfig::default(),
            notes: NotesConfig::default(),
            calendar: CalendarConfig::default(),
            llm: LlmConfig::default(),
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
        let unknown = || ConfigError::MissingKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::MissingKey(String::new()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let parse_err = |message: String| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message,
                };
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| parse_err(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| {
                                    parse_err(format!("cannot parse '{value}' as number"))
                                })?
                        } else {
                            return Err(parse_err(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| parse_err(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Resolve the config file path, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined or created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::ParseFailed("no config directory".to_string()))?
            .join("slotplan");
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
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

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        self.save()?;
        Ok(())
    }

    /// Parse the configured work-day codes into weekdays.
    /// An empty list means no restriction (`None`).
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown day code.
    pub fn work_days(&self) -> Result<Option<Vec<Weekday>>, ConfigError> {
        if self.scheduling.work_days.is_empty() {
            return Ok(None);
        }

        self.scheduling
            .work_days
            .iter()
            .map(|code| parse_day_code(code))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// Build a validated-input planner configuration starting at `start_date`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown work-day code; work-hour strings are
    /// validated later by the planner itself.
    pub fn planner_config(
        &self,
        start_date: DateTime<Utc>,
    ) -> Result<SlotPlannerConfig, ConfigError> {
        Ok(SlotPlannerConfig {
            start_date,
            work_start: self.scheduling.work_start.clone(),
            work_end: self.scheduling.work_end.clone(),
            slot_minutes: self.scheduling.slot_minutes,
            work_days: self.work_days()?,
            rest_days_per_week: self.scheduling.rest_days_per_week,
        })
    }
}

/// Map a two-letter day code (`MO`..`SU`, case-insensitive) to a weekday.
pub fn parse_day_code(code: &str) -> Result<Weekday, ConfigError> {
    match code.to_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        other => Err(ConfigError::InvalidValue {
            key: "scheduling.work_days".to_string(),
            message: format!("unknown day code '{other}'"),
        }),
    }
}
