//! TOML configuration. Every field has a default so a missing or partial
//! file still yields a usable configuration.

use anyhow::{Context, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub user: UserConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub mindfulness: MindfulnessConfig,
    #[serde(default)]
    pub referral: ReferralConfig,
    #[serde(default)]
    pub onboarding: OnboardingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    /// Local identity. Generated and saved back on first run.
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationType {
    pub id: String,
    pub label: String,
}

impl MeditationType {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindfulnessConfig {
    #[serde(default = "default_duration")]
    pub default_duration: u32,
    #[serde(default = "default_weekly_goal")]
    pub weekly_goal: u32,
    #[serde(default = "default_duration_options")]
    pub duration_options: Vec<u32>,
    #[serde(default = "default_meditation_types")]
    pub meditation_types: Vec<MeditationType>,
}

impl Default for MindfulnessConfig {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            weekly_goal: default_weekly_goal(),
            duration_options: default_duration_options(),
            meditation_types: default_meditation_types(),
        }
    }
}

fn default_duration() -> u32 {
    10
}

fn default_weekly_goal() -> u32 {
    105
}

fn default_duration_options() -> Vec<u32> {
    vec![5, 10, 15, 20, 30]
}

fn default_meditation_types() -> Vec<MeditationType> {
    vec![
        MeditationType::new("breathing", "Breathing"),
        MeditationType::new("body-scan", "Body Scan"),
        MeditationType::new("guided", "Guided Meditation"),
        MeditationType::new("walking", "Walking Meditation"),
        MeditationType::new("gratitude", "Gratitude Practice"),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Program (and arguments) that receives the share message on stdin.
    /// Without one, sharing falls back to the clipboard.
    #[serde(default)]
    pub share_command: Vec<String>,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            share_command: Vec::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://healthtracker.app".into()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingConfig {
    #[serde(default)]
    pub questions_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .unwrap_or_else(crate::db::get_db_path)
    }

    pub fn log_path(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| crate::db::get_data_dir().join("health-tracker.log"))
    }

    /// Fills in a user id when none is configured. Returns whether one was
    /// generated.
    pub fn ensure_user_id(&mut self) -> bool {
        if !self.user.id.trim().is_empty() {
            return false;
        }
        self.user.id = generate_user_id();
        true
    }
}

pub fn generate_user_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("user-{}", suffix.to_lowercase())
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("health-tracker")
        .join("config.toml")
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: AppConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load_config(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.mindfulness.default_duration, 10);
        assert_eq!(config.mindfulness.weekly_goal, 105);
        assert_eq!(config.mindfulness.duration_options, vec![5, 10, 15, 20, 30]);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[mindfulness]\nweekly_goal = 70\n\n[referral]\nbase_url = \"https://example.test\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.mindfulness.weekly_goal, 70);
        assert_eq!(config.mindfulness.default_duration, 10);
        assert_eq!(config.referral.base_url, "https://example.test");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        assert!(config.ensure_user_id());
        assert!(!config.ensure_user_id());

        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.user.id, config.user.id);
        assert!(loaded.user.id.starts_with("user-"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[mindfulness\nweekly_goal = ").unwrap();
        assert!(load_config(&path).is_err());
    }
}
