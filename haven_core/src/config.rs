//! Configuration file support for Haven.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/haven/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub matcher: MatcherConfig,

    #[serde(default)]
    pub journal: JournalConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub reminders: ReminderConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Live-suggestion policy for text being typed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Drafts of this many UTF-16 units or fewer get no suggestions
    #[serde(default = "default_suggest_after_chars")]
    pub suggest_after_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            suggest_after_chars: default_suggest_after_chars(),
        }
    }
}

/// Limits applied when recording journal data
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_notes_max_chars")]
    pub notes_max_chars: usize,

    /// Stored conversation messages kept, oldest dropped first
    #[serde(default = "default_conversation_limit")]
    pub conversation_limit: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            notes_max_chars: default_notes_max_chars(),
            conversation_limit: default_conversation_limit(),
        }
    }
}

/// Chat-completion request parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    /// Chat-completions URL requests are posted to
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Prior messages sent along with each request
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,

    #[serde(default = "default_rate_window_secs")]
    pub rate_window_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            history_window: default_history_window(),
            rate_limit: default_rate_limit(),
            rate_window_secs: default_rate_window_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Recurring reminder timing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "default_mood_hour")]
    pub mood_hour: u32,

    #[serde(default)]
    pub mood_minute: u32,

    #[serde(default = "default_breathing_interval_secs")]
    pub breathing_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            mood_hour: default_mood_hour(),
            mood_minute: 0,
            breathing_interval_secs: default_breathing_interval_secs(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("haven")
}

fn default_suggest_after_chars() -> usize {
    10
}

fn default_notes_max_chars() -> usize {
    crate::validation::DEFAULT_TEXT_LIMIT
}

fn default_conversation_limit() -> usize {
    50
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".into()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".into()
}

fn default_max_tokens() -> u32 {
    200
}

fn default_temperature() -> f32 {
    0.7
}

fn default_history_window() -> usize {
    6
}

fn default_rate_limit() -> usize {
    10
}

fn default_rate_window_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_mood_hour() -> u32 {
    20
}

fn default_breathing_interval_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("haven").join("config.toml")
    }

    /// Reject values that would make reminders or chat requests nonsensical
    pub fn validate(&self) -> Result<()> {
        if self.reminders.mood_hour > 23 || self.reminders.mood_minute > 59 {
            return Err(Error::Config(format!(
                "mood reminder time {:02}:{:02} is not a valid time of day",
                self.reminders.mood_hour, self.reminders.mood_minute
            )));
        }
        if self.reminders.breathing_interval_secs == 0 {
            return Err(Error::Config("breathing_interval_secs must be positive".into()));
        }
        if self.chat.rate_limit == 0 || self.chat.rate_window_secs == 0 {
            return Err(Error::Config("chat rate limit and window must be positive".into()));
        }
        if !(0.0..=2.0).contains(&self.chat.temperature) {
            return Err(Error::Config(format!(
                "chat temperature {} outside 0.0-2.0",
                self.chat.temperature
            )));
        }
        if self.journal.conversation_limit < 2 {
            return Err(Error::Config(
                "conversation_limit must hold at least one exchange".into(),
            ));
        }
        if self.journal.notes_max_chars == 0 {
            return Err(Error::Config("notes_max_chars must be positive".into()));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
