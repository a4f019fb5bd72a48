//! Configuration management for image-upload-bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default Chevereto-compatible upload endpoint
pub const DEFAULT_IMAGE_HOST_ENDPOINT: &str = "https://freeimage.host/api/1/upload";

/// Source for environment variables, so config loading can be tested
/// without touching the process environment.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete bot configuration.
///
/// Built once at startup and passed down explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramBotConfig,
    pub image_host: ImageHostConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Telegram credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramBotConfig {
    /// Bot token from BotFather
    #[serde(default)]
    pub bot_token: String,
    /// MTProto application id. Recognized for compatibility; the Bot API
    /// transport does not need it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_id: Option<i32>,
    /// MTProto application hash, see `api_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_hash: Option<String>,
}

/// Image hosting service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHostConfig {
    /// API key for the hosting service
    #[serde(default)]
    pub api_key: String,
    /// Upload endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Local handling of downloaded attachments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for the per-event temporary copies
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env<E: ReadEnv>(env: &E) -> Result<Self> {
        let bot_token = env.var("BOT_TOKEN").context("BOT_TOKEN not set")?;
        let api_key = env.var("API_KEY").context("API_KEY not set")?;

        let api_id = read_api_id(env)?;

        let api_hash = env.var("API_HASH").filter(|v| !v.is_empty());

        let endpoint = env
            .var("IMAGE_HOST_ENDPOINT")
            .unwrap_or_else(default_endpoint);

        let timeout_secs = env
            .var("IMAGE_HOST_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_secs);

        let temp_dir = env
            .var("UPLOAD_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_temp_dir);

        Ok(Config {
            telegram: TelegramBotConfig {
                bot_token,
                api_id,
                api_hash,
            },
            image_host: ImageHostConfig {
                api_key,
                endpoint,
                timeout_secs,
            },
            upload: UploadConfig { temp_dir },
        })
    }

    /// Override file values with whatever the environment sets
    pub fn apply_env<E: ReadEnv>(&mut self, env: &E) -> Result<()> {
        if let Some(bot_token) = env.var("BOT_TOKEN") {
            self.telegram.bot_token = bot_token;
        }
        if let Some(api_id) = read_api_id(env)? {
            self.telegram.api_id = Some(api_id);
        }
        if let Some(api_hash) = env.var("API_HASH").filter(|v| !v.is_empty()) {
            self.telegram.api_hash = Some(api_hash);
        }
        if let Some(api_key) = env.var("API_KEY") {
            self.image_host.api_key = api_key;
        }
        if let Some(endpoint) = env.var("IMAGE_HOST_ENDPOINT") {
            self.image_host.endpoint = endpoint;
        }
        if let Some(timeout_secs) = env.var("IMAGE_HOST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.image_host.timeout_secs = timeout_secs;
        }
        if let Some(temp_dir) = env.var("UPLOAD_TEMP_DIR") {
            self.upload.temp_dir = PathBuf::from(temp_dir);
        }
        Ok(())
    }

    /// Reject configurations the bot cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            bail!("bot token is empty");
        }
        if self.image_host.api_key.trim().is_empty() {
            bail!("image host API key is empty");
        }
        if self.image_host.timeout_secs == 0 {
            bail!("image host timeout must be greater than zero");
        }
        url::Url::parse(&self.image_host.endpoint)
            .with_context(|| format!("Invalid image host endpoint: {}", self.image_host.endpoint))?;
        Ok(())
    }
}

/// `API_ID` is optional, but must be an integer when set
fn read_api_id<E: ReadEnv>(env: &E) -> Result<Option<i32>> {
    env.var("API_ID")
        .filter(|v| !v.trim().is_empty())
        .map(|v| {
            v.trim()
                .parse::<i32>()
                .with_context(|| format!("API_ID must be an integer, got '{}'", v))
        })
        .transpose()
}

fn default_endpoint() -> String {
    DEFAULT_IMAGE_HOST_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("image-upload-bot")
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
        }
    }
}
