//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Bot configuration.
///
/// Every section is optional; an empty file yields [`Config::default`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// IRC server and channel.
    #[serde(default)]
    pub server: ServerConfig,
    /// Nickname, username and realname.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Command surface.
    #[serde(default)]
    pub bot: BotConfig,
    /// Reconnect policy.
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    /// Per-sender command rate limiting.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Handler worker pool.
    #[serde(default)]
    pub handlers: HandlerConfig,
    /// Log level and destination.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// WeatherAPI.com access.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// DuckDuckGo Instant Answer access.
    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from an optional file, then apply process environment overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(config)
    }
}

/// IRC server connection target.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname or address of the IRC server.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port (plaintext).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Channel joined after registration.
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            channel: default_channel(),
        }
    }
}

impl ServerConfig {
    /// `host:port` form used for connecting and logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Registration identity.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    #[serde(default = "default_nickname")]
    pub nickname: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_realname")]
    pub realname: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            nickname: default_nickname(),
            username: default_username(),
            realname: default_realname(),
        }
    }
}

/// Command surface settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Prefix put in front of every command token (e.g. `.` for `.help`).
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    /// Upper bound on X in `dice XdY`.
    #[serde(default = "default_max_dice_count")]
    pub max_dice_count: u32,
    /// Upper bound on Y in `dice XdY`.
    #[serde(default = "default_max_dice_sides")]
    pub max_dice_sides: u32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            max_dice_count: default_max_dice_count(),
            max_dice_sides: default_max_dice_sides(),
        }
    }
}

/// Reconnect policy: fixed delay, no backoff.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reconnect_delay")]
    pub delay_secs: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_secs: default_reconnect_delay(),
        }
    }
}

impl ReconnectConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Per-sender command rate limiting.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Minimum spacing between two commands from the same sender.
    #[serde(default = "default_rate_limit_interval")]
    pub interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_rate_limit_interval(),
        }
    }
}

impl RateLimitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Handler worker pool.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    /// Per-invocation deadline.
    #[serde(default = "default_handler_timeout")]
    pub timeout_secs: u64,
    /// Maximum number of handlers running at once.
    #[serde(default = "default_handler_concurrency")]
    pub concurrency: usize,
    /// Deadline for a single outbound HTTP request.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_handler_timeout(),
            concurrency: default_handler_concurrency(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl HandlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Log level and destination.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Append-only log file, in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
    /// Directory the log file is placed in.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            file: None,
            dir: None,
        }
    }
}

/// WeatherAPI.com access.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Absent key makes the weather command answer "not configured".
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_url(),
        }
    }
}

/// DuckDuckGo Instant Answer access.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 6667);
        assert_eq!(config.bot.command_prefix, ".");
        assert_eq!(config.bot.max_dice_count, 10);
        assert_eq!(config.bot.max_dice_sides, 100);
        assert!(config.reconnect.enabled);
        assert_eq!(config.reconnect.delay(), Duration::from_secs(30));
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.rate_limit.interval_secs, 2);
        assert_eq!(config.handlers.timeout_secs, 15);
        assert_eq!(config.handlers.concurrency, 4);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.weather.api_key.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r##"
[server]
host = "irc.example.net"
channel = "#rust"

[bot]
command_prefix = "!"

[logging]
format = "json"
"##,
        )
        .unwrap();
        assert_eq!(config.server.address(), "irc.example.net:6667");
        assert_eq!(config.server.channel, "#rust");
        assert_eq!(config.bot.command_prefix, "!");
        assert_eq!(config.bot.max_dice_sides, 100);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[identity]\nnickname = \"helper\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.identity.nickname, "helper");
        assert_eq!(config.identity.username, "slircbot");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();
        assert!(matches!(
            Config::load(file.path()).unwrap_err(),
            ConfigError::Parse(_)
        ));
    }
}
