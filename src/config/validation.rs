//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.host is required")]
    MissingHost,
    #[error("server.port must be non-zero")]
    InvalidPort,
    #[error("server.channel must start with '#' or '&', got '{0}'")]
    InvalidChannel(String),
    #[error("identity.nickname is required")]
    MissingNickname,
    #[error("bot.command_prefix must be non-empty and contain no whitespace, got '{0}'")]
    InvalidCommandPrefix(String),
    #[error("handlers.concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("reconnect.delay_secs must be at least 1 when auto-reconnect is on")]
    ZeroReconnectDelay,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::MissingHost);
    }
    if config.server.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }
    if !config.server.channel.starts_with(['#', '&']) {
        errors.push(ValidationError::InvalidChannel(config.server.channel.clone()));
    }

    if config.identity.nickname.trim().is_empty() {
        errors.push(ValidationError::MissingNickname);
    }

    let prefix = &config.bot.command_prefix;
    if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidCommandPrefix(prefix.clone()));
    }

    if config.handlers.concurrency == 0 {
        errors.push(ValidationError::ZeroConcurrency);
    }

    if config.reconnect.enabled && config.reconnect.delay_secs == 0 {
        errors.push(ValidationError::ZeroReconnectDelay);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
