//! Environment variable overrides.
//!
//! Applied on top of the file (or built-in defaults). Variable names follow
//! the bot's historical `.env` layout.

use std::str::FromStr;

use super::types::{Config, ConfigError};

fn parse_num<T: FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// `"true"` in any case is true; everything else is false.
fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

impl Config {
    /// Apply overrides from `lookup` (normally `std::env::var`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("IRC_SERVER") {
            self.server.host = v;
        }
        if let Some(v) = lookup("IRC_PORT") {
            self.server.port = parse_num("IRC_PORT", v)?;
        }
        if let Some(v) = lookup("IRC_CHANNEL") {
            self.server.channel = v;
        }

        if let Some(v) = lookup("BOT_NICKNAME") {
            self.identity.nickname = v;
        }
        if let Some(v) = lookup("BOT_USERNAME") {
            self.identity.username = v;
        }
        if let Some(v) = lookup("BOT_REALNAME") {
            self.identity.realname = v;
        }

        if let Some(v) = lookup("COMMAND_PREFIX") {
            self.bot.command_prefix = v;
        }
        if let Some(v) = lookup("MAX_DICE_COUNT") {
            self.bot.max_dice_count = parse_num("MAX_DICE_COUNT", v)?;
        }
        if let Some(v) = lookup("MAX_DICE_SIDES") {
            self.bot.max_dice_sides = parse_num("MAX_DICE_SIDES", v)?;
        }

        if let Some(v) = lookup("AUTO_RECONNECT") {
            self.reconnect.enabled = parse_flag(&v);
        }
        if let Some(v) = lookup("RECONNECT_DELAY") {
            self.reconnect.delay_secs = parse_num("RECONNECT_DELAY", v)?;
        }

        if let Some(v) = lookup("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = parse_flag(&v);
        }
        if let Some(v) = lookup("RATE_LIMIT_SECONDS") {
            self.rate_limit.interval_secs = parse_num("RATE_LIMIT_SECONDS", v)?;
        }

        if let Some(v) = lookup("HANDLER_TIMEOUT") {
            self.handlers.timeout_secs = parse_num("HANDLER_TIMEOUT", v)?;
        }
        if let Some(v) = lookup("HANDLER_CONCURRENCY") {
            self.handlers.concurrency = parse_num("HANDLER_CONCURRENCY", v)?;
        }

        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_FILE") {
            self.logging.file = Some(v);
        }
        if let Some(v) = lookup("LOG_DIR") {
            self.logging.dir = Some(v);
        }

        if let Some(v) = lookup("WEATHER_API_KEY")
            && !v.trim().is_empty()
        {
            self.weather.api_key = Some(v);
        }

        Ok(())
    }
}
