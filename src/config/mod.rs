//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and TOML loading
//! - [`env`]: environment variable overrides
//! - [`validation`]: startup checks
//! - [`defaults`]: serde default functions

mod defaults;
mod env;
mod types;
mod validation;

pub use types::{
    BotConfig, Config, ConfigError, HandlerConfig, IdentityConfig, LogFormat, LoggingConfig,
    RateLimitConfig, ReconnectConfig, SearchConfig, ServerConfig, WeatherConfig,
};
pub use validation::{ValidationError, validate};
