//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_host() -> String {
    "irc.libera.chat".to_string()
}

pub fn default_port() -> u16 {
    6667
}

pub fn default_channel() -> String {
    "#slircbot".to_string()
}

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_nickname() -> String {
    "slircbot".to_string()
}

pub fn default_username() -> String {
    "slircbot".to_string()
}

pub fn default_realname() -> String {
    "Straylight IRC Bot".to_string()
}

// =============================================================================
// Bot Defaults
// =============================================================================

pub fn default_command_prefix() -> String {
    ".".to_string()
}

pub fn default_max_dice_count() -> u32 {
    10
}

pub fn default_max_dice_sides() -> u32 {
    100
}

// =============================================================================
// Reconnect / Rate Limit / Handler Defaults
// =============================================================================

pub fn default_reconnect_delay() -> u64 {
    30
}

pub fn default_rate_limit_interval() -> u64 {
    2
}

pub fn default_handler_timeout() -> u64 {
    15
}

pub fn default_handler_concurrency() -> usize {
    4
}

pub fn default_http_timeout() -> u64 {
    10
}

// =============================================================================
// Logging / External API Defaults
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_weather_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

pub fn default_search_url() -> String {
    "https://api.duckduckgo.com/".to_string()
}
