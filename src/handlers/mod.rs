//! Bot commands.
//!
//! [`core`] holds the handler trait, registry and dispatcher. The remaining
//! modules are the built-in commands, registered by [`builtin_registry`].

pub mod core;
mod fun;
mod info;
mod search;
mod weather;

use std::sync::Arc;

pub use self::core::{CommandEvent, Context, Dispatcher, Handler, Registry, Reply};
pub use fun::{DiceHandler, EightBallHandler, JokeHandler, RandRoller, Roller};
pub use info::{HelpHandler, PingHandler, StatsHandler, TimeHandler, TopUsersHandler, format_uptime};
pub use search::SearchHandler;
pub use weather::WeatherHandler;

use crate::config::Config;
use crate::error::HandlerError;

/// Registry with every built-in command under the configured prefix.
///
/// Order: help, time, ping, dice, 8ball, weather, joke, stats, google,
/// search, topusers.
pub fn builtin_registry(config: &Config) -> Result<Registry, HandlerError> {
    builtin_registry_with(config, Arc::new(RandRoller))
}

/// Same as [`builtin_registry`] with a chosen source of randomness.
pub fn builtin_registry_with(
    config: &Config,
    roller: Arc<dyn Roller>,
) -> Result<Registry, HandlerError> {
    let p = &config.bot.command_prefix;
    let http = reqwest::Client::builder()
        .timeout(config.handlers.http_timeout())
        .user_agent(concat!("slircbot/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let mut registry = Registry::new();
    registry.register(format!("{p}help"), HelpHandler);
    registry.register(format!("{p}time"), TimeHandler);
    registry.register(format!("{p}ping"), PingHandler);
    registry.register(
        format!("{p}dice"),
        DiceHandler::new(
            format!("{p}dice"),
            config.bot.max_dice_count,
            config.bot.max_dice_sides,
            Arc::clone(&roller),
        )?,
    );
    registry.register(format!("{p}8ball"), EightBallHandler::new(Arc::clone(&roller)));
    registry.register(
        format!("{p}weather"),
        WeatherHandler::new(format!("{p}weather"), http.clone(), &config.weather),
    );
    registry.register(format!("{p}joke"), JokeHandler::new(roller));
    registry.register(
        format!("{p}stats"),
        StatsHandler::new(config.identity.nickname.clone()),
    );
    registry.register(
        format!("{p}google"),
        SearchHandler::new(format!("{p}google"), http.clone(), &config.search),
    );
    registry.register(
        format!("{p}search"),
        SearchHandler::new(format!("{p}search"), http, &config.search),
    );
    registry.register(format!("{p}topusers"), TopUsersHandler);
    Ok(registry)
}
