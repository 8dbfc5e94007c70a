//! Types passed into and out of handlers.

use std::sync::Arc;

use crate::clock::Clock;
use crate::stats::SharedStats;

/// Shared state available to every handler invocation.
pub struct Context {
    pub stats: SharedStats,
    pub clock: Arc<dyn Clock>,
    /// Registered command prefixes in registration order.
    pub commands: Vec<String>,
}

/// A `PRIVMSG` the session handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    /// Nickname of the sender.
    pub sender: String,
    /// Channel or the bot's own nickname.
    pub target: String,
    pub text: String,
}

/// Text to send back as a `PRIVMSG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub target: String,
    pub text: String,
}
