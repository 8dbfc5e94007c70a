//! The handler capability.

use async_trait::async_trait;

use super::context::Context;
use crate::error::HandlerResult;

/// A bot command.
///
/// `text` is the whole message, command prefix included. Returning
/// `Ok(None)` sends nothing. Errors are logged by the dispatcher and
/// never reach the channel.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context, sender: &str, text: &str) -> HandlerResult;
}
