//! Command dispatch.
//!
//! Accounting and matching run inline, in arrival order, on the session
//! loop. Handler execution is detached onto a tokio task gated by a
//! semaphore and bounded by a timeout; the reply comes back over a channel
//! so only the session writes to the transport.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;
use tracing::{Instrument, info, warn};

use super::context::{CommandEvent, Context, Reply};
use super::registry::Registry;
use super::traits::Handler;
use crate::clock::Clock;
use crate::config::Config;
use crate::error::HandlerError;
use crate::security::RateLimitManager;
use crate::stats::SharedStats;
use crate::telemetry::{CommandTimer, spans};

/// A matched command, already counted, waiting to run.
pub struct Invocation {
    name: String,
    handler: Arc<dyn Handler>,
    sender: String,
    text: String,
    reply_to: String,
}

impl Invocation {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reply_to(&self) -> &str {
        &self.reply_to
    }
}

pub struct Dispatcher {
    registry: Registry,
    ctx: Arc<Context>,
    channel: String,
    rate_limits: RateLimitManager,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: Registry,
        stats: SharedStats,
        clock: Arc<dyn Clock>,
        config: &Config,
    ) -> Self {
        let ctx = Context {
            stats,
            clock,
            commands: registry.prefixes(),
        };
        Self {
            registry,
            ctx: Arc::new(ctx),
            channel: config.server.channel.clone(),
            rate_limits: RateLimitManager::new(&config.rate_limit),
            permits: Arc::new(Semaphore::new(config.handlers.concurrency.max(1))),
            timeout: config.handlers.timeout(),
        }
    }

    pub fn stats(&self) -> &SharedStats {
        &self.ctx.stats
    }

    pub fn rate_limits(&self) -> &RateLimitManager {
        &self.rate_limits
    }

    /// Count the message and pick the handler, without running it.
    ///
    /// Channel messages bump `messages_received` and the sender's tally
    /// whether or not they hold a command. A match that passes the rate
    /// limit bumps `commands_processed`. Direct messages only ever count
    /// as commands.
    pub fn route(&self, event: &CommandEvent) -> Option<Invocation> {
        let in_channel = event.target.eq_ignore_ascii_case(&self.channel);
        if in_channel {
            info!(sender = %event.sender, text = %event.text, "channel message");
            self.ctx.stats.lock().record_channel_message(&event.sender);
        } else {
            info!(sender = %event.sender, text = %event.text, "private message");
        }

        let entry = self.registry.find(&event.text)?;

        if !self.rate_limits.check_command_rate(&event.sender) {
            return None;
        }

        self.ctx.stats.lock().record_command();
        info!(command = %entry.name(), sender = %event.sender, "command detected");

        let reply_to = if in_channel {
            self.channel.clone()
        } else {
            event.sender.clone()
        };
        Some(Invocation {
            name: entry.name().to_owned(),
            handler: entry.handler(),
            sender: event.sender.clone(),
            text: event.text.clone(),
            reply_to,
        })
    }

    /// Run a routed invocation under the timeout.
    ///
    /// Errors and timeouts are logged and become "no reply".
    pub async fn invoke(&self, invocation: Invocation) -> Option<Reply> {
        let Invocation {
            name,
            handler,
            sender,
            text,
            reply_to,
        } = invocation;

        let span = spans::command(&name, &sender, Some(&reply_to));
        let _timer = CommandTimer::new(&name);

        let result = tokio::time::timeout(self.timeout, handler.handle(&self.ctx, &sender, &text))
            .instrument(span)
            .await
            .unwrap_or(Err(HandlerError::Timeout(self.timeout)));

        match result {
            Ok(Some(text)) if !text.is_empty() => {
                info!(command = %name, target = %reply_to, response = %text, "sending response");
                Some(Reply {
                    target: reply_to,
                    text,
                })
            }
            Ok(_) => None,
            Err(e) => {
                warn!(command = %name, sender = %sender, code = e.error_code(), error = %e, "handler failed");
                None
            }
        }
    }

    /// Route and run in place.
    pub async fn dispatch(&self, event: &CommandEvent) -> Option<Reply> {
        let invocation = self.route(event)?;
        self.invoke(invocation).await
    }

    /// Idle slots in the worker pool.
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Route inline, then run the handler on the worker pool.
    ///
    /// Returns the task handle when a command matched and a worker was
    /// free. Commands arriving while every worker is busy are dropped
    /// rather than queued.
    pub fn spawn(
        self: &Arc<Self>,
        event: &CommandEvent,
        replies: mpsc::Sender<Reply>,
    ) -> Option<JoinHandle<()>> {
        let invocation = self.route(event)?;
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            warn!(
                command = %invocation.name(),
                sender = %event.sender,
                "all handler workers busy, dropping command"
            );
            return None;
        };
        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            let _permit = permit;
            if let Some(reply) = this.invoke(invocation).await {
                let _ = replies.send(reply).await;
            }
        }))
    }
}
