//! slircbot - Straylight IRC bot

use std::sync::Arc;

use slircbot::clock::{Clock, SystemClock};
use slircbot::config::{Config, validate};
use slircbot::handlers::{Dispatcher, builtin_registry};
use slircbot::network::{ReconnectSupervisor, SessionController, TcpConnector};
use slircbot::stats::{MonthKey, StatsStore};
use slircbot::telemetry;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional TOML file; environment variables override it either way.
    let config_path = std::env::args().nth(1);
    let config = Config::load_with_env(config_path.as_deref())?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let started_at = clock.now();
    telemetry::init(&config.logging, MonthKey::of(&started_at))?;

    if let Err(errors) = validate(&config) {
        for e in &errors {
            error!(error = %e, "invalid configuration");
        }
        anyhow::bail!("{} configuration error(s), refusing to start", errors.len());
    }

    info!(
        server = %config.server.address(),
        channel = %config.server.channel,
        nick = %config.identity.nickname,
        prefix = %config.bot.command_prefix,
        "Starting slircbot"
    );
    if config.weather.api_key.is_none() {
        warn!("no weather API key configured, weather command will decline");
    }

    let registry = builtin_registry(&config)?;
    info!(commands = ?registry.prefixes(), "handlers registered");

    let stats = StatsStore::shared(started_at);
    let dispatcher = Arc::new(Dispatcher::new(registry, stats, Arc::clone(&clock), &config));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                shutdown.cancel();
            }
            Err(e) => error!(error = %e, "failed to listen for interrupt"),
        }
    });

    let controller = SessionController::new(
        &config,
        dispatcher,
        Arc::new(TcpConnector),
        clock,
        cancel,
    );
    let mut supervisor = ReconnectSupervisor::new(controller, &config.reconnect);
    let attempts = supervisor.run().await;

    info!(attempts, "slircbot stopped");
    Ok(())
}
