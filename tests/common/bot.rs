//! Runs the bot against a [`TestServer`](super::TestServer).

use std::sync::Arc;

use slircbot::clock::Clock;
use slircbot::config::Config;
use slircbot::handlers::{Dispatcher, builtin_registry};
use slircbot::network::{
    Connector, ReconnectSupervisor, SessionController, SessionState, TcpConnector,
};
use slircbot::stats::{SharedStats, StatsStore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Defaults pointed at a loopback port.
pub fn test_config(port: u16) -> Config {
    let mut config = Config::default();
    config.server.host = "127.0.0.1".into();
    config.server.port = port;
    config.server.channel = "#test".into();
    config.identity.nickname = "testbot".into();
    config.identity.username = "testbot".into();
    config.identity.realname = "Test Bot".into();
    config.reconnect.delay_secs = 1;
    config
}

/// A running bot and the handles a test needs to inspect it.
pub struct TestBot {
    pub stats: SharedStats,
    pub dispatcher: Arc<Dispatcher>,
    pub cancel: CancellationToken,
    handle: JoinHandle<(u32, SessionState)>,
}

#[allow(dead_code)]
impl TestBot {
    pub fn spawn(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self::spawn_with(config, clock, Arc::new(TcpConnector))
    }

    pub fn spawn_with(
        config: &Config,
        clock: Arc<dyn Clock>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let registry = builtin_registry(config).expect("registry");
        let stats = StatsStore::shared(clock.now());
        let dispatcher = Arc::new(Dispatcher::new(
            registry,
            Arc::clone(&stats),
            Arc::clone(&clock),
            config,
        ));
        let cancel = CancellationToken::new();
        let controller = SessionController::new(
            config,
            Arc::clone(&dispatcher),
            connector,
            clock,
            cancel.clone(),
        );
        let reconnect = config.reconnect.clone();
        let handle = tokio::spawn(async move {
            let mut supervisor = ReconnectSupervisor::new(controller, &reconnect);
            let attempts = supervisor.run().await;
            (attempts, supervisor.controller().state())
        });
        Self {
            stats,
            dispatcher,
            cancel,
            handle,
        }
    }

    /// Wait for the supervisor to stop; returns attempts and final state.
    pub async fn join(self) -> (u32, SessionState) {
        tokio::time::timeout(std::time::Duration::from_secs(10), self.handle)
            .await
            .expect("bot did not stop")
            .expect("bot task panicked")
    }
}
