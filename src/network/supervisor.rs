//! Reconnect loop around [`SessionController`].

use std::time::Duration;

use tracing::{info, warn};

use super::controller::{RunOutcome, SessionController};
use crate::config::ReconnectConfig;

/// Reruns the controller after each lost connection.
///
/// The delay between attempts is fixed; the tenth failure waits exactly as
/// long as the first.
pub struct ReconnectSupervisor {
    controller: SessionController,
    enabled: bool,
    delay: Duration,
}

impl ReconnectSupervisor {
    pub fn new(controller: SessionController, policy: &ReconnectConfig) -> Self {
        Self {
            controller,
            enabled: policy.enabled,
            delay: policy.delay(),
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Run until shutdown is requested or a connection is lost with
    /// reconnecting disabled.
    ///
    /// Returns the number of connection attempts made.
    pub async fn run(&mut self) -> u32 {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.controller.run_once().await {
                RunOutcome::Shutdown => {
                    info!(attempts, "session shut down");
                    return attempts;
                }
                RunOutcome::Disconnected(error) => {
                    warn!(error = %error, attempt = attempts, "connection lost");
                    self.controller.dispatcher().rate_limits().cleanup();

                    if !self.enabled {
                        info!("auto-reconnect disabled, shutting down");
                        self.controller.give_up();
                        return attempts;
                    }

                    info!(delay_secs = self.delay.as_secs(), "reconnecting after delay");
                    let cancel = self.controller.cancel_token().clone();
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            self.controller.give_up();
                            info!(attempts, "shutdown requested while waiting to reconnect");
                            return attempts;
                        }
                        _ = tokio::time::sleep(self.delay) => {}
                    }
                }
            }
        }
    }

    pub fn into_controller(self) -> SessionController {
        self.controller
    }
}
