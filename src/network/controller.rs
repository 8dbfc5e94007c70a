//! Session I/O driver.
//!
//! [`SessionController`] owns the transport for one connection at a time.
//! It feeds raw reads through a [`LineFramer`], runs each line through the
//! month check and the [`Session`] machine, writes protocol replies, and
//! hands `PRIVMSG`s to the [`Dispatcher`]. Handler replies come back over a
//! channel so the transport has a single writer.

use std::sync::Arc;

use futures_util::SinkExt;
use slircbot_proto::{Command, LineCodec, LineFramer};
use tokio::io::{AsyncReadExt, WriteHalf};
use tokio::sync::mpsc;
use tokio_util::codec::FramedWrite;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, warn};

use super::connector::{BoxedTransport, Connector};
use super::session::{Identity, Session, SessionAction, SessionState};
use crate::clock::Clock;
use crate::config::Config;
use crate::error::SessionError;
use crate::handlers::{Dispatcher, Reply};
use crate::stats::MonthKey;
use crate::telemetry::spans;

const READ_CHUNK: usize = 4096;
const REPLY_QUEUE: usize = 64;

type LineSink = FramedWrite<WriteHalf<BoxedTransport>, LineCodec>;

/// How a single connection ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The transport failed or was never opened. The session is `Reconnecting`.
    Disconnected(SessionError),
    /// Shutdown was requested. The session is `ShuttingDown`.
    Shutdown,
}

pub struct SessionController {
    addr: String,
    session: Session,
    dispatcher: Arc<Dispatcher>,
    connector: Arc<dyn Connector>,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl SessionController {
    pub fn new(
        config: &Config,
        dispatcher: Arc<Dispatcher>,
        connector: Arc<dyn Connector>,
        clock: Arc<dyn Clock>,
        cancel: CancellationToken,
    ) -> Self {
        Self::with_session(
            config.server.address(),
            Session::new(Identity::from_config(config)),
            dispatcher,
            connector,
            clock,
            cancel,
        )
    }

    pub fn with_session(
        addr: String,
        session: Session,
        dispatcher: Arc<Dispatcher>,
        connector: Arc<dyn Connector>,
        clock: Arc<dyn Clock>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            addr,
            session,
            dispatcher,
            connector,
            clock,
            cancel,
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Stop for good without a transport to say goodbye on.
    pub fn give_up(&mut self) {
        self.session.shutdown();
    }

    /// Open one connection and drive it until it ends.
    pub async fn run_once(&mut self) -> RunOutcome {
        if !self.session.begin_connect() {
            return RunOutcome::Shutdown;
        }
        info!(addr = %self.addr, "connecting");

        let connected = tokio::select! {
            _ = self.cancel.cancelled() => {
                self.session.shutdown();
                return RunOutcome::Shutdown;
            }
            result = self.connector.connect(&self.addr) => result,
        };

        let transport = match connected {
            Ok(transport) => transport,
            Err(source) => {
                self.session.connect_failed();
                return RunOutcome::Disconnected(SessionError::Connect {
                    addr: self.addr.clone(),
                    source,
                });
            }
        };

        let span = spans::session(&self.addr, self.session.nickname());
        self.drive(transport).instrument(span).await
    }

    async fn drive(&mut self, transport: BoxedTransport) -> RunOutcome {
        let (mut reader, writer) = tokio::io::split(transport);
        let mut sink = FramedWrite::new(writer, LineCodec::new());
        let mut framer = LineFramer::new();
        let mut buf = vec![0u8; READ_CHUNK];
        let (reply_tx, mut reply_rx) = mpsc::channel::<Reply>(REPLY_QUEUE);

        let registration = self.session.connected();
        if let Err(e) = self.apply(registration, &mut sink, &reply_tx).await {
            return self.lost(e);
        }

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => {
                    self.farewell(&mut sink).await;
                    return RunOutcome::Shutdown;
                }

                read = reader.read(&mut buf) => {
                    let n = match read {
                        Ok(0) => return self.lost(SessionError::Closed),
                        Ok(n) => n,
                        Err(e) => return self.lost(SessionError::Io(e)),
                    };
                    for line in framer.feed(&buf[..n]) {
                        let line = match line {
                            Ok(line) => line,
                            Err(e) => {
                                warn!(error = %e, "dropping inbound line");
                                continue;
                            }
                        };
                        if let Err(e) = self.process_line(&line, &mut sink, &reply_tx).await {
                            return self.lost(e);
                        }
                    }
                }

                Some(reply) = reply_rx.recv() => {
                    let msg = Command::PRIVMSG(reply.target, reply.text);
                    if let Err(e) = sink.send(msg.to_string()).await {
                        return self.lost(e.into());
                    }
                }
            }
        }
    }

    async fn process_line(
        &mut self,
        line: &str,
        sink: &mut LineSink,
        replies: &mpsc::Sender<Reply>,
    ) -> Result<(), SessionError> {
        self.check_month();
        debug!(line = %line, "recv");
        let actions = self.session.handle_line(line);
        self.apply(actions, sink, replies).await
    }

    async fn apply(
        &mut self,
        actions: Vec<SessionAction>,
        sink: &mut LineSink,
        replies: &mpsc::Sender<Reply>,
    ) -> Result<(), SessionError> {
        for action in actions {
            match action {
                SessionAction::Send(msg) => {
                    debug!(line = %msg, "send");
                    sink.send(msg.to_string()).await?;
                }
                SessionAction::SendRaw(raw) => {
                    debug!(line = %raw, "send raw");
                    sink.send(raw).await?;
                }
                SessionAction::Dispatch(event) => {
                    self.dispatcher.spawn(&event, replies.clone());
                }
            }
        }
        Ok(())
    }

    /// Roll the stats over when the calendar month has changed.
    ///
    /// Also prunes idle rate limiters, so long sessions don't accumulate one
    /// per sender ever seen.
    fn check_month(&self) {
        let month = MonthKey::of(&self.clock.now());
        let rolled = {
            let mut stats = self.dispatcher.stats().lock();
            let previous = stats.current_month();
            let rolled = stats.rollover(month);
            if rolled {
                info!(from = %previous, to = %month, "month changed, rolling over stats");
            }
            rolled
        };
        if rolled {
            self.dispatcher.rate_limits().cleanup();
        }
    }

    async fn farewell(&mut self, sink: &mut LineSink) {
        info!("shutdown requested, leaving");
        for action in self.session.shutdown() {
            if let SessionAction::Send(msg) = action
                && let Err(e) = sink.send(msg.to_string()).await
            {
                debug!(error = %e, "farewell not delivered");
            }
        }
        let _ = sink.close().await;
    }

    fn lost(&mut self, error: SessionError) -> RunOutcome {
        self.session.connection_lost();
        RunOutcome::Disconnected(error)
    }
}
