//! Sans-IO client session state machine.
//!
//! [`Session`] owns registration and keepalive for one bot identity. It
//! consumes inbound lines and returns [`SessionAction`]s for the caller to
//! carry out; it never touches a socket.
//!
//! ```text
//! Disconnected ─begin_connect─▶ Connecting ─connected─▶ AwaitingWelcome
//!                                   │                        │ 001
//!                            connect_failed                  ▼
//!                                   ▼                     Joined
//!                             Reconnecting ◀─connection_lost─┘
//! ```
//!
//! `shutdown` moves any state to `ShuttingDown`, which is terminal.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slircbot_proto::response::{ERR_NICKNAMEINUSE, RPL_WELCOME};
use slircbot_proto::{Command, Message};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::handlers::CommandEvent;

const KEEPALIVE_VERB: &str = "PING";
const KEEPALIVE_REPLY: &str = "PONG";

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No transport and no attempt yet.
    #[default]
    Disconnected,
    /// A transport is being opened.
    Connecting,
    /// NICK/USER sent, waiting for `001`.
    AwaitingWelcome,
    /// Welcome received and JOIN sent; commands are dispatched.
    Joined,
    /// Transport gone, waiting for the next attempt.
    Reconnecting,
    /// Terminal. Inbound input is ignored.
    ShuttingDown,
}

impl SessionState {
    /// Whether a transport is open in this state.
    pub fn has_transport(self) -> bool {
        matches!(self, Self::AwaitingWelcome | Self::Joined)
    }
}

/// Work produced by the session for the I/O layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionAction {
    /// Write this message to the server.
    Send(Message),
    /// Write this line verbatim.
    SendRaw(String),
    /// Hand a `PRIVMSG` to the dispatcher.
    Dispatch(CommandEvent),
}

impl SessionAction {
    fn send(cmd: Command) -> Self {
        Self::Send(Message::from(cmd))
    }
}

/// Names the session registers with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub nickname: String,
    pub username: String,
    pub realname: String,
    pub channel: String,
}

impl Identity {
    pub fn from_config(config: &Config) -> Self {
        Self {
            nickname: config.identity.nickname.clone(),
            username: config.identity.username.clone(),
            realname: config.identity.realname.clone(),
            channel: config.server.channel.clone(),
        }
    }
}

/// Registration and keepalive logic for one bot.
pub struct Session {
    identity: Identity,
    state: SessionState,
    nick: String,
    rng: StdRng,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self::with_rng(identity, StdRng::from_entropy())
    }

    /// Session with a fixed seed for the nickname suffixes.
    pub fn with_seed(identity: Identity, seed: u64) -> Self {
        Self::with_rng(identity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(identity: Identity, rng: StdRng) -> Self {
        let nick = identity.nickname.clone();
        Self {
            identity,
            state: SessionState::Disconnected,
            nick,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Nickname most recently requested from the server.
    pub fn nickname(&self) -> &str {
        &self.nick
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Start a connection attempt. Returns `false` once shut down.
    pub fn begin_connect(&mut self) -> bool {
        if self.state == SessionState::ShuttingDown {
            return false;
        }
        self.state = SessionState::Connecting;
        true
    }

    /// The attempt failed before a transport was open.
    pub fn connect_failed(&mut self) {
        if self.state != SessionState::ShuttingDown {
            self.state = SessionState::Reconnecting;
        }
    }

    /// A transport is open: register with the configured names.
    ///
    /// The nickname resets to the configured base on every connection.
    pub fn connected(&mut self) -> Vec<SessionAction> {
        if self.state == SessionState::ShuttingDown {
            return Vec::new();
        }
        self.nick = self.identity.nickname.clone();
        self.state = SessionState::AwaitingWelcome;
        vec![
            SessionAction::send(Command::NICK(self.nick.clone())),
            SessionAction::send(Command::USER(
                self.identity.username.clone(),
                self.identity.realname.clone(),
            )),
        ]
    }

    /// The transport closed or failed.
    pub fn connection_lost(&mut self) {
        if self.state != SessionState::ShuttingDown {
            self.state = SessionState::Reconnecting;
        }
    }

    /// Enter the terminal state.
    ///
    /// Yields a `QUIT` when a transport is still open to carry it.
    pub fn shutdown(&mut self) -> Vec<SessionAction> {
        let had_transport = self.state.has_transport();
        self.state = SessionState::ShuttingDown;
        if had_transport {
            vec![SessionAction::send(Command::QUIT(format!(
                "{} signing off!",
                self.identity.realname
            )))]
        } else {
            Vec::new()
        }
    }

    /// Process one inbound line.
    ///
    /// Any line containing `PING` gets exactly one keepalive reply, ahead of
    /// whatever else the line causes. A parsed `PING` is answered
    /// `PONG :<token>`; every other such line is echoed with the verb
    /// swapped in place.
    pub fn handle_line(&mut self, line: &str) -> Vec<SessionAction> {
        if !self.state.has_transport() {
            return Vec::new();
        }

        let parsed = Message::parse(line);
        let mut actions = Vec::new();
        match &parsed {
            Ok(msg) if msg.is(KEEPALIVE_VERB) => {
                actions.push(match msg.keepalive_token() {
                    Some(token) => SessionAction::send(Command::PONG(token.to_owned())),
                    None => Self::echo_keepalive(line),
                });
                return actions;
            }
            _ if line.contains(KEEPALIVE_VERB) => actions.push(Self::echo_keepalive(line)),
            _ => {}
        }

        match parsed {
            Ok(msg) => actions.extend(self.handle_message(line, &msg)),
            Err(e) => debug!(line = %line, error = %e, "ignoring unparseable line"),
        }
        actions
    }

    fn handle_message(&mut self, line: &str, msg: &Message) -> Vec<SessionAction> {
        match self.state {
            SessionState::AwaitingWelcome if msg.is(RPL_WELCOME) => {
                info!(nick = %self.nick, channel = %self.identity.channel, "registered, joining");
                self.state = SessionState::Joined;
                vec![SessionAction::send(Command::JOIN(
                    self.identity.channel.clone(),
                ))]
            }
            SessionState::AwaitingWelcome if msg.is(ERR_NICKNAMEINUSE) => {
                let next = self.next_nick();
                warn!(rejected = %self.nick, next = %next, "nickname in use");
                self.nick = next;
                vec![SessionAction::send(Command::NICK(self.nick.clone()))]
            }
            SessionState::Joined => self.dispatch(msg).into_iter().collect(),
            _ => {
                if msg.is("ERROR") {
                    warn!(line = %line, "server error");
                }
                Vec::new()
            }
        }
    }

    fn dispatch(&self, msg: &Message) -> Option<SessionAction> {
        let (target, text) = msg.privmsg()?;
        let sender = msg.source_name()?;
        Some(SessionAction::Dispatch(CommandEvent {
            sender: sender.to_owned(),
            target: target.to_owned(),
            text: text.to_owned(),
        }))
    }

    /// Base nickname plus a suffix in `1..=999`, never the rejected one.
    fn next_nick(&mut self) -> String {
        loop {
            let candidate = format!(
                "{}{}",
                self.identity.nickname,
                self.rng.gen_range(1..=999u16)
            );
            if candidate != self.nick {
                return candidate;
            }
        }
    }

    fn echo_keepalive(line: &str) -> SessionAction {
        SessionAction::SendRaw(line.replacen(KEEPALIVE_VERB, KEEPALIVE_REPLY, 1))
    }
}
