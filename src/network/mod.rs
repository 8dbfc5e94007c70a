//! Connection to the IRC server.
//!
//! - [`session`]: sans-IO registration and keepalive state machine
//! - [`connector`]: transport establishment
//! - [`controller`]: drives one connection through the session machine
//! - [`supervisor`]: fixed-delay reconnect loop

pub mod connector;
pub mod controller;
pub mod session;
pub mod supervisor;

pub use connector::{BoxedTransport, Connector, TcpConnector, Transport};
pub use controller::{RunOutcome, SessionController};
pub use session::{Identity, Session, SessionAction, SessionState};
pub use supervisor::ReconnectSupervisor;
