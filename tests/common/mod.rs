//! Integration test common infrastructure.
//!
//! A scripted IRC server on a loopback port and a helper that runs the bot
//! against it.

pub mod bot;
pub mod server;

#[allow(unused_imports)]
pub use bot::{TestBot, test_config};
#[allow(unused_imports)]
pub use server::{ServerConn, TestServer};
