//! slircbot - Straylight IRC bot
//!
//! A single-channel IRC bot: one persistent session with registration,
//! nickname-collision recovery and fixed-delay reconnects, plus a registry
//! of dot-commands with per-month usage statistics.

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod security;
pub mod stats;
pub mod telemetry;
