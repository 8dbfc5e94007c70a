//! Informational commands: help, time, ping, stats, topusers.

use async_trait::async_trait;
use chrono::TimeDelta;

use super::core::{Context, Handler};
use crate::error::HandlerResult;

/// `help`: lists every registered command.
pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        Ok(Some(format!(
            "Available commands: {}",
            ctx.commands.join(", ")
        )))
    }
}

/// `time`: local wall-clock time.
pub struct TimeHandler;

#[async_trait]
impl Handler for TimeHandler {
    async fn handle(&self, ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        let now = ctx.clock.now().format("%Y-%m-%d %H:%M:%S");
        Ok(Some(format!("Current time: {now}")))
    }
}

/// `ping`: greets the sender.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, _ctx: &Context, sender: &str, _text: &str) -> HandlerResult {
        Ok(Some(format!("Pong! Hello {sender}!")))
    }
}

/// Uptime as `H:MM:SS`, prefixed by `N day(s), ` past 24 hours.
pub fn format_uptime(uptime: TimeDelta) -> String {
    let total = uptime.num_seconds().max(0);
    let days = total / 86_400;
    let rem = total % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// `stats`: uptime, counters and the month's top sender.
pub struct StatsHandler {
    title: String,
}

impl StatsHandler {
    /// `title` leads the reply, normally the bot's nickname.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[async_trait]
impl Handler for StatsHandler {
    async fn handle(&self, ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        let snap = ctx.stats.lock().snapshot();
        let uptime = format_uptime(ctx.clock.now() - snap.started_at);
        let (loudmouth, loud_count) = snap
            .loudmouth
            .unwrap_or_else(|| ("None".to_string(), 0));

        Ok(Some(format!(
            "{} Stats - Uptime: {}, Messages: {}, Commands: {} | {}: Messages: {}, Commands: {}, Loudmouth: {} ({} messages)",
            self.title,
            uptime,
            snap.all_time.messages_received,
            snap.all_time.commands_processed,
            snap.month,
            snap.current.messages_received,
            snap.current.commands_processed,
            loudmouth,
            loud_count,
        )))
    }
}

/// `topusers`: the month's three most active senders.
pub struct TopUsersHandler;

#[async_trait]
impl Handler for TopUsersHandler {
    async fn handle(&self, ctx: &Context, _sender: &str, _text: &str) -> HandlerResult {
        let (month, top) = {
            let stats = ctx.stats.lock();
            (stats.current_month(), stats.top_senders(3))
        };

        if top.is_empty() {
            return Ok(Some(format!("No user data available for {month}.")));
        }

        let ranked: Vec<String> = top
            .iter()
            .map(|(user, count)| format!("{user} ({count} messages)"))
            .collect();
        Ok(Some(format!(
            "Top 3 users for {month}: {}",
            ranked.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::stats::StatsStore;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    fn ctx_at(started: chrono::DateTime<Local>, now: chrono::DateTime<Local>) -> Context {
        Context {
            stats: StatsStore::shared(started),
            clock: Arc::new(ManualClock::new(now)),
            commands: vec![".help".into(), ".ping".into()],
        }
    }

    fn noon(day: u32) -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(TimeDelta::seconds(5)), "0:00:05");
        assert_eq!(format_uptime(TimeDelta::seconds(3 * 3600 + 4 * 60 + 5)), "3:04:05");
        assert_eq!(format_uptime(TimeDelta::seconds(86_400 + 61)), "1 day, 0:01:01");
        assert_eq!(format_uptime(TimeDelta::seconds(2 * 86_400)), "2 days, 0:00:00");
        assert_eq!(format_uptime(TimeDelta::seconds(-3)), "0:00:00");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let ctx = ctx_at(noon(1), noon(1));
        let reply = HelpHandler.handle(&ctx, "nick", ".help").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Available commands: .help, .ping"));
    }

    #[tokio::test]
    async fn test_time_uses_clock() {
        let ctx = ctx_at(noon(1), Local.with_ymd_and_hms(2024, 5, 2, 8, 9, 10).unwrap());
        let reply = TimeHandler.handle(&ctx, "nick", ".time").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Current time: 2024-05-02 08:09:10"));
    }

    #[tokio::test]
    async fn test_ping_greets_sender() {
        let ctx = ctx_at(noon(1), noon(1));
        let reply = PingHandler.handle(&ctx, "nick", ".ping").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Pong! Hello nick!"));
    }

    #[tokio::test]
    async fn test_stats_reply() {
        let ctx = ctx_at(noon(1), noon(2));
        {
            let mut stats = ctx.stats.lock();
            stats.record_channel_message("alice");
            stats.record_channel_message("bob");
            stats.record_channel_message("bob");
            stats.record_command();
        }
        let reply = StatsHandler::new("slircbot")
            .handle(&ctx, "alice", ".stats")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            reply,
            "slircbot Stats - Uptime: 1 day, 0:00:00, Messages: 3, Commands: 1 | 05-2024: Messages: 3, Commands: 1, Loudmouth: bob (2 messages)"
        );
    }

    #[tokio::test]
    async fn test_stats_without_senders() {
        let ctx = ctx_at(noon(1), noon(1));
        let reply = StatsHandler::new("bot")
            .handle(&ctx, "alice", ".stats")
            .await
            .unwrap()
            .unwrap();
        assert!(reply.ends_with("Loudmouth: None (0 messages)"));
    }

    #[tokio::test]
    async fn test_topusers() {
        let ctx = ctx_at(noon(1), noon(1));
        let reply = TopUsersHandler.handle(&ctx, "a", ".topusers").await.unwrap();
        assert_eq!(reply.as_deref(), Some("No user data available for 05-2024."));

        {
            let mut stats = ctx.stats.lock();
            for sender in ["a", "b", "b", "c", "c", "c", "d"] {
                stats.record_channel_message(sender);
            }
        }
        let reply = TopUsersHandler.handle(&ctx, "a", ".topusers").await.unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("Top 3 users for 05-2024: c (3 messages), b (2 messages), a (1 messages)")
        );
    }
}
