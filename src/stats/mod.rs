//! Message and command statistics, bucketed by calendar month.
//!
//! [`StatsStore`] is the only shared mutable state in the bot. Every change
//! goes through one of three entry points: [`StatsStore::record_channel_message`],
//! [`StatsStore::record_command`] and [`StatsStore::rollover`].

mod month;
mod tally;

pub use month::MonthKey;
pub use tally::UserTally;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;

/// Handle shared between the session loop and handlers.
pub type SharedStats = Arc<Mutex<StatsStore>>;

/// Message and command counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub messages_received: u64,
    pub commands_processed: u64,
}

/// Aggregates for one calendar month.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBucket {
    pub counters: Counters,
    pub users: UserTally,
}

/// Point-in-time copy of the headline numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub started_at: DateTime<Local>,
    pub all_time: Counters,
    pub month: MonthKey,
    pub current: Counters,
    /// Top sender of the current month.
    pub loudmouth: Option<(String, u64)>,
}

#[derive(Debug)]
pub struct StatsStore {
    started_at: DateTime<Local>,
    all_time: Counters,
    users: UserTally,
    months: BTreeMap<MonthKey, MonthlyBucket>,
    current: MonthKey,
}

impl StatsStore {
    /// Empty store whose current month is the one containing `started_at`.
    pub fn new(started_at: DateTime<Local>) -> Self {
        let current = MonthKey::of(&started_at);
        let mut months = BTreeMap::new();
        months.insert(current, MonthlyBucket::default());
        Self {
            started_at,
            all_time: Counters::default(),
            users: UserTally::default(),
            months,
            current,
        }
    }

    pub fn shared(started_at: DateTime<Local>) -> SharedStats {
        Arc::new(Mutex::new(Self::new(started_at)))
    }

    fn current_bucket(&mut self) -> &mut MonthlyBucket {
        self.months.entry(self.current).or_default()
    }

    /// Count a message seen in the bot's channel.
    pub fn record_channel_message(&mut self, sender: &str) {
        self.all_time.messages_received += 1;
        self.users.record(sender);

        let bucket = self.current_bucket();
        bucket.counters.messages_received += 1;
        bucket.users.record(sender);
    }

    /// Count a recognised command.
    pub fn record_command(&mut self) {
        self.all_time.commands_processed += 1;
        self.current_bucket().counters.commands_processed += 1;
    }

    /// Make `month` the current month.
    ///
    /// Earlier buckets are kept. Returns `false` when `month` is already
    /// current.
    pub fn rollover(&mut self, month: MonthKey) -> bool {
        if month == self.current {
            return false;
        }
        self.current = month;
        self.months.entry(month).or_default();
        true
    }

    pub fn current_month(&self) -> MonthKey {
        self.current
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Bucket for any month observed so far.
    pub fn bucket(&self, month: MonthKey) -> Option<&MonthlyBucket> {
        self.months.get(&month)
    }

    /// Months with a bucket, oldest first.
    pub fn months(&self) -> impl Iterator<Item = MonthKey> + '_ {
        self.months.keys().copied()
    }

    /// Top `n` senders of the current month.
    pub fn top_senders(&self, n: usize) -> Vec<(String, u64)> {
        self.months
            .get(&self.current)
            .map(|bucket| bucket.users.top(n))
            .unwrap_or_default()
    }

    /// Top `n` senders since start.
    pub fn all_time_top_senders(&self, n: usize) -> Vec<(String, u64)> {
        self.users.top(n)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let bucket = self.months.get(&self.current);
        StatsSnapshot {
            started_at: self.started_at,
            all_time: self.all_time,
            month: self.current,
            current: bucket.map(|b| b.counters).unwrap_or_default(),
            loudmouth: bucket
                .and_then(|b| b.users.leader())
                .map(|(name, count)| (name.to_owned(), count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn store_in(year: i32, month: u32) -> StatsStore {
        StatsStore::new(Local.with_ymd_and_hms(year, month, 15, 12, 0, 0).unwrap())
    }

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn test_current_bucket_exists_from_start() {
        let store = store_in(2024, 5);
        assert_eq!(store.current_month(), key(2024, 5));
        assert!(store.bucket(key(2024, 5)).is_some());
    }

    #[test]
    fn test_top_senders_within_month() {
        let mut store = store_in(2024, 5);
        for sender in ["A", "A", "B", "A"] {
            store.record_channel_message(sender);
        }
        assert_eq!(
            store.top_senders(2),
            vec![("A".to_string(), 3), ("B".to_string(), 1)]
        );
    }

    #[test]
    fn test_rollover_starts_fresh_bucket_and_keeps_old() {
        let mut store = store_in(2024, 5);
        for sender in ["A", "A", "A", "B"] {
            store.record_channel_message(sender);
        }
        store.record_command();

        assert!(store.rollover(key(2024, 6)));
        store.record_channel_message("A");

        assert_eq!(store.top_senders(3), vec![("A".to_string(), 1)]);

        let may = store.bucket(key(2024, 5)).unwrap();
        assert_eq!(may.counters.messages_received, 4);
        assert_eq!(may.counters.commands_processed, 1);
        assert_eq!(may.users.get("A"), 3);

        let snap = store.snapshot();
        assert_eq!(snap.all_time.messages_received, 5);
        assert_eq!(snap.current.messages_received, 1);
        assert_eq!(snap.all_time.commands_processed, 1);
        assert_eq!(snap.current.commands_processed, 0);
        assert_eq!(store.all_time_top_senders(1), vec![("A".to_string(), 4)]);
    }

    #[test]
    fn test_rollover_is_idempotent() {
        let mut store = store_in(2024, 5);
        store.record_channel_message("A");
        assert!(!store.rollover(key(2024, 5)));
        assert!(store.rollover(key(2024, 6)));
        store.record_channel_message("B");
        assert!(!store.rollover(key(2024, 6)));

        assert_eq!(store.bucket(key(2024, 6)).unwrap().users.get("B"), 1);
        assert_eq!(store.months().count(), 2);
    }

    #[test]
    fn test_snapshot_loudmouth() {
        let mut store = store_in(2024, 5);
        assert_eq!(store.snapshot().loudmouth, None);
        store.record_channel_message("x");
        store.record_channel_message("y");
        store.record_channel_message("y");
        assert_eq!(store.snapshot().loudmouth, Some(("y".to_string(), 2)));
    }
}
