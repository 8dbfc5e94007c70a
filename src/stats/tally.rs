use std::collections::HashMap;

/// Per-sender message counts that remember first-seen order.
#[derive(Debug, Clone, Default)]
pub struct UserTally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl UserTally {
    pub fn record(&mut self, sender: &str) {
        match self.index.get(sender) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(sender.to_owned(), self.counts.len());
                self.counts.push((sender.to_owned(), 1));
            }
        }
    }

    pub fn get(&self, sender: &str) -> u64 {
        self.index.get(sender).map_or(0, |&slot| self.counts[slot].1)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Highest counts first; equal counts keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// The sender with the most messages (earliest seen on ties).
    pub fn leader(&self) -> Option<(&str, u64)> {
        self.counts
            .iter()
            .fold(None, |best: Option<&(String, u64)>, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(name, count)| (name.as_str(), *count))
    }
}
