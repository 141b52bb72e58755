//! Delayed actions with cancellation.
//!
//! Timed sequences (the start countdown, customer respawns) are expressed
//! as entries in a [`Scheduler`]: each entry carries a payload and a due
//! time in game seconds. The session drains due entries once per tick and
//! acts on their payloads. Every entry gets a [`ScheduleToken`]; cancelling
//! the token removes the entry so a torn-down phase never fires late.
//!
//! The payload type is generic. The session uses plain enums; a host that
//! prefers callbacks can schedule boxed closures.

use std::collections::BTreeMap;

use tracing::trace;

/// Handle to one scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduleToken(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    due_at: f64,
    payload: T,
}

/// Time-ordered queue of pending payloads.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    /// Keyed by insertion sequence, which doubles as the tie-breaker for
    /// entries due at the same time.
    entries: BTreeMap<u64, Entry<T>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// An empty scheduler.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `payload` to fire `delay_secs` after `now`. A negative or
    /// non-finite delay fires on the next drain.
    pub fn schedule_after(&mut self, now: f64, delay_secs: f64, payload: T) -> ScheduleToken {
        let delay = if delay_secs.is_finite() {
            delay_secs.max(0.0)
        } else {
            0.0
        };
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.insert(
            seq,
            Entry {
                due_at: now + delay,
                payload,
            },
        );
        trace!(seq, due_at = now + delay, "entry scheduled");
        ScheduleToken(seq)
    }

    /// Cancel an entry. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, token: ScheduleToken) -> Option<T> {
        self.entries.remove(&token.0).map(|entry| entry.payload)
    }

    /// Cancel every pending entry.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Whether `token` is still pending.
    pub fn is_pending(&self, token: ScheduleToken) -> bool {
        self.entries.contains_key(&token.0)
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry due at or before `now`, earliest
    /// first; entries due at the same time come out in scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut due: Vec<(f64, u64)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.due_at <= now)
            .map(|(seq, entry)| (entry.due_at, *seq))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        due.into_iter()
            .filter_map(|(_, seq)| self.entries.remove(&seq))
            .map(|entry| entry.payload)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_after(0.0, 3.0, "c");
        s.schedule_after(0.0, 1.0, "a");
        s.schedule_after(0.0, 2.0, "b");
        assert!(s.drain_due(0.5).is_empty());
        assert_eq!(s.drain_due(2.0), vec!["a", "b"]);
        assert_eq!(s.drain_due(10.0), vec!["c"]);
        assert!(s.is_empty());
    }

    #[test]
    fn ties_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_after(0.0, 1.0, 1);
        s.schedule_after(0.0, 1.0, 2);
        s.schedule_after(0.0, 1.0, 3);
        assert_eq!(s.drain_due(1.0), vec![1, 2, 3]);
    }

    #[test]
    fn cancelled_entries_never_fire() {
        let mut s = Scheduler::new();
        let keep = s.schedule_after(0.0, 1.0, "keep");
        let drop = s.schedule_after(0.0, 1.0, "drop");
        assert_eq!(s.cancel(drop), Some("drop"));
        assert_eq!(s.cancel(drop), None, "second cancel is a no-op");
        assert!(s.is_pending(keep));
        assert_eq!(s.drain_due(5.0), vec!["keep"]);
        assert!(!s.is_pending(keep));
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut s = Scheduler::new();
        s.schedule_after(0.0, 1.0, ());
        s.schedule_after(0.0, 2.0, ());
        s.cancel_all();
        assert!(s.drain_due(100.0).is_empty());
    }

    #[test]
    fn negative_delay_fires_immediately() {
        let mut s = Scheduler::new();
        s.schedule_after(4.0, -1.0, "now");
        s.schedule_after(4.0, f64::NAN, "also now");
        assert_eq!(s.drain_due(4.0), vec!["now", "also now"]);
    }

    #[test]
    fn boxed_callbacks_can_be_scheduled() {
        let mut s: Scheduler<Box<dyn FnOnce() -> u32>> = Scheduler::new();
        s.schedule_after(0.0, 1.0, Box::new(|| 7));
        let fired: Vec<u32> = s.drain_due(1.0).into_iter().map(|f| f()).collect();
        assert_eq!(fired, vec![7]);
    }
}
