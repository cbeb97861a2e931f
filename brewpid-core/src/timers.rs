use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKind {
    /// Periodic liveness check of the device link.
    AliveCheck,
    /// Periodic refresh of the elapsed-time label on the home view.
    ElapsedLabel,
    /// One-shot guard against a backfill that never completes.
    BackfillSafety,
    /// One-shot reconnect after the link closed.
    Reconnect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimerEntry {
    due_at: i64,
    period: Option<i64>,
}

/// At most one pending timer per kind, driven by the caller's clock.
#[derive(Debug, Clone, Default)]
pub struct Timers {
    entries: BTreeMap<TimerKind, TimerEntry>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) a one-shot timer.
    pub fn schedule_once(&mut self, kind: TimerKind, now: i64, delay_ms: i64) {
        self.entries.insert(
            kind,
            TimerEntry {
                due_at: now + delay_ms.max(0),
                period: None,
            },
        );
    }

    pub fn schedule_every(&mut self, kind: TimerKind, now: i64, period_ms: i64) {
        let period = period_ms.max(1);
        self.entries.insert(
            kind,
            TimerEntry {
                due_at: now + period,
                period: Some(period),
            },
        );
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.entries.remove(&kind).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn due_at(&self, kind: TimerKind) -> Option<i64> {
        self.entries.get(&kind).map(|entry| entry.due_at)
    }

    pub fn next_due(&self) -> Option<i64> {
        self.entries.values().map(|entry| entry.due_at).min()
    }

    /// Removes fired one-shots and re-arms fired periodic timers. A periodic
    /// timer that fell behind fires once and skips the missed ticks.
    pub fn take_due(&mut self, now: i64) -> Vec<TimerKind> {
        let mut fired = Vec::new();
        self.entries.retain(|kind, entry| {
            if entry.due_at > now {
                return true;
            }
            fired.push(*kind);
            match entry.period {
                Some(period) => {
                    let missed = (now - entry.due_at) / period;
                    entry.due_at += (missed + 1) * period;
                    true
                }
                None => false,
            }
        });
        fired
    }
}
