//! Virtual-time scheduler
//!
//! A single tick source for every timer the round uses. The host advances
//! time explicitly; nothing here reads a wall clock, so tests can step
//! through a whole round instantly.
//!
//! Due timers are handed out one at a time via [`Scheduler::pop_due`], in
//! (due time, creation order) order, so a handler may cancel or schedule
//! timers before the next one is considered.

use serde::{Deserialize, Serialize};

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// Pre-round countdown step
    CountdownTick,
    /// Round clock step
    RoundTick,
    /// Remove one click feedback item
    FeedbackExpiry { feedback_id: u64 },
    /// End the miss shake effect
    ShakeEnd,
    /// End the freeze-movement window
    FreezeEnd,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due_ms: u64,
    /// Repeat interval; `None` for one-shot timers
    period_ms: Option<u64>,
}

/// A timer that came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    /// Virtual time at which it fired
    pub at_ms: u64,
}

/// Cancellable one-shot and repeating timers over virtual milliseconds
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: u64, period_ms: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            due_ms: self.now_ms + delay_ms,
            period_ms,
        });
        id
    }

    /// Fire once after `delay_ms`
    pub fn schedule_once(&mut self, kind: TimerKind, delay_ms: u64) -> TimerId {
        self.insert(kind, delay_ms, None)
    }

    /// Fire every `period_ms` until cancelled (period of 0 is treated as 1)
    pub fn schedule_repeating(&mut self, kind: TimerKind, period_ms: u64) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(kind, period_ms, Some(period_ms))
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Cancel the timer in `slot`, if any, and clear the slot
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) {
        if let Some(id) = slot.take() {
            self.cancel(id);
        }
    }

    /// Drop every pending timer
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest timer due at or before `until_ms`
    ///
    /// Virtual time moves forward to the timer's due time. Repeating timers
    /// are re-armed before being returned. Returns `None` once nothing else
    /// is due; call [`Scheduler::advance_to`] afterwards to settle the clock.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id.0))
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[index];
        let fired = Fired {
            id: timer.id,
            kind: timer.kind,
            at_ms: timer.due_ms,
        };
        self.now_ms = self.now_ms.max(timer.due_ms);

        match timer.period_ms {
            Some(period) => timer.due_ms += period,
            None => {
                self.timers.swap_remove(index);
            }
        }

        Some(fired)
    }

    /// Move the clock forward without firing anything
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}
