//! Deferred work for the single-threaded editor: selection restores queued
//! for the next tick, debounced values, and the clock they run against.

use std::cell::Cell;
use std::rc::Rc;

use crate::editing::anchors::SelectionAnchor;

/// Source of "now" in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: i64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

/// A restore waiting for the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRestore {
    pub generation: u64,
    pub anchor: Option<SelectionAnchor>,
}

/// At most one pending selection restore.
///
/// Each [`schedule`](Self::schedule) bumps the generation and replaces
/// whatever was pending. [`take`](Self::take) hands the restore out once.
#[derive(Debug, Default)]
pub struct RestoreQueue {
    generation: u64,
    pending: Option<PendingRestore>,
}

impl RestoreQueue {
    pub fn schedule(&mut self, anchor: Option<SelectionAnchor>) -> u64 {
        self.generation += 1;
        self.pending = Some(PendingRestore {
            generation: self.generation,
            anchor,
        });
        self.generation
    }

    pub fn take(&mut self) -> Option<PendingRestore> {
        self.pending.take()
    }

    /// Drop the pending restore without running it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Generation of the most recent schedule (0 before the first)
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds the latest value until `delay_ms` passes without a newer one.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: i64,
    pending: Option<(i64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms: i64::try_from(delay_ms).unwrap_or(i64::MAX),
            pending: None,
        }
    }

    /// Replace any pending value and restart the delay from `now_ms`
    pub fn arm(&mut self, value: T, now_ms: i64) {
        self.pending = Some((now_ms.saturating_add(self.delay_ms), value));
    }

    /// The pending value, if its delay has fully elapsed at `now_ms`
    pub fn poll(&mut self, now_ms: i64) -> Option<T> {
        match &self.pending {
            Some((due, _)) if now_ms >= *due => self.pending.take().map(|(_, value)| value),
            _ => None,
        }
    }

    /// The pending value regardless of its delay
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
