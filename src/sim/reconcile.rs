//! Reconciliation cadence between local simulation and the shared document.
//!
//! The pattern is authoritative-for-self, mirror-for-peer: a client's
//! simulation owns its slot's fields and writes them out at a bounded
//! interval instead of every tick, tolerating a declared amount of
//! divergence between what it knows and what the document shows. State
//! flips (overheating, a lost life) mark the reconciler dirty so they are
//! published on the next due tick regardless of the tolerance.

/// Ticks between reconciliation writes (~100 ms at 60 Hz).
pub const RECONCILE_INTERVAL_TICKS: u32 = 6;

/// Positional divergence below which a due write is skipped.
pub const POSITION_TOLERANCE: f32 = 0.25;

/// Decides when the local simulation's state is written to the document.
#[derive(Debug, Clone)]
pub struct Reconciler {
    interval_ticks: u32,
    tolerance: f32,
    ticks_since_write: u32,
    last_written: Option<f32>,
    dirty: bool,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(RECONCILE_INTERVAL_TICKS, POSITION_TOLERANCE)
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(interval_ticks: u32, tolerance: f32) -> Self {
        Self {
            interval_ticks: interval_ticks.max(1),
            tolerance,
            ticks_since_write: 0,
            last_written: None,
            dirty: false,
        }
    }

    /// Advance one tick with the current authoritative value. Returns
    /// `true` when a write should be emitted now; the value is then
    /// recorded as published.
    pub fn tick(&mut self, value: f32) -> bool {
        self.ticks_since_write += 1;
        if self.ticks_since_write < self.interval_ticks {
            return false;
        }

        let diverged = match self.last_written {
            None => true,
            Some(last) => (value - last).abs() > self.tolerance,
        };
        if !(diverged || self.dirty) {
            // Nothing worth publishing; keep waiting without resetting the
            // interval so the next change goes out promptly.
            return false;
        }

        log::debug!("reconciling local value {value} after {} ticks", self.ticks_since_write);
        self.ticks_since_write = 0;
        self.last_written = Some(value);
        self.dirty = false;
        true
    }

    /// Force the next due tick to write even inside the tolerance, for
    /// non-positional state flips riding along in the same patch.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
