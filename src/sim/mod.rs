//! Local physics simulation for the arcade rounds.
//!
//! Each client advances only its *own* player at a fixed tick rate; the
//! opponent is a read-only mirror fed by the shared document. The
//! [`reconcile`] module owns the cadence at which local state is written
//! back out.

pub mod racer;
pub mod reconcile;
pub mod runner;

/// Nominal simulation rate for both arcade rounds, in ticks per second.
pub const TICK_HZ: u32 = 60;

pub use racer::{RiderInput, RiderSim};
pub use reconcile::Reconciler;
pub use runner::{generate_course, RunnerInput, RunnerSim, RunnerTick};
