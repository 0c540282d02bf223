//! Heat-managed racer simulation.
//!
//! Holding accelerate builds speed and heat; heat crossing the overheat
//! threshold cuts all forward progress until it decays below the *cooldown*
//! threshold. The two thresholds form a hysteresis band so the overheated
//! flag cannot flap at the boundary. Speed bleeds off through friction
//! every tick whether or not the rider is accelerating.

use serde::{Deserialize, Serialize};

/// Track position at which a race is won.
pub const FINISH_LINE: f32 = 100.0;

/// Heat gained per tick while accelerating.
pub const HEAT_INCREASE: f32 = 0.8;

/// Heat shed per tick while not accelerating (or while overheated).
pub const HEAT_DECREASE: f32 = 0.5;

/// Speed gained per tick while accelerating.
pub const SPEED_GAIN: f32 = 0.1;

/// Speed cap.
pub const MAX_SPEED: f32 = 2.5;

/// Per-tick speed retention.
pub const FRICTION: f32 = 0.98;

/// Speeds below this snap to zero.
pub const MIN_SPEED: f32 = 0.01;

/// Heat at which the engine overheats.
pub const OVERHEAT_THRESHOLD: f32 = 100.0;

/// Heat must fall below this before an overheated engine recovers.
pub const COOLDOWN_THRESHOLD: f32 = 20.0;

/// Heat never accumulates past this ceiling.
pub const HEAT_CEILING: f32 = OVERHEAT_THRESHOLD + 10.0;

/// Input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiderInput {
    /// The accelerate control is held down.
    pub accelerate: bool,
}

/// One rider's local kinematic state. Authoritative for the owning slot
/// only; the opponent's rider is never simulated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderSim {
    pub position: f32,
    pub speed: f32,
    pub heat: f32,
    pub overheated: bool,
}

impl Default for RiderSim {
    fn default() -> Self {
        Self::new()
    }
}

impl RiderSim {
    /// A rider on the start line.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: 0.0,
            speed: 0.0,
            heat: 0.0,
            overheated: false,
        }
    }

    /// Resume from mirrored shared state (speed is local-only and restarts
    /// at zero).
    #[must_use]
    pub fn from_shared(position: f32, heat: f32, overheated: bool) -> Self {
        Self {
            position,
            speed: 0.0,
            heat,
            overheated,
        }
    }

    /// Advance one fixed timestep.
    pub fn tick(&mut self, input: &RiderInput) {
        if input.accelerate && !self.overheated {
            self.heat = (self.heat + HEAT_INCREASE).min(HEAT_CEILING);
            self.speed = (self.speed + SPEED_GAIN).min(MAX_SPEED);
            if self.heat >= OVERHEAT_THRESHOLD {
                self.overheated = true;
            }
        } else {
            self.heat = (self.heat - HEAT_DECREASE).max(0.0);
            if self.overheated && self.heat < COOLDOWN_THRESHOLD {
                self.overheated = false;
            }
        }

        self.speed *= FRICTION;
        if self.speed < MIN_SPEED {
            self.speed = 0.0;
        }

        if !self.overheated {
            self.position += self.speed / 10.0;
        }
    }

    /// Crossed the finish line.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.position >= FINISH_LINE
    }
}
