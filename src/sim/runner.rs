//! Jump-and-dodge runner simulation.
//!
//! The track scrolls past at a shared rate; each player controls only the
//! vertical axis. Gravity integrates velocity and position every tick, a
//! jump is an upward impulse available only on the ground, and collisions
//! are axis-aligned box overlaps between the player and each obstacle,
//! offset by the shared scroll distance. A hit starts an invulnerability
//! window so one obstacle cannot drain several lives in a single pass.
//!
//! Courses are generated from a deterministic sequence seeded by the race
//! number, so both clients derive the same layout independently.

use crate::core::rng::CourseRng;
use crate::core::Obstacle;

/// Downward acceleration per tick².
pub const GRAVITY: f32 = 0.35;

/// Upward velocity applied by a grounded jump.
pub const JUMP_IMPULSE: f32 = 5.0;

/// Shared scroll advance per tick, written by the designated advancer.
pub const SCROLL_RATE: f32 = 1.0;

/// Scroll distance at which the race finishes.
pub const FINISH_DISTANCE: f32 = 1000.0;

/// Lives per player per race.
pub const STARTING_LIVES: u32 = 3;

/// Ticks of invulnerability after a hit (~0.75 s at 60 Hz).
pub const INVULN_TICKS: u32 = 45;

/// Leading edge of the player's box along the track.
pub const PLAYER_TRACK_OFFSET: f32 = 40.0;

/// Player collision box.
pub const PLAYER_WIDTH: f32 = 4.0;
pub const PLAYER_HEIGHT: f32 = 6.0;

/// Obstacle collision box width; height comes from the course.
pub const OBSTACLE_WIDTH: f32 = 4.0;

const OBSTACLE_COUNT: u32 = 12;
const FIRST_OBSTACLE_AT: f32 = 120.0;
const OBSTACLE_GAP_MIN: f32 = 55.0;
const OBSTACLE_GAP_MAX: f32 = 90.0;
const OBSTACLE_HEIGHT_MIN: f32 = 4.0;
const OBSTACLE_HEIGHT_MAX: f32 = 9.0;

/// Generate the obstacle course for a race. Same race number, same course,
/// on both clients.
#[must_use]
pub fn generate_course(race: u32) -> Vec<Obstacle> {
    let root = CourseRng::new(u64::from(race));
    let mut gaps = root.for_context("gaps");
    let mut heights = root.for_context("heights");

    let mut course = Vec::with_capacity(OBSTACLE_COUNT as usize);
    let mut at = FIRST_OBSTACLE_AT;
    for _ in 0..OBSTACLE_COUNT {
        course.push(Obstacle {
            position_along_track: at,
            height: heights.gen_range_f32(OBSTACLE_HEIGHT_MIN..OBSTACLE_HEIGHT_MAX),
        });
        at += gaps.gen_range_f32(OBSTACLE_GAP_MIN..OBSTACLE_GAP_MAX);
    }
    course
}

/// Input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerInput {
    /// The jump control was pressed.
    pub jump: bool,
}

/// What a tick produced, for the driver to turn into shared writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerTick {
    /// An obstacle was hit this tick (a life was lost).
    pub hit: bool,
    /// The hit took the final life.
    pub died: bool,
}

/// One runner's local state. Authoritative for the owning slot only.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSim {
    pub vertical_position: f32,
    pub vertical_velocity: f32,
    pub lives: u32,
    pub is_alive: bool,
    invuln_ticks: u32,
}

impl Default for RunnerSim {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerSim {
    /// A runner on the ground with full lives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertical_position: 0.0,
            vertical_velocity: 0.0,
            lives: STARTING_LIVES,
            is_alive: true,
            invuln_ticks: 0,
        }
    }

    /// On the ground and able to jump.
    #[must_use]
    pub fn grounded(&self) -> bool {
        self.vertical_position <= 0.0
    }

    /// Inside the post-hit invulnerability window.
    #[must_use]
    pub fn invulnerable(&self) -> bool {
        self.invuln_ticks > 0
    }

    /// Advance one fixed timestep against the shared scroll `distance`.
    pub fn tick(
        &mut self,
        input: &RunnerInput,
        distance: f32,
        obstacles: &[Obstacle],
    ) -> RunnerTick {
        // A dead runner no longer moves.
        if !self.is_alive {
            return RunnerTick::default();
        }

        if input.jump && self.grounded() {
            self.vertical_velocity = JUMP_IMPULSE;
        }

        self.vertical_velocity -= GRAVITY;
        self.vertical_position += self.vertical_velocity;
        if self.vertical_position <= 0.0 {
            self.vertical_position = 0.0;
            self.vertical_velocity = 0.0;
        }

        if self.invuln_ticks > 0 {
            self.invuln_ticks -= 1;
            return RunnerTick::default();
        }

        if self.collides(distance, obstacles) {
            self.lives = self.lives.saturating_sub(1);
            self.invuln_ticks = INVULN_TICKS;
            if self.lives == 0 {
                self.is_alive = false;
            }
            return RunnerTick {
                hit: true,
                died: !self.is_alive,
            };
        }
        RunnerTick::default()
    }

    /// AABB test of the player's box against every obstacle, with the
    /// course offset by the shared scroll distance.
    fn collides(&self, distance: f32, obstacles: &[Obstacle]) -> bool {
        let player_left = PLAYER_TRACK_OFFSET;
        let player_right = PLAYER_TRACK_OFFSET + PLAYER_WIDTH;
        let player_bottom = self.vertical_position;
        let player_top = self.vertical_position + PLAYER_HEIGHT;

        obstacles.iter().any(|obstacle| {
            let left = obstacle.position_along_track - distance;
            let right = left + OBSTACLE_WIDTH;
            let overlaps_track = player_left < right && player_right > left;
            // Obstacles sit on the ground; only the bottom edge matters.
            let overlaps_height = player_bottom < obstacle.height && player_top > 0.0;
            overlaps_track && overlaps_height
        })
    }
}
