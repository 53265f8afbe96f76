use crate::core::{
    playfield::PLAYFIELD_HEIGHT,
    rect::Rect,
};

/// Horizontal start position. Fixed for the whole session: only the
/// world scrolls, the agent never moves sideways.
pub const START_X: f32 = 100.0;
/// Vertical start position.
pub const START_Y: f32 = 400.0;
/// Hitbox width.
pub const BIRD_WIDTH: f32 = 46.0;
/// Hitbox height.
pub const BIRD_HEIGHT: f32 = 34.0;
/// Gravitational acceleration constant.
pub const GRAVITY_ACCEL: f32 = 2.0;
/// Vertical velocity restored by a jump.
pub const JUMP_VELOCITY: f32 = 8.0;

/// One controlled agent: position, velocity, and score state.
///
/// The integration is deliberately non-standard and must stay that way:
/// each tick subtracts `accel * airborne` from the velocity, where
/// `airborne` is the *total* time since the last jump, and then moves
/// `y` against the velocity sign. Right after a jump the velocity is
/// large and positive so y decreases (the bird rises); as the airborne
/// clock grows the velocity goes negative and y increases (the bird
/// falls), tracing a parabolic arc.
#[derive(Debug, Clone)]
pub struct Bird {
    x: f32,
    y: f32,
    vel: f32,
    airborne: f32,
    score: u32,
    alive: bool,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    /// Creates an agent at the start position with a fresh jump.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: START_X,
            y: START_Y,
            vel: JUMP_VELOCITY,
            airborne: 0.0,
            score: 0,
            alive: true,
        }
    }

    /// Accumulates `dt` into the airborne clock and applies gravity for
    /// one tick.
    pub fn advance(&mut self, dt: f32) {
        self.airborne += dt;
        self.vel -= GRAVITY_ACCEL * self.airborne;
        self.y -= self.vel;
    }

    /// Resets the velocity and the airborne clock. `y` is untouched.
    pub fn jump(&mut self) {
        self.vel = JUMP_VELOCITY;
        self.airborne = 0.0;
    }

    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, BIRD_WIDTH, BIRD_HEIGHT)
    }

    /// True once the hitbox has left the vertical playfield bounds.
    #[must_use]
    pub fn is_out_of_bounds(&self) -> bool {
        self.y >= PLAYFIELD_HEIGHT || self.y + BIRD_HEIGHT <= 0.0
    }

    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    #[must_use]
    pub const fn velocity(&self) -> f32 {
        self.vel
    }

    /// Seconds since the last jump.
    #[must_use]
    pub const fn airborne(&self) -> f32 {
        self.airborne
    }

    /// Pipes cleared so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) const fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) const fn record_clear(&mut self) {
        self.score += 1;
    }
}
