/// Playfield width in pixels.
pub const PLAYFIELD_WIDTH: f32 = 600.0;

/// Playfield height in pixels. Agents die on leaving the vertical bounds.
pub const PLAYFIELD_HEIGHT: f32 = 800.0;

/// Fixed simulation rate in ticks per second.
pub const TICK_RATE: u32 = 30;

/// Duration of one tick in seconds, accumulated into each agent's
/// airborne clock on a fixed timestep.
pub const TICK_SECONDS: f32 = 1.0 / 30.0;
